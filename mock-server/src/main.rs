use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock lists API on http://{addr}");
    println!(
        "consumer key `{}`, user-context requests act as {}",
        mock_server::CONSUMER_KEY,
        mock_server::AUTHENTICATED_USER_ID
    );
    mock_server::run(listener).await
}
