use axum::http::{self, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use mock_server::{app, AUTHENTICATED_USER_ID, CONSUMER_KEY, CONSUMER_SECRET, OFFICIAL_LIST_ID};
use serde_json::Value;
use tower::ServiceExt;

const USER_TOKEN: &str = "user-context-token";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {USER_TOKEN}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn form_request(uri: &str, key: &str, secret: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode(format!("{key}:{secret}"))),
        )
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded;charset=UTF-8")
        .body(body.to_string())
        .unwrap()
}

async fn issue_token(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(form_request(
            "/oauth2/token",
            CONSUMER_KEY,
            CONSUMER_SECRET,
            "grant_type=client_credentials",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn requests_without_bearer_are_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(format!("/2/lists/{OFFICIAL_LIST_ID}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["title"], "Unauthorized");
}

#[tokio::test]
async fn token_issue_and_invalidate() {
    let app = app();
    let token = issue_token(&app).await;
    assert!(token.starts_with("AAAA"));

    let resp = app
        .clone()
        .oneshot(get(&format!("/2/lists/{OFFICIAL_LIST_ID}"), &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(form_request(
            "/oauth2/invalidate_token",
            CONSUMER_KEY,
            CONSUMER_SECRET,
            &format!("access_token={token}"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["access_token"], token.as_str());

    let resp = app
        .oneshot(form_request(
            "/oauth2/invalidate_token",
            CONSUMER_KEY,
            CONSUMER_SECRET,
            &format!("access_token={token}"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["errors"][0]["code"], 89);
}

#[tokio::test]
async fn wrong_consumer_secret_is_forbidden() {
    let resp = app()
        .oneshot(form_request(
            "/oauth2/token",
            CONSUMER_KEY,
            "wrong",
            "grant_type=client_credentials",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["code"], 99);
    assert_eq!(body["errors"][0]["label"], "authenticity_token_error");
}

#[tokio::test]
async fn app_only_token_cannot_write() {
    let app = app();
    let token = issue_token(&app).await;
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/2/lists/{OFFICIAL_LIST_ID}"))
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["title"], "Unsupported Authentication");
}

// --- lookup ---

#[tokio::test]
async fn lookup_list_with_owner_expansion() {
    let resp = app()
        .oneshot(get(
            &format!("/2/lists/{OFFICIAL_LIST_ID}?expansions=owner_id&list.fields=owner_id,member_count"),
            USER_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["name"], "Official Twitter Accounts");
    assert_eq!(body["data"]["member_count"], 7);
    assert_eq!(body["includes"]["users"][0]["id"], AUTHENTICATED_USER_ID);
}

#[tokio::test]
async fn unknown_list_is_resource_not_found() {
    let resp = app().oneshot(get("/2/lists/111111111122", USER_TOKEN)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    let item = &body["errors"][0];
    assert_eq!(item["resource_type"], "list");
    assert_eq!(item["resource_id"], "111111111122");
    assert_eq!(item["detail"], "Could not find list with id: [111111111122].");
    assert_eq!(item["type"], "https://api.twitter.com/2/problems/resource-not-found");
}

#[tokio::test]
async fn malformed_id_is_invalid_request() {
    let resp = app()
        .oneshot(get(
            "/2/users/8488877666666666666666666666666622839422/owned_lists",
            USER_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["title"], "Invalid Request");
    assert_eq!(
        body["errors"][0]["parameters"]["id"][0],
        "8488877666666666666666666666666622839422"
    );
}

#[tokio::test]
async fn owned_lists_include_owner() {
    let resp = app()
        .oneshot(get(
            "/2/users/1227213680120479745/owned_lists?expansions=owner_id&list.fields=follower_count&user.fields=created_at",
            USER_TOKEN,
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["data"][0]["id"], "1451951974291689472");
    assert_eq!(body["data"][0]["follower_count"], 5);
    assert_eq!(body["includes"]["users"][0]["username"], "Follow__Y0U");
    assert_eq!(body["includes"]["users"][0]["created_at"], "2020-02-11T12:52:11.000Z");
    assert_eq!(body["meta"]["result_count"], 1);
}

// --- members ---

#[tokio::test]
async fn members_page_through_with_next_token() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(get(&format!("/2/lists/{OFFICIAL_LIST_ID}/members?max_results=5"), USER_TOKEN))
        .await
        .unwrap();
    let first = body_json(resp).await;
    assert_eq!(first["data"].as_array().unwrap().len(), 5);
    assert_eq!(first["data"][0]["username"], "birdwatch");
    let next = first["meta"]["next_token"].as_str().unwrap().to_string();

    let resp = app
        .oneshot(get(
            &format!("/2/lists/{OFFICIAL_LIST_ID}/members?max_results=5&pagination_token={next}"),
            USER_TOKEN,
        ))
        .await
        .unwrap();
    let second = body_json(resp).await;
    assert_eq!(second["data"].as_array().unwrap().len(), 2);
    assert_eq!(second["meta"]["result_count"], 2);
    assert!(second["meta"].get("next_token").is_none());
}

#[tokio::test]
async fn add_and_remove_member() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/2/lists/{OFFICIAL_LIST_ID}/members"),
            r#"{"user_id":"1227213680120479745"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["is_member"], true);

    let resp = app
        .clone()
        .oneshot(get("/2/users/1227213680120479745/list_memberships", USER_TOKEN))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"][0]["id"], OFFICIAL_LIST_ID);

    let resp = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/2/lists/{OFFICIAL_LIST_ID}/members/1227213680120479745"),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"]["is_member"], false);

    let resp = app
        .oneshot(get("/2/users/1227213680120479745/list_memberships", USER_TOKEN))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body.get("data").is_none());
    assert_eq!(body["meta"]["result_count"], 0);
}

#[tokio::test]
async fn adding_to_someone_elses_list_is_forbidden() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/2/lists/1451951974291689472/members",
            r#"{"user_id":"6253282"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn add_member_with_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("/2/lists/{OFFICIAL_LIST_ID}/members"),
            r#"{"not_user_id":1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body_bytes(resp).await.is_empty());
}

// --- follows and pins ---

#[tokio::test]
async fn follow_then_unfollow() {
    let app = app();
    let uri = format!("/2/users/{AUTHENTICATED_USER_ID}/followed_lists");
    let resp = app
        .clone()
        .oneshot(json_request("POST", &uri, &format!(r#"{{"list_id":"{OFFICIAL_LIST_ID}"}}"#)))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"]["following"], true);

    let resp = app
        .clone()
        .oneshot(get(&format!("/2/lists/{OFFICIAL_LIST_ID}/followers"), USER_TOKEN))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["meta"]["result_count"], 3);

    let resp = app
        .oneshot(json_request("DELETE", &format!("{uri}/{OFFICIAL_LIST_ID}"), ""))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"]["following"], false);
}

#[tokio::test]
async fn following_for_another_user_is_forbidden() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/2/users/2244994945/followed_lists",
            &format!(r#"{{"list_id":"{OFFICIAL_LIST_ID}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn pin_shows_in_pinned_lists() {
    let app = app();
    let uri = format!("/2/users/{AUTHENTICATED_USER_ID}/pinned_lists");
    let resp = app
        .clone()
        .oneshot(json_request("POST", &uri, r#"{"list_id":"1451951974291689472"}"#))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"]["pinned"], true);

    let resp = app.oneshot(get(&uri, USER_TOKEN)).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["data"][0]["name"], "Twitter");
}

// --- manage ---

#[tokio::test]
async fn create_update_delete_list() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/2/lists", r#"{"name":"Rustaceans","private":true}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["name"], "Rustaceans");

    let resp = app
        .clone()
        .oneshot(json_request("PUT", &format!("/2/lists/{id}"), r#"{"description":"crabs"}"#))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"]["updated"], true);

    let resp = app
        .clone()
        .oneshot(get(&format!("/2/lists/{id}?list.fields=description,private"), USER_TOKEN))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["data"]["description"], "crabs");
    assert_eq!(body["data"]["private"], true);

    let resp = app
        .clone()
        .oneshot(json_request("DELETE", &format!("/2/lists/{id}"), ""))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"]["deleted"], true);

    let resp = app.oneshot(get(&format!("/2/lists/{id}"), USER_TOKEN)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_list_requires_name() {
    let resp = app()
        .oneshot(json_request("POST", "/2/lists", r#"{"name":""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- tweets ---

#[tokio::test]
async fn list_tweets_newest_first_with_authors() {
    let resp = app()
        .oneshot(get(
            &format!("/2/lists/{OFFICIAL_LIST_ID}/tweets?expansions=author_id&tweet.fields=author_id"),
            USER_TOKEN,
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["data"][0]["id"], "1458172421115101189");
    assert_eq!(body["data"][0]["author_id"], "2244994945");
    assert_eq!(body["includes"]["users"][0]["username"], "TwitterDev");
    assert_eq!(body["meta"]["result_count"], 3);
}
