use super::tweets_page;
use crate::client::{require, Auth, TwitterClient};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::TweetPageOptions;
use crate::types::TweetsResponse;

impl TwitterClient {
    pub fn build_list_tweets(&self, list_id: &str, options: &TweetPageOptions) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Get, "/2/lists/{id}/tweets", Auth::AppOnly)
            .path_param("id", list_id)
            .options(options)
            .build()
    }

    pub fn parse_list_tweets(&self, response: HttpResponse) -> Result<TweetsResponse, ClientError> {
        tweets_page(&response)
    }

    /// Recent tweets from the list's members, newest first.
    pub fn list_tweets(&self, list_id: &str, options: &TweetPageOptions) -> Result<TweetsResponse, ClientError> {
        let request = self.build_list_tweets(list_id, options)?;
        self.parse_list_tweets(self.execute(&request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::client_with;
    use crate::options::{TweetExpansion, TweetField, TweetPageOptions, UserField};

    #[test]
    fn list_tweets_decodes_tweets_and_authors() {
        let body = r#"{
            "data": [
                {"id": "1458172421115101189", "text": "First", "author_id": "2244994945"},
                {"id": "1458150283130871812", "text": "Second", "author_id": "6253282"}
            ],
            "includes": {"users": [
                {"id": "2244994945", "name": "Twitter Dev", "username": "TwitterDev"},
                {"id": "6253282", "name": "Twitter API", "username": "TwitterAPI"}
            ]},
            "meta": {"result_count": 2, "next_token": "7140dibdnow9c7btw3z2vwioavpvutgzadzvs0sqoc3e1"}
        }"#;
        let (client, seen) = client_with(200, body);
        let options = TweetPageOptions {
            expansions: vec![TweetExpansion::AuthorId],
            tweet_fields: vec![TweetField::AuthorId, TweetField::CreatedAt],
            user_fields: vec![UserField::Username],
            max_results: Some(2),
            ..Default::default()
        };
        let resp = client.list_tweets("84839422", &options).unwrap();

        let texts: Vec<&str> = resp.tweets.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second"]);
        assert_eq!(resp.includes.unwrap().users.len(), 2);
        assert!(resp.meta.unwrap().has_next_page());
        assert_eq!(
            seen.lock().unwrap()[0].url,
            "http://localhost:3000/2/lists/84839422/tweets?expansions=author_id&tweet.fields=author_id%2Ccreated_at&user.fields=username&max_results=2"
        );
    }
}
