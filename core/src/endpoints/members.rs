//! List membership: who is on a list, which lists a user is on, and
//! adding or removing members.

use super::{lists_page, single, users_page, UserIdBody};
use crate::client::{require, Auth, TwitterClient};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{ListPageOptions, UserPageOptions};
use crate::types::{IsMember, ListsResponse, UsersResponse};

impl TwitterClient {
    pub fn build_list_members(&self, list_id: &str, options: &UserPageOptions) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Get, "/2/lists/{id}/members", Auth::AppOnly)
            .path_param("id", list_id)
            .options(options)
            .build()
    }

    pub fn parse_list_members(&self, response: HttpResponse) -> Result<UsersResponse, ClientError> {
        users_page(&response)
    }

    /// Members of a list, one page at a time. Pass `meta.next_token` back
    /// as `pagination_token` to continue.
    pub fn list_members(&self, list_id: &str, options: &UserPageOptions) -> Result<UsersResponse, ClientError> {
        let request = self.build_list_members(list_id, options)?;
        self.parse_list_members(self.execute(&request)?)
    }

    pub fn build_list_memberships(&self, user_id: &str, options: &ListPageOptions) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        self.request(HttpMethod::Get, "/2/users/{id}/list_memberships", Auth::AppOnly)
            .path_param("id", user_id)
            .options(options)
            .build()
    }

    pub fn parse_list_memberships(&self, response: HttpResponse) -> Result<ListsResponse, ClientError> {
        lists_page(&response)
    }

    /// Lists that `user_id` is a member of.
    pub fn list_memberships(&self, user_id: &str, options: &ListPageOptions) -> Result<ListsResponse, ClientError> {
        let request = self.build_list_memberships(user_id, options)?;
        self.parse_list_memberships(self.execute(&request)?)
    }

    pub fn build_add_list_member(&self, list_id: &str, user_id: &str) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        let user_id = require("user_id", user_id)?;
        self.request(HttpMethod::Post, "/2/lists/{id}/members", Auth::User)
            .path_param("id", list_id)
            .json(&UserIdBody { user_id })?
            .build()
    }

    pub fn parse_add_list_member(&self, response: HttpResponse) -> Result<IsMember, ClientError> {
        single(&response)
    }

    /// Add `user_id` to the list. Requires a user-context API key.
    pub fn add_list_member(&self, list_id: &str, user_id: &str) -> Result<IsMember, ClientError> {
        let request = self.build_add_list_member(list_id, user_id)?;
        self.parse_add_list_member(self.execute(&request)?)
    }

    pub fn build_remove_list_member(&self, list_id: &str, user_id: &str) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        let user_id = require("user_id", user_id)?;
        self.request(HttpMethod::Delete, "/2/lists/{id}/members/{user_id}", Auth::User)
            .path_param("id", list_id)
            .path_param("user_id", user_id)
            .build()
    }

    pub fn parse_remove_list_member(&self, response: HttpResponse) -> Result<IsMember, ClientError> {
        single(&response)
    }

    /// Remove `user_id` from the list. Requires a user-context API key.
    pub fn remove_list_member(&self, list_id: &str, user_id: &str) -> Result<IsMember, ClientError> {
        let request = self.build_remove_list_member(list_id, user_id)?;
        self.parse_remove_list_member(self.execute(&request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client_with, offline_client};
    use crate::error::{ClientError, ErrorShape};
    use crate::http::HttpMethod;
    use crate::options::{UserExpansion, UserField, UserPageOptions};
    use crate::types::{IsMember, User};

    const FIVE_MEMBERS: &str = r#"{
        "data": [
            {"id": "1319036828964454402", "name": "Birdwatch", "username": "birdwatch"},
            {"id": "1244731491088809984", "name": "Twitter Thailand", "username": "TwitterThailand"},
            {"id": "1194267639100723200", "name": "Twitter Retweets", "username": "TwitterRetweets"},
            {"id": "1168976680867762177", "name": "Twitter Able", "username": "TwitterAble"},
            {"id": "1065249714214457345", "name": "Spaces", "username": "TwitterSpaces"}
        ],
        "meta": {"result_count": 5, "next_token": "5676935732641845249"}
    }"#;

    const LIST_NOT_FOUND: &str = r#"{
        "errors":[{
            "value":"111111111122",
            "detail":"Could not find list with id: [111111111122].",
            "title":"Not Found Error",
            "resource_type":"list",
            "parameter":"id",
            "resource_id":"111111111122",
            "type":"https://api.twitter.com/2/problems/resource-not-found"
        }]
    }"#;

    fn user(id: &str, name: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            username: username.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn list_members_keeps_order_and_next_token() {
        let (client, seen) = client_with(200, FIVE_MEMBERS);
        let resp = client.list_members("84839422", &UserPageOptions::default()).unwrap();

        assert_eq!(
            resp.users,
            vec![
                user("1319036828964454402", "Birdwatch", "birdwatch"),
                user("1244731491088809984", "Twitter Thailand", "TwitterThailand"),
                user("1194267639100723200", "Twitter Retweets", "TwitterRetweets"),
                user("1168976680867762177", "Twitter Able", "TwitterAble"),
                user("1065249714214457345", "Spaces", "TwitterSpaces"),
            ]
        );
        let meta = resp.meta.unwrap();
        assert_eq!(meta.result_count, 5);
        assert_eq!(meta.next_token.as_deref(), Some("5676935732641845249"));
        assert!(resp.includes.is_none());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, "http://localhost:3000/2/lists/84839422/members");
        assert_eq!(seen[0].header("authorization"), Some("Bearer test-key"));
    }

    #[test]
    fn list_members_sends_options() {
        let (client, seen) = client_with(200, FIVE_MEMBERS);
        let options = UserPageOptions {
            expansions: vec![UserExpansion::PinnedTweetId],
            user_fields: vec![UserField::CreatedAt],
            max_results: Some(5),
            pagination_token: Some("abc".to_string()),
            ..Default::default()
        };
        client.list_members("84839422", &options).unwrap();
        assert_eq!(
            seen.lock().unwrap()[0].url,
            "http://localhost:3000/2/lists/84839422/members?expansions=pinned_tweet_id&user.fields=created_at&max_results=5&pagination_token=abc"
        );
    }

    #[test]
    fn list_members_requires_list_id() {
        let err = offline_client().list_members("", &UserPageOptions::default()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument { name: "list_id" }));
    }

    #[test]
    fn add_member_posts_user_id() {
        let (client, seen) = client_with(200, r#"{"data": {"is_member": true}}"#);
        let resp = client.add_list_member("6253282", "2244994945").unwrap();
        assert_eq!(resp, IsMember { is_member: true });

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].url, "http://localhost:3000/2/lists/6253282/members");
        assert_eq!(seen[0].header("content-type"), Some("application/json"));
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"user_id":"2244994945"}"#));
    }

    #[test]
    fn add_member_to_missing_list_returns_errors() {
        let (client, _) = client_with(404, LIST_NOT_FOUND);
        let err = client.add_list_member("111111111122", "1228393702244134912").unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.status, 404);
        assert_eq!(api.errors.len(), 1);
        let item = &api.errors[0];
        assert_eq!(item.shape(), ErrorShape::Resource);
        assert_eq!(item.value.as_deref(), Some("111111111122"));
        assert_eq!(item.detail.as_deref(), Some("Could not find list with id: [111111111122]."));
        assert_eq!(item.title.as_deref(), Some("Not Found Error"));
        assert_eq!(item.resource_type.as_deref(), Some("list"));
        assert_eq!(item.parameter.as_deref(), Some("id"));
        assert_eq!(item.resource_id.as_deref(), Some("111111111122"));
    }

    #[test]
    fn add_member_validates_both_ids_before_sending() {
        let client = offline_client();
        assert!(matches!(
            client.add_list_member("", "1"),
            Err(ClientError::InvalidArgument { name: "list_id" })
        ));
        assert!(matches!(
            client.add_list_member("1", " "),
            Err(ClientError::InvalidArgument { name: "user_id" })
        ));
    }

    #[test]
    fn remove_member_uses_delete_without_body() {
        let (client, seen) = client_with(200, r#"{"data": {"is_member": false}}"#);
        let resp = client.remove_list_member("2244994945", "6253282").unwrap();
        assert!(!resp.is_member);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert_eq!(seen[0].url, "http://localhost:3000/2/lists/2244994945/members/6253282");
        assert!(seen[0].body.is_none());
    }

    #[test]
    fn remove_member_of_missing_user_returns_errors() {
        let body = r#"{"errors":[{
            "value":"111111111133",
            "detail":"Could not find user with id: [111111111133].",
            "title":"Not Found Error",
            "resource_type":"user",
            "parameter":"id",
            "resource_id":"111111111133",
            "type":"https://api.twitter.com/2/problems/resource-not-found"
        }]}"#;
        let (client, _) = client_with(404, body);
        let err = client.remove_list_member("111111111133", "1228393702244134912").unwrap_err();
        let api = err.api_error().unwrap();
        assert!(api.is_not_found());
        assert_eq!(api.errors[0].resource_type.as_deref(), Some("user"));
    }

    #[test]
    fn list_memberships_hits_user_path() {
        let (client, seen) = client_with(
            200,
            r#"{"data":[{"id":"1451951974291689472","name":"Twitter"}],"meta":{"result_count":1}}"#,
        );
        let resp = client.list_memberships("783214", &Default::default()).unwrap();
        assert_eq!(resp.lists.len(), 1);
        assert_eq!(resp.lists[0].name, "Twitter");
        assert_eq!(seen.lock().unwrap()[0].url, "http://localhost:3000/2/users/783214/list_memberships");
    }
}
