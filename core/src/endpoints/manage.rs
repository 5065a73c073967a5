//! Creating, updating and deleting lists owned by the authenticated user.

use super::single;
use crate::client::{require, Auth, TwitterClient};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateList, CreatedList, Deleted, UpdateList, Updated};

impl TwitterClient {
    pub fn build_create_list(&self, list: &CreateList) -> Result<HttpRequest, ClientError> {
        require("name", &list.name)?;
        self.request(HttpMethod::Post, "/2/lists", Auth::User)
            .json(list)?
            .build()
    }

    pub fn parse_create_list(&self, response: HttpResponse) -> Result<CreatedList, ClientError> {
        single(&response)
    }

    pub fn create_list(&self, list: &CreateList) -> Result<CreatedList, ClientError> {
        let request = self.build_create_list(list)?;
        self.parse_create_list(self.execute(&request)?)
    }

    pub fn build_update_list(&self, list_id: &str, update: &UpdateList) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Put, "/2/lists/{id}", Auth::User)
            .path_param("id", list_id)
            .json(update)?
            .build()
    }

    pub fn parse_update_list(&self, response: HttpResponse) -> Result<Updated, ClientError> {
        single(&response)
    }

    /// Apply the fields set on `update`; unset fields keep their current value.
    pub fn update_list(&self, list_id: &str, update: &UpdateList) -> Result<Updated, ClientError> {
        let request = self.build_update_list(list_id, update)?;
        self.parse_update_list(self.execute(&request)?)
    }

    pub fn build_delete_list(&self, list_id: &str) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Delete, "/2/lists/{id}", Auth::User)
            .path_param("id", list_id)
            .build()
    }

    pub fn parse_delete_list(&self, response: HttpResponse) -> Result<Deleted, ClientError> {
        single(&response)
    }

    pub fn delete_list(&self, list_id: &str) -> Result<Deleted, ClientError> {
        let request = self.build_delete_list(list_id)?;
        self.parse_delete_list(self.execute(&request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client_with, offline_client};
    use crate::error::ClientError;
    use crate::http::HttpMethod;
    use crate::types::{CreateList, UpdateList};

    #[test]
    fn create_sends_only_set_fields() {
        let (client, seen) = client_with(200, r#"{"data":{"id":"1441162269824405510","name":"test v2 create list"}}"#);
        client.set_bearer_token(Some("app-only".to_string()));
        let created = client
            .create_list(&CreateList {
                name: "test v2 create list".to_string(),
                private: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(created.id, "1441162269824405510");
        assert_eq!(created.name, "test v2 create list");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].url, "http://localhost:3000/2/lists");
        assert_eq!(seen[0].header("authorization"), Some("Bearer test-key"));
        assert_eq!(
            seen[0].body.as_deref(),
            Some(r#"{"name":"test v2 create list","private":false}"#)
        );
    }

    #[test]
    fn create_requires_a_name() {
        let err = offline_client().create_list(&CreateList::default()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument { name: "name" }));
    }

    #[test]
    fn update_puts_partial_body() {
        let (client, seen) = client_with(200, r#"{"data":{"updated":true}}"#);
        let update = UpdateList {
            description: Some("Rust people".to_string()),
            ..Default::default()
        };
        assert!(client.update_list("1441162269824405510", &update).unwrap().updated);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Put);
        assert_eq!(seen[0].url, "http://localhost:3000/2/lists/1441162269824405510");
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"description":"Rust people"}"#));
    }

    #[test]
    fn delete_of_foreign_list_is_forbidden() {
        let body = r#"{
            "detail": "You are not allowed to delete this List.",
            "title": "Forbidden",
            "type": "about:blank",
            "status": 403
        }"#;
        let (client, _) = client_with(403, body);
        let err = client.delete_list("84839422").unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.status, 403);
        assert!(api.errors.is_empty());
        assert_eq!(api.title.as_deref(), Some("Forbidden"));
        assert_eq!(api.detail.as_deref(), Some("You are not allowed to delete this List."));
    }

    #[test]
    fn delete_reports_deleted_flag() {
        let (client, seen) = client_with(200, r#"{"data":{"deleted":true}}"#);
        assert!(client.delete_list("1441162269824405510").unwrap().deleted);
        assert_eq!(seen.lock().unwrap()[0].method, HttpMethod::Delete);
    }
}
