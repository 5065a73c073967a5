use super::{lists_page, single, ListIdBody};
use crate::client::{require, Auth, TwitterClient};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::ListOptions;
use crate::types::{ListsResponse, Pinned};

impl TwitterClient {
    pub fn build_pinned_lists(&self, user_id: &str, options: &ListOptions) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        self.request(HttpMethod::Get, "/2/users/{id}/pinned_lists", Auth::User)
            .path_param("id", user_id)
            .options(options)
            .build()
    }

    pub fn parse_pinned_lists(&self, response: HttpResponse) -> Result<ListsResponse, ClientError> {
        lists_page(&response)
    }

    /// Pinned lists are private to their owner, so this always uses the
    /// user-context key.
    pub fn pinned_lists(&self, user_id: &str, options: &ListOptions) -> Result<ListsResponse, ClientError> {
        let request = self.build_pinned_lists(user_id, options)?;
        self.parse_pinned_lists(self.execute(&request)?)
    }

    pub fn build_pin_list(&self, user_id: &str, list_id: &str) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Post, "/2/users/{id}/pinned_lists", Auth::User)
            .path_param("id", user_id)
            .json(&ListIdBody { list_id })?
            .build()
    }

    pub fn parse_pin_list(&self, response: HttpResponse) -> Result<Pinned, ClientError> {
        single(&response)
    }

    pub fn pin_list(&self, user_id: &str, list_id: &str) -> Result<Pinned, ClientError> {
        let request = self.build_pin_list(user_id, list_id)?;
        self.parse_pin_list(self.execute(&request)?)
    }

    pub fn build_unpin_list(&self, user_id: &str, list_id: &str) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Delete, "/2/users/{id}/pinned_lists/{list_id}", Auth::User)
            .path_param("id", user_id)
            .path_param("list_id", list_id)
            .build()
    }

    pub fn parse_unpin_list(&self, response: HttpResponse) -> Result<Pinned, ClientError> {
        single(&response)
    }

    pub fn unpin_list(&self, user_id: &str, list_id: &str) -> Result<Pinned, ClientError> {
        let request = self.build_unpin_list(user_id, list_id)?;
        self.parse_unpin_list(self.execute(&request)?)
    }
}
