//! List lookup: a single list by id, and the lists a user owns.

use super::lists_page;
use crate::client::{require, Auth, TwitterClient};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{ListOptions, ListPageOptions};
use crate::response::decode;
use crate::types::{List, ListResponse, ListsResponse};

impl TwitterClient {
    pub fn build_lookup_list(&self, list_id: &str, options: &ListOptions) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Get, "/2/lists/{id}", Auth::AppOnly)
            .path_param("id", list_id)
            .options(options)
            .build()
    }

    pub fn parse_lookup_list(&self, response: HttpResponse) -> Result<ListResponse, ClientError> {
        let mut decoded = decode::<List>(&response)?;
        let includes = decoded.includes.take();
        Ok(ListResponse {
            list: decoded.require_data()?,
            includes,
        })
    }

    /// Look up one list. With `ListExpansion::OwnerId` the owner arrives in
    /// `includes.users`.
    pub fn lookup_list(&self, list_id: &str, options: &ListOptions) -> Result<ListResponse, ClientError> {
        let request = self.build_lookup_list(list_id, options)?;
        self.parse_lookup_list(self.execute(&request)?)
    }

    pub fn build_owned_lists(&self, user_id: &str, options: &ListPageOptions) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        self.request(HttpMethod::Get, "/2/users/{id}/owned_lists", Auth::AppOnly)
            .path_param("id", user_id)
            .options(options)
            .build()
    }

    pub fn parse_owned_lists(&self, response: HttpResponse) -> Result<ListsResponse, ClientError> {
        lists_page(&response)
    }

    /// Lists owned by `user_id`, one page at a time.
    pub fn owned_lists(&self, user_id: &str, options: &ListPageOptions) -> Result<ListsResponse, ClientError> {
        let request = self.build_owned_lists(user_id, options)?;
        self.parse_owned_lists(self.execute(&request)?)
    }
}
