//! List follows: who follows a list, which lists a user follows, and
//! following or unfollowing a list.

use super::{lists_page, single, users_page, ListIdBody};
use crate::client::{require, Auth, TwitterClient};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{ListPageOptions, UserPageOptions};
use crate::types::{Following, ListsResponse, UsersResponse};

impl TwitterClient {
    pub fn build_list_followers(&self, list_id: &str, options: &UserPageOptions) -> Result<HttpRequest, ClientError> {
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Get, "/2/lists/{id}/followers", Auth::AppOnly)
            .path_param("id", list_id)
            .options(options)
            .build()
    }

    pub fn parse_list_followers(&self, response: HttpResponse) -> Result<UsersResponse, ClientError> {
        users_page(&response)
    }

    pub fn list_followers(&self, list_id: &str, options: &UserPageOptions) -> Result<UsersResponse, ClientError> {
        let request = self.build_list_followers(list_id, options)?;
        self.parse_list_followers(self.execute(&request)?)
    }

    pub fn build_followed_lists(&self, user_id: &str, options: &ListPageOptions) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        self.request(HttpMethod::Get, "/2/users/{id}/followed_lists", Auth::AppOnly)
            .path_param("id", user_id)
            .options(options)
            .build()
    }

    pub fn parse_followed_lists(&self, response: HttpResponse) -> Result<ListsResponse, ClientError> {
        lists_page(&response)
    }

    pub fn followed_lists(&self, user_id: &str, options: &ListPageOptions) -> Result<ListsResponse, ClientError> {
        let request = self.build_followed_lists(user_id, options)?;
        self.parse_followed_lists(self.execute(&request)?)
    }

    pub fn build_follow_list(&self, user_id: &str, list_id: &str) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Post, "/2/users/{id}/followed_lists", Auth::User)
            .path_param("id", user_id)
            .json(&ListIdBody { list_id })?
            .build()
    }

    pub fn parse_follow_list(&self, response: HttpResponse) -> Result<Following, ClientError> {
        single(&response)
    }

    /// Make `user_id` follow the list. The user must be the one the API
    /// key acts for.
    pub fn follow_list(&self, user_id: &str, list_id: &str) -> Result<Following, ClientError> {
        let request = self.build_follow_list(user_id, list_id)?;
        self.parse_follow_list(self.execute(&request)?)
    }

    pub fn build_unfollow_list(&self, user_id: &str, list_id: &str) -> Result<HttpRequest, ClientError> {
        let user_id = require("user_id", user_id)?;
        let list_id = require("list_id", list_id)?;
        self.request(HttpMethod::Delete, "/2/users/{id}/followed_lists/{list_id}", Auth::User)
            .path_param("id", user_id)
            .path_param("list_id", list_id)
            .build()
    }

    pub fn parse_unfollow_list(&self, response: HttpResponse) -> Result<Following, ClientError> {
        single(&response)
    }

    pub fn unfollow_list(&self, user_id: &str, list_id: &str) -> Result<Following, ClientError> {
        let request = self.build_unfollow_list(user_id, list_id)?;
        self.parse_unfollow_list(self.execute(&request)?)
    }
}
