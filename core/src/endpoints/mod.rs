//! Endpoint functions, grouped by resource.
//!
//! Every operation validates its identifiers, builds one request, sends it
//! once and decodes the result. Nothing here retries, caches or batches.

mod follows;
mod lists;
mod manage;
mod members;
mod pins;
mod tweets;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::http::HttpResponse;
use crate::response::decode;
use crate::types::{List, ListsResponse, Tweet, TweetsResponse, User, UsersResponse};

#[derive(Serialize)]
struct UserIdBody<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct ListIdBody<'a> {
    list_id: &'a str,
}

fn users_page(response: &HttpResponse) -> Result<UsersResponse, ClientError> {
    let (users, includes, meta) = decode::<Vec<User>>(response)?.into_page()?;
    Ok(UsersResponse { users, includes, meta })
}

fn lists_page(response: &HttpResponse) -> Result<ListsResponse, ClientError> {
    let (lists, includes, meta) = decode::<Vec<List>>(response)?.into_page()?;
    Ok(ListsResponse { lists, includes, meta })
}

fn tweets_page(response: &HttpResponse) -> Result<TweetsResponse, ClientError> {
    let (tweets, includes, meta) = decode::<Vec<Tweet>>(response)?.into_page()?;
    Ok(TweetsResponse { tweets, includes, meta })
}

fn single<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ClientError> {
    decode::<T>(response)?.require_data()
}
