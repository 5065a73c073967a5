//! Synchronous client for the Twitter v2 Lists API and its OAuth2
//! app-only token endpoints.
//!
//! # Overview
//! Every operation comes in three forms: `build_*` produces an
//! `HttpRequest`, `parse_*` consumes an `HttpResponse`, and the plain
//! method runs both around one call to the configured `Transport`. The
//! build and parse halves never touch the network, so callers can run the
//! round-trip themselves and tests can feed canned responses.
//!
//! # Design
//! - `TwitterClient` holds the API key, the optional consumer credentials
//!   and the generated app-only bearer token behind a lock; it is
//!   `Send + Sync` and meant to be shared.
//! - `TwitterClient::with_context` scopes calls to a `CallContext`
//!   carrying a per-call deadline and a cancellation token.
//! - A call fails when the status is non-2xx or the body carries a
//!   non-empty `errors` array. Failures come back as `ClientError::Api`
//!   with every error item preserved.
//! - DTOs are defined independently from the mock-server crate; the
//!   integration tests catch schema drift.

pub mod client;
pub mod context;
mod endpoints;
pub mod error;
pub mod http;
mod oauth2;
pub mod options;
pub mod request;
pub mod response;
pub mod types;

pub use client::{ClientConfig, TwitterClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use context::{CallContext, CancelToken};
pub use error::{ApiErrorResponse, ApiResponseError, ClientError, ErrorShape, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use options::{
    ListExpansion, ListField, ListOptions, ListPageOptions, QueryOptions, TweetExpansion, TweetField,
    TweetPageOptions, UserExpansion, UserField, UserPageOptions,
};
pub use types::{
    BearerToken, CreateList, CreatedList, Deleted, Following, Includes, IsMember, List, ListResponse,
    ListsResponse, Meta, Pinned, Tweet, TweetAttachments, TweetsResponse, UpdateList, Updated, User,
    UsersResponse, Withheld,
};
