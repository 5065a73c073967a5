//! Error types for the API client.
//!
//! # Design
//! Every operation surfaces exactly one `ClientError`. The variants separate
//! "we never sent a sane request" (`Configuration`, `InvalidArgument`,
//! `Serialization`) from "the exchange failed" (`Transport`) from "the
//! server answered but we could not read it" (`Decode`) from "the server
//! answered with an error" (`Api`). `Api` keeps the decoded error list so
//! callers can inspect per-item detail on failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by `TwitterClient` build, parse and call methods.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A credential or setting the operation depends on is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required identifier argument was empty.
    #[error("invalid argument: `{name}` must not be empty")]
    InvalidArgument { name: &'static str },

    /// The request could not be delivered or the exchange did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not the JSON document the endpoint returns.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request payload could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),

    /// The API reported one or more errors, or answered with a non-2xx status.
    #[error("{0}")]
    Api(Box<ApiErrorResponse>),
}

impl ClientError {
    /// Structured API error detail, when the server produced one.
    pub fn api_error(&self) -> Option<&ApiErrorResponse> {
        match self {
            ClientError::Api(resp) => Some(resp),
            _ => None,
        }
    }

    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|resp| resp.status)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(TransportError::Timeout(_)))
    }
}

impl From<ApiErrorResponse> for ClientError {
    fn from(resp: ApiErrorResponse) -> Self {
        ClientError::Api(Box::new(resp))
    }
}

/// Failures completing the HTTP exchange itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The call exceeded its deadline and was aborted.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The caller cancelled the in-flight call.
    #[error("request cancelled")]
    Cancelled,

    /// Connecting, writing the request or reading the response failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Decoded error payload of a failed call.
///
/// `title`/`detail`/`error_type` are the top-level problem fields sent with
/// validation failures; `errors` is the itemized list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorResponse {
    pub status: u16,
    pub errors: Vec<ApiResponseError>,
    pub title: Option<String>,
    pub detail: Option<String>,
    pub error_type: Option<String>,
}

impl ApiErrorResponse {
    /// True for a 404 or when any item is a resource-not-found problem.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
            || self.errors.iter().any(|e| {
                e.error_type
                    .as_deref()
                    .is_some_and(|t| t.ends_with("/resource-not-found"))
            })
    }
}

impl fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error (HTTP {})", self.status)?;
        if let Some(title) = &self.title {
            write!(f, ": {title}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        if let Some(first) = self.errors.first() {
            if let Some(text) = first.detail.as_deref().or(first.message.as_deref()) {
                write!(f, ": {text}")?;
            }
            if self.errors.len() > 1 {
                write!(f, " (+{} more)", self.errors.len() - 1)?;
            }
        }
        Ok(())
    }
}

/// Which of the API's error layouts an `ApiResponseError` was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    /// `{value, detail, title, resource_type, parameter, resource_id, type}`
    Resource,
    /// `{parameters, message}`
    Validation,
    /// `{code, label, message}` from the OAuth2 endpoints.
    OAuth,
    Unknown,
}

/// One itemized error. All fields are optional; which ones are populated
/// depends on the layout the endpoint emitted, see [`ErrorShape`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponseError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ApiResponseError {
    pub fn shape(&self) -> ErrorShape {
        if self.resource_type.is_some() || self.resource_id.is_some() {
            ErrorShape::Resource
        } else if self.code.is_some() || self.label.is_some() {
            ErrorShape::OAuth
        } else if !self.parameters.is_empty() || self.message.is_some() {
            ErrorShape::Validation
        } else {
            ErrorShape::Unknown
        }
    }
}
