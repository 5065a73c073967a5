//! Response decoder: `HttpResponse` -> typed payload or `ClientError`.
//!
//! # Design
//! Either a non-2xx status or a non-empty `errors` array is enough to fail
//! a call; neither needs the other. Failed calls always come back as
//! `ClientError::Api` carrying whatever error detail the body held. A 2xx
//! body that is not JSON, or does not fit the endpoint's shape, is a
//! `Decode` error and never an empty success.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiErrorResponse, ApiResponseError, ClientError};
use crate::http::HttpResponse;
use crate::types::{Includes, Meta};

/// Error half of the envelope. Decoded leniently: unknown keys, including
/// `data`, are ignored, and `"errors": null` reads as no errors.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    errors: Option<Vec<ApiResponseError>>,
    title: Option<String>,
    detail: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

impl ErrorEnvelope {
    fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    fn into_api_error(self, status: u16) -> ApiErrorResponse {
        ApiErrorResponse {
            status,
            errors: self.errors.unwrap_or_default(),
            title: self.title,
            detail: self.detail,
            error_type: self.error_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<D> {
    data: Option<D>,
    meta: Option<Meta>,
    includes: Option<Includes>,
}

/// Success half of a decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<D> {
    pub data: Option<D>,
    pub meta: Option<Meta>,
    pub includes: Option<Includes>,
}

impl<D> Decoded<D> {
    /// The primary object of a single-object endpoint.
    pub fn require_data(self) -> Result<D, ClientError> {
        self.data
            .ok_or_else(|| ClientError::Decode("response contained neither data nor errors".to_string()))
    }
}

impl<T> Decoded<Vec<T>> {
    /// The items of a collection endpoint. An absent `data` with `meta`
    /// present is an empty page.
    pub fn into_page(self) -> Result<(Vec<T>, Option<Includes>, Option<Meta>), ClientError> {
        match (self.data, self.meta) {
            (Some(items), meta) => Ok((items, self.includes, meta)),
            (None, Some(meta)) => Ok((Vec::new(), self.includes, Some(meta))),
            (None, None) => Err(ClientError::Decode(
                "response contained neither data, meta nor errors".to_string(),
            )),
        }
    }
}

/// Decode an envelope `{data, meta, includes, errors}` whose `data` is `D`.
pub fn decode<D: DeserializeOwned>(response: &HttpResponse) -> Result<Decoded<D>, ClientError> {
    let value = classify(response)?;
    let envelope: Envelope<D> =
        Envelope::deserialize(value).map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(Decoded {
        data: envelope.data,
        meta: envelope.meta,
        includes: envelope.includes,
    })
}

/// Decode a body that is `T` itself rather than an envelope, after the same
/// failure classification `decode` applies.
pub fn decode_document<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ClientError> {
    let value = classify(response)?;
    T::deserialize(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Split failed responses from successful ones, returning the parsed JSON
/// of the latter.
fn classify(response: &HttpResponse) -> Result<Value, ClientError> {
    if !response.is_success() {
        let api_error = failure_from_body(response);
        warn!(
            status = response.status,
            errors = api_error.errors.len(),
            "API request failed"
        );
        return Err(api_error.into());
    }

    if response.body.trim().is_empty() {
        return Err(ClientError::Decode("empty response body".to_string()));
    }
    let value: Value =
        serde_json::from_str(&response.body).map_err(|e| ClientError::Decode(e.to_string()))?;

    let errors = ErrorEnvelope::deserialize(&value).map_err(|e| ClientError::Decode(e.to_string()))?;
    if errors.has_errors() {
        let errors = errors.into_api_error(response.status);
        warn!(
            status = response.status,
            errors = errors.errors.len(),
            "API reported errors on a successful status"
        );
        return Err(errors.into());
    }

    debug!(status = response.status, "decoded API response");
    Ok(value)
}

fn failure_from_body(response: &HttpResponse) -> ApiErrorResponse {
    let body = response.body.trim();
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.into_api_error(response.status),
        Err(_) => ApiErrorResponse {
            status: response.status,
            detail: (!body.is_empty()).then(|| body.to_string()),
            ..Default::default()
        },
    }
}
