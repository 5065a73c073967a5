//! Request builder: path template + query options + auth + body -> `HttpRequest`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use url::{form_urlencoded, Url};

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::options::QueryOptions;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Builds one `HttpRequest` against a base URL.
///
/// Path templates use `{name}` segments (`/2/lists/{id}/members`). Each
/// substituted value becomes exactly one path segment, percent-encoded as
/// needed. Query keys are unique: setting a key twice keeps the last value
/// in the position of the first.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    base_url: &'a Url,
    method: HttpMethod,
    template: &'a str,
    path_params: Vec<(&'a str, &'a str)>,
    query: Vec<(&'static str, String)>,
    authorization: Option<String>,
    body: Option<(&'static str, String)>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_url: &'a Url, method: HttpMethod, template: &'a str) -> Self {
        Self {
            base_url,
            method,
            template,
            path_params: Vec::new(),
            query: Vec::new(),
            authorization: None,
            body: None,
        }
    }

    pub fn path_param(mut self, name: &'a str, value: &'a str) -> Self {
        self.path_params.push((name, value));
        self
    }

    /// Apply every pair an options value contributes, in its order.
    pub fn options(mut self, options: &dyn QueryOptions) -> Self {
        for (key, value) in options.query_pairs() {
            self = self.query(key, value);
        }
        self
    }

    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.authorization = Some(format!("Bearer {token}"));
        self
    }

    /// Basic credentials as the OAuth2 token endpoints expect them: both
    /// halves form-encoded before being joined and base64-encoded.
    pub fn basic(mut self, key: &str, secret: &str) -> Self {
        let key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        let secret: String = form_urlencoded::byte_serialize(secret.as_bytes()).collect();
        let encoded = STANDARD.encode(format!("{key}:{secret}"));
        self.authorization = Some(format!("Basic {encoded}"));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        let body = serde_json::to_string(body).map_err(|e| ClientError::Serialization(e.to_string()))?;
        self.body = Some((JSON_CONTENT_TYPE, body));
        Ok(self)
    }

    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.body = Some((FORM_CONTENT_TYPE, body));
        self
    }

    pub fn build(self) -> Result<HttpRequest, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::Configuration(format!("base URL `{}` cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in self.template.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = self
                            .path_params
                            .iter()
                            .find(|(k, _)| *k == name)
                            .map(|(_, v)| *v)
                            .ok_or_else(|| {
                                ClientError::Configuration(format!(
                                    "path parameter `{name}` of `{}` has no value",
                                    self.template
                                ))
                            })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut headers = Vec::new();
        if let Some(auth) = self.authorization {
            headers.push(("authorization".to_string(), auth));
        }
        let body = self.body.map(|(content_type, body)| {
            headers.push(("content-type".to_string(), content_type.to_string()));
            body
        });

        Ok(HttpRequest {
            method: self.method,
            url: url.into(),
            headers,
            body,
        })
    }
}
