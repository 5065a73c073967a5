//! Credential holder and request executor.
//!
//! # Design
//! `TwitterClient` owns its credentials outright. The API key and consumer
//! pair are fixed at construction; the app-only bearer token is the only
//! field that changes afterwards and it sits behind an `RwLock`, so token
//! regeneration never races in-flight reads. `with_context` hands out a
//! view of the same client whose calls run under a per-call deadline and
//! cancellation token. Each operation is split into
//! a `build_*` method (produces the request), a `parse_*` method (consumes
//! the response) and a method that runs both around one `Transport::send`.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::context::CallContext;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::request::RequestBuilder;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings recognized at construction. Unset fields fall back to the
/// defaults in [`ClientConfig::default`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    /// Deadline for a whole call; an expired call surfaces as a timeout.
    pub timeout: Duration,
    pub user_agent: String,
    /// Overrides the default `UreqTransport`.
    pub transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            consumer_key: None,
            consumer_secret: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("twtr/", env!("CARGO_PKG_VERSION")).to_string(),
            transport: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_consumer_key(mut self, key: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self
    }

    pub fn with_consumer_secret(mut self, secret: impl Into<String>) -> Self {
        self.consumer_secret = Some(secret.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &self.consumer_secret.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

/// Which credential authorizes a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// The generated app-only bearer token when held, else the API key.
    AppOnly,
    /// Always the API key (user-context token).
    User,
}

/// Client for the lists, list-members and OAuth2 endpoints.
pub struct TwitterClient {
    api_key: String,
    base_url: Url,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    bearer_token: Arc<RwLock<Option<String>>>,
    transport: Arc<dyn Transport>,
    context: CallContext,
}

impl fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterClient")
            .field("base_url", &self.base_url.as_str())
            .field("consumer_key", &self.consumer_key)
            .field("has_bearer_token", &self.bearer_token().is_some())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl TwitterClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::Configuration(format!("invalid base URL `{}`: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base URL `{}` cannot carry a path",
                config.base_url
            )));
        }
        let transport = match config.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new(config.timeout, config.user_agent)),
        };
        Ok(Self {
            api_key: api_key.into(),
            base_url,
            consumer_key: config.consumer_key,
            consumer_secret: config.consumer_secret,
            bearer_token: Arc::new(RwLock::new(None)),
            transport,
            context: CallContext::default(),
        })
    }

    /// A view of this client whose calls run under `context`.
    ///
    /// The view shares the transport and the held bearer token, so a token
    /// generated or invalidated through it is seen by this client too.
    pub fn with_context(&self, context: CallContext) -> TwitterClient {
        TwitterClient {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            bearer_token: Arc::clone(&self.bearer_token),
            transport: Arc::clone(&self.transport),
            context,
        }
    }

    pub fn context(&self) -> &CallContext {
        &self.context
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn consumer_key(&self) -> Option<&str> {
        self.consumer_key.as_deref()
    }

    pub fn consumer_secret(&self) -> Option<&str> {
        self.consumer_secret.as_deref()
    }

    /// The app-only bearer token currently held, if any.
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the held app-only bearer token.
    pub fn set_bearer_token(&self, token: Option<String>) {
        *self.bearer_token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Clear the held token only if it is still `token`.
    pub(crate) fn clear_bearer_token_if(&self, token: &str) -> bool {
        let mut held = self.bearer_token.write().unwrap_or_else(PoisonError::into_inner);
        if held.as_deref() == Some(token) {
            *held = None;
            true
        } else {
            false
        }
    }

    /// Consumer key and secret, both non-empty.
    pub(crate) fn consumer_credentials(&self) -> Result<(&str, &str), ClientError> {
        let key = self
            .consumer_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ClientError::Configuration("consumer key is not set".to_string()))?;
        let secret = self
            .consumer_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ClientError::Configuration("consumer secret is not set".to_string()))?;
        Ok((key, secret))
    }

    /// Start a request with the authorization header for `auth` attached.
    pub(crate) fn request<'a>(&'a self, method: HttpMethod, template: &'a str, auth: Auth) -> RequestBuilder<'a> {
        let generated = match auth {
            Auth::AppOnly => self.bearer_token(),
            Auth::User => None,
        };
        let token = generated.as_deref().unwrap_or(&self.api_key);
        RequestBuilder::new(&self.base_url, method, template).bearer(token)
    }

    /// Send one request through the configured transport, under this
    /// client's call context.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send_with(request, &self.context)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

/// Reject empty or whitespace-only identifiers before any request is built.
pub(crate) fn require<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidArgument { name });
    }
    Ok(value)
}
