//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network;
//! a `Transport` performs the single round-trip in between. Swapping the
//! transport is how tests feed canned status/body pairs to the decoder.
//!
//! All fields use owned types (`String`, `Vec`) so values can be stored,
//! logged and replayed without lifetime concerns.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use strum::Display;

use crate::context::CallContext;
use crate::error::TransportError;

/// How often a cancellable call looks at its token while waiting.
const CANCEL_POLL: Duration = Duration::from_millis(20);

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one `HttpRequest` and hands back whatever the server answered.
///
/// Non-2xx statuses are data, not errors: only failures to complete the
/// exchange (connect, timeout, cancellation) belong in `TransportError`.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Send under a per-call deadline and cancellation token.
    ///
    /// The default checks `context` before and after `send`, so a call that
    /// was cancelled or ran past its deadline never reports success.
    /// Transports that can abort in flight override this.
    fn send_with(&self, request: &HttpRequest, context: &CallContext) -> Result<HttpResponse, TransportError> {
        context.check()?;
        let response = self.send(request)?;
        context.check()?;
        Ok(response)
    }
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: String,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    /// Build a transport whose calls abort once `timeout` elapses.
    ///
    /// ureq's status-code-as-error behavior is disabled so 4xx/5xx bodies
    /// reach the decoder, which owns status interpretation.
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: user_agent.into(),
        }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.dispatch(request, None)
    }

    /// The remaining deadline becomes this request's global timeout. With a
    /// cancel token attached, the exchange runs on a worker thread and the
    /// caller returns `Cancelled` as soon as the token trips; the worker is
    /// left to finish within that same timeout.
    fn send_with(&self, request: &HttpRequest, context: &CallContext) -> Result<HttpResponse, TransportError> {
        context.check()?;
        let timeout = context.remaining();
        let Some(token) = context.cancel_token() else {
            return self.dispatch(request, timeout);
        };

        let (tx, rx) = mpsc::channel();
        let transport = self.clone();
        let request = request.clone();
        thread::spawn(move || {
            // The receiver is gone once the caller gave up on a cancelled call.
            let _ = tx.send(transport.dispatch(&request, timeout));
        });
        loop {
            match rx.recv_timeout(CANCEL_POLL) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) if token.is_cancelled() => return Err(TransportError::Cancelled),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TransportError::Connection("transport worker exited without a response".to_string()))
                }
            }
        }
    }
}

impl UreqTransport {
    /// One blocking exchange. `timeout` overrides the agent-wide timeout.
    fn dispatch(&self, request: &HttpRequest, timeout: Option<Duration>) -> Result<HttpResponse, TransportError> {
        let agent = &self.agent;
        let url = request.url.as_str();

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => self.prepare(agent.get(url), request, timeout).call(),
            (HttpMethod::Delete, _) => self.prepare(agent.delete(url), request, timeout).call(),
            (HttpMethod::Post, Some(body)) => {
                self.prepare(agent.post(url), request, timeout).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => self.prepare(agent.post(url), request, timeout).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                self.prepare(agent.put(url), request, timeout).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => self.prepare(agent.put(url), request, timeout).send_empty(),
        };

        let mut response = result.map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(map_ureq_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn prepare<B>(
        &self,
        builder: ureq::RequestBuilder<B>,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> ureq::RequestBuilder<B> {
        let mut builder = match timeout {
            Some(timeout) => builder.config().timeout_global(Some(timeout)).build(),
            None => builder,
        };
        builder = builder.header("user-agent", self.user_agent.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    let message = err.to_string();
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout(message),
        _ => TransportError::Connection(message),
    }
}
