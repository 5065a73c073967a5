//! App-only bearer tokens via the OAuth2 client-credentials exchange.
//!
//! Both calls authenticate with the consumer key and secret as Basic
//! credentials and send a form-encoded body. The issued token is stored on
//! the client and used by read endpoints until it is invalidated or
//! replaced.

use serde::Deserialize;
use tracing::info;

use crate::client::TwitterClient;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::RequestBuilder;
use crate::response::decode_document;
use crate::types::BearerToken;

const TOKEN_PATH: &str = "/oauth2/token";
const INVALIDATE_PATH: &str = "/oauth2/invalidate_token";

#[derive(Deserialize)]
struct InvalidatedToken {
    access_token: String,
}

impl TwitterClient {
    pub fn build_generate_app_only_bearer_token(&self) -> Result<HttpRequest, ClientError> {
        let (key, secret) = self.consumer_credentials()?;
        RequestBuilder::new(self.base_url(), HttpMethod::Post, TOKEN_PATH)
            .basic(key, secret)
            .form(&[("grant_type", "client_credentials")])
            .build()
    }

    /// Validate an issued token and store it on the client.
    pub fn parse_generate_app_only_bearer_token(&self, response: HttpResponse) -> Result<BearerToken, ClientError> {
        let token: BearerToken = decode_document(&response)?;
        if !token.token_type.eq_ignore_ascii_case("bearer") {
            return Err(ClientError::Decode(format!(
                "unexpected token type `{}`",
                token.token_type
            )));
        }
        if token.access_token.is_empty() {
            return Err(ClientError::Decode("token endpoint returned an empty access token".to_string()));
        }
        self.set_bearer_token(Some(token.access_token.clone()));
        info!(token_type = %token.token_type, "stored app-only bearer token");
        Ok(token)
    }

    /// Exchange the consumer credentials for an app-only bearer token.
    ///
    /// Fails with `Configuration` before any request when either consumer
    /// credential is missing or empty.
    pub fn generate_app_only_bearer_token(&self) -> Result<BearerToken, ClientError> {
        let request = self.build_generate_app_only_bearer_token()?;
        self.parse_generate_app_only_bearer_token(self.execute(&request)?)
    }

    pub fn build_invalidate_app_only_bearer_token(&self) -> Result<HttpRequest, ClientError> {
        let (key, secret) = self.consumer_credentials()?;
        let token = self
            .bearer_token()
            .ok_or_else(|| ClientError::Configuration("no app-only bearer token is held".to_string()))?;
        RequestBuilder::new(self.base_url(), HttpMethod::Post, INVALIDATE_PATH)
            .basic(key, secret)
            .form(&[("access_token", token.as_str())])
            .build()
    }

    /// Clear the held token if the server echoed it back. Returns the echoed token.
    pub fn parse_invalidate_app_only_bearer_token(&self, response: HttpResponse) -> Result<String, ClientError> {
        let echoed: InvalidatedToken = decode_document(&response)?;
        if self.clear_bearer_token_if(&echoed.access_token) {
            info!("invalidated app-only bearer token");
        } else {
            info!("invalidated token does not match the held token; keeping it");
        }
        Ok(echoed.access_token)
    }

    /// Revoke the held app-only bearer token.
    pub fn invalidate_app_only_bearer_token(&self) -> Result<String, ClientError> {
        let request = self.build_invalidate_app_only_bearer_token()?;
        self.parse_invalidate_app_only_bearer_token(self.execute(&request)?)
    }
}
