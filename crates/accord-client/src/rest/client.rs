//! REST HTTP client implementation.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use accord_core::error::TransportError;
use accord_core::{ApiUrl, Error, Result, SessionToken};

use crate::config;

use super::endpoints::ApiErrorResponse;

/// Fixed client identification sent on every outbound request. One static
/// value per process, independent of any session.
pub const CLIENT_USER_AGENT: &str = concat!(
    "accord (https://github.com/accord-rs/accord, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// HTTP client for the REST API.
///
/// Thin wrapper over reqwest that applies the process-wide proxy settings,
/// the client identification header, and unified response handling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl ApiClient {
    /// Create a new client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed, e.g. when
    /// the process-wide proxy settings are unusable.
    pub fn new(api: ApiUrl) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(CLIENT_USER_AGENT);

        if let Some(proxy) = config::proxy_settings() {
            let proxy = reqwest::Proxy::all(proxy.url()).map_err(from_reqwest)?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(from_reqwest)?;

        Ok(Self { client, api })
    }

    /// Returns the API base URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Make an unauthenticated POST, returning the raw status and body.
    ///
    /// Used by the authenticator, which owns the protocol-level
    /// classification of non-2xx responses. Only transport failures error.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post_raw<B>(&self, endpoint: &str, body: &B) -> Result<(u16, String)>
    where
        B: Serialize,
    {
        let url = self.api.endpoint(endpoint);
        debug!(endpoint, "POST");

        let response = self.client.post(&url).json(body).send().await.map_err(from_reqwest)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(from_reqwest)?;
        trace!(status, "response received");

        Ok((status, body))
    }

    /// Make an authenticated PATCH, returning the raw status and body.
    #[instrument(skip(self, body, token), fields(api = %self.api))]
    pub async fn patch_raw<B>(
        &self,
        endpoint: &str,
        body: &B,
        token: &SessionToken,
    ) -> Result<(u16, String)>
    where
        B: Serialize,
    {
        let url = self.api.endpoint(endpoint);
        debug!(endpoint, "PATCH");

        let response = self
            .client
            .patch(&url)
            .json(body)
            .headers(self.auth_headers(token)?)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(from_reqwest)?;
        trace!(status, "response received");

        Ok((status, body))
    }

    /// Make an authenticated GET and deserialize a 2xx body.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub async fn get<R>(&self, endpoint: &str, token: &SessionToken) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(endpoint);
        debug!(endpoint, "GET");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers(token)?)
            .send()
            .await
            .map_err(from_reqwest)?;

        self.handle_response(response).await
    }

    /// Create authorization headers for authenticated requests.
    ///
    /// The platform expects the raw token in the authorization header, not a
    /// bearer scheme. Tokens are server-issued, so one that cannot be placed
    /// in a header is a malformed response rather than caller error.
    fn auth_headers(&self, token: &SessionToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value =
            HeaderValue::from_str(token.expose()).map_err(|e| TransportError::MalformedResponse {
                message: format!("token is not header-safe: {e}"),
            })?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Handle a typed response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "response received");

        if status.is_success() {
            let body = response.text().await.map_err(from_reqwest)?;
            serde_json::from_str(&body).map_err(|e| {
                TransportError::MalformedResponse {
                    message: e.to_string(),
                }
                .into()
            })
        } else {
            let message = self.parse_error_response(response).await;
            Err(TransportError::Http {
                message: format!("HTTP {}: {}", status.as_u16(), message),
            }
            .into())
        }
    }

    /// Extract a human-readable message from an error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> String {
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(parsed) => parsed.message.unwrap_or(body),
            Err(_) => body,
        }
    }
}

/// Map a reqwest failure into the transport error taxonomy.
fn from_reqwest(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}
