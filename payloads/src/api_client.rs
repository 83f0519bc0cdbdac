use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::accessors::{BookingsAPI, ServicesAPI, UsersAPI};
use crate::events::{
    Navigator, Notice, Notifier, REQUEST_TIMEOUT, SERVER_ERROR,
    SESSION_EXPIRED, Silent,
};
use crate::storage::TokenStore;

pub const DEFAULT_ADDRESS: &str = "http://localhost:5888";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// An API client for interfacing with the backend.
///
/// The bearer token is read from `tokens` when each request is built, never
/// cached. Failed requests are reported through `notifier` (and, on 401,
/// `navigator`) exactly once before the error is returned; nothing is
/// retried.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub tokens: TokenStore,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    /// Serve fabricated data instead of failing. See [`Sourced`].
    pub demo_mode: bool,
}

/// Data returned by an accessor, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    /// The server's payload.
    Live(T),
    /// Demo data substituted for a failed request.
    Fallback(T),
}

impl<T> Sourced<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Self::Live(value) | Self::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Live(value) | Self::Fallback(value) => value,
        }
    }
}

/// Construction
impl APIClient {
    pub fn new(
        address: &str,
        timeout: Duration,
        tokens: TokenStore,
    ) -> Result<Self, ClientError> {
        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            inner_client,
            tokens,
            notifier: Arc::new(Silent),
            navigator: Arc::new(Silent),
            demo_mode: false,
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }
}

/// Resource accessors
impl APIClient {
    pub fn services(&self) -> ServicesAPI<'_> {
        ServicesAPI { client: self }
    }

    pub fn bookings(&self) -> BookingsAPI<'_> {
        BookingsAPI { client: self }
    }

    pub fn users(&self) -> UsersAPI<'_> {
        UsersAPI { client: self }
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/{path}", &self.address)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.inner_client.request(method, self.format_url(path));
        match self.tokens.get() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    pub(crate) async fn get(&self, path: &str) -> Result<String, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub(crate) async fn get_with_query(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> Result<String, ClientError> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub(crate) async fn post(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<String, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn patch(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<String, ClientError> {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    pub(crate) async fn delete(
        &self,
        path: &str,
    ) -> Result<String, ClientError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// Execute a request and read its body, running the interceptors on
    /// failure. The timeout covers the body as well as the headers.
    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<String, ClientError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_failure(e)),
        };
        let status = response.status();
        let url = response.url().to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(self.transport_failure(e));
            }
            Err(e) => {
                tracing::warn!(%url, %status, "failed to read error body: {e}");
                String::new()
            }
        };
        if status.is_success() {
            return Ok(body);
        }
        self.intercept_status(status, &url);
        Err(ClientError::APIError(status, body))
    }

    fn transport_failure(&self, e: reqwest::Error) -> ClientError {
        let error = ClientError::from(e);
        self.intercept_transport(&error);
        error
    }

    pub(crate) fn intercept_transport(&self, error: &ClientError) {
        match error {
            ClientError::Timeout => {
                tracing::error!("{error}");
                self.notifier.notify(Notice::error(REQUEST_TIMEOUT));
            }
            _ => tracing::error!("{error}"),
        }
    }

    pub(crate) fn intercept_status(&self, status: StatusCode, url: &str) {
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(%url, "Session rejected, clearing token");
                self.tokens.clear();
                self.navigator.redirect_to_login();
                self.notifier.notify(Notice::error(SESSION_EXPIRED));
            }
            StatusCode::NOT_FOUND => {
                tracing::warn!(%url, "Endpoint not found");
            }
            s if s.is_server_error() => {
                tracing::error!(%url, %status, "Server error");
                self.notifier.notify(Notice::error(SERVER_ERROR));
            }
            _ => tracing::warn!(%url, %status, "Request rejected"),
        }
    }

    /// Apply the demo-mode policy to the result of a request.
    pub(crate) fn or_fallback<T>(
        &self,
        action: &str,
        result: Result<T, ClientError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<Sourced<T>, ClientError> {
        match result {
            Ok(value) => Ok(Sourced::Live(value)),
            Err(e) if self.demo_mode => {
                tracing::warn!("Error {action}: {e}; serving demo data");
                Ok(Sourced::Fallback(fallback()))
            }
            Err(e) => {
                tracing::error!("Error {action}: {e}");
                Err(e)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Request timeout. Please check your connection.")]
    Timeout,
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),
    #[error("Unexpected response from the server")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e)
        }
    }
}
