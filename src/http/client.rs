//! The one configured HTTP client every Resource shares.
//!
//! [`Transport`] is the seam: production code talks to the backend through
//! [`ReqwestTransport`], tests swap in [`MockTransport`](crate::framework::mock::MockTransport).
//! Everything above the seam (status mapping, 401 interception, JSON decoding)
//! lives in [`ApiClient`] so it exists exactly once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::session::SessionGuard;
use crate::config::PortalConfig;

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Undecoded response as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_disposition: None,
            body: Bytes::from(value.to_string()),
        }
    }
}

/// Sends a request and hands back whatever the server answered.
///
/// Implementations report only transport-level failures as errors; HTTP status
/// handling is the caller's business.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// `reqwest`-backed transport with a cookie store, so the backend's session
/// cookie is forwarded on every call.
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(config: &PortalConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = self.url_for(&request.path)?;
        let mut builder = self.http.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        Ok(RawResponse { status, content_disposition, body })
    }
}

/// Shared API client. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionGuard,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionGuard) -> Self {
        Self { transport, session }
    }

    pub fn from_config(config: &PortalConfig, session: SessionGuard) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(config)?), session))
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    /// Sends a request and maps the status: 2xx passes, 401 expires the
    /// session, anything else becomes [`ApiError::Server`].
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.dispatch(request, true).await
    }

    /// Same as [`send`](Self::send) but a 401 is returned as a plain
    /// [`ApiError::Server`] and leaves the session alone. Only the login call
    /// uses this: a rejected password is not an expired session.
    pub(crate) async fn send_credentials(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.dispatch(request, false).await
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn dispatch(&self, request: ApiRequest, intercept_401: bool) -> Result<RawResponse, ApiError> {
        debug!(query = ?request.query, "Sending request");
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Transport failure");
            e
        })?;

        match response.status {
            200..=299 => Ok(response),
            401 if intercept_401 => {
                self.session.expire();
                Err(ApiError::Auth)
            }
            status => {
                let message = error_message(status, &response.body);
                warn!(status, %message, "Request failed");
                Err(ApiError::Server { status, message })
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).with_json(body)?).await
    }

    /// Binary download; the body is returned undecoded with its headers.
    pub async fn get_bytes(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let response = self.send(request).await?;
        debug!(bytes = response.body.len(), "Received binary body");
        Ok(response)
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        decode(&response.body)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if body.is_empty() { b"null" } else { body };
    Ok(serde_json::from_slice(body)?)
}

/// Pulls a human-readable message out of an error body.
fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_owned))
        })
        .unwrap_or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Request failed with status {status}"))
        })
}
