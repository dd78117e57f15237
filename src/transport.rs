use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::ApiError;
use crate::settings::SETTINGS;

/// One outbound call, described independently of any HTTP library so the
/// session can re-issue it with a different credential after a refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn with_bearer(mut self, bearer: Option<String>) -> Self {
        self.bearer = bearer;
        self
    }

    /// Path plus encoded query string, as sent on the wire.
    pub fn path_and_query(&self) -> Result<String, ApiError> {
        if self.query.is_empty() {
            return Ok(self.path.clone());
        }
        let encoded = serde_urlencoded::to_string(&self.query)?;
        Ok(format!("{}?{}", self.path, encoded))
    }
}

/// Raw response handed back by a transport: status plus body text.
/// Classification into the error taxonomy happens in the session layer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(ApiError::from)
    }
}

/// The HTTP seam. Production code uses [`HttpTransport`]; tests inject
/// scripted implementations so sessions stay fully isolated.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Transport backed by a pooled reqwest client. All paths are resolved
/// against the configured base URL; a single client-wide timeout applies to
/// every call.
pub struct HttpTransport {
    client: Arc<Client>,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport against the given base URL (no trailing slash).
    /// Optionally accepts a custom reqwest client for connection reuse and
    /// shared configuration.
    pub fn new(base_url: &str, custom_client: Option<Arc<Client>>) -> Self {
        let client = custom_client.unwrap_or_else(|| {
            Arc::new(
                Client::builder()
                    .pool_idle_timeout(Some(Duration::from_secs(600)))
                    .timeout(SETTINGS.request_timeout)
                    .connect_timeout(SETTINGS.connect_timeout)
                    .build()
                    .unwrap(),
            )
        });
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Transport against the base URL from settings (`VIDORA_API_URL`).
    pub fn from_settings() -> Self {
        Self::new(&SETTINGS.api_base_url, None)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path_and_query()?);
        trace!(method = %request.method, %url, "Sending request");

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(ref token) = request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::RequestFailed(e)
            }
        })?;

        debug!(method = %request.method, path = %request.path, %status, "Request completed");
        Ok(RawResponse::new(status, body))
    }
}
