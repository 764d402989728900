//! HTTP client for the Pulse backend
//!
//! Every contract call is funnelled through [`ApiClient`], which builds an
//! [`ApiRequest`] and hands it to a [`Transport`]. The production transport
//! wraps reqwest; tests substitute a recording transport. There is no retry,
//! caching, or memoization layer: one contract call is one request.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::blob::Blob;
use crate::core::Config;

/// Result alias for contract calls
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP method of a contract call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully built request, relative to the configured API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path beginning with `/`, e.g. `/team/invitations`
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
}

/// Raw response as seen by the client
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// JSON response with the given status
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            content_disposition: None,
            body: value.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors returned by contract calls
///
/// The variants exist for logging and tests. Anything shown to a user goes
/// through [`ApiError::user_message`], which does not distinguish them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed with status {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    #[error("network error: {message}")]
    Transport { message: String },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("failed to encode request: {message}")]
    Encode { message: String },

    #[error("invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl ApiError {
    /// Structured message supplied by the backend, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Flat, user-facing message: the context, enriched with the backend detail
    pub fn user_message(&self, context: &str) -> String {
        match self.detail() {
            Some(detail) => format!("{}: {}", context, detail),
            None => context.to_string(),
        }
    }
}

/// Pull the `detail` field out of an error body
///
/// String details are returned as-is; structured details (validation error
/// lists and the like) are rendered as compact JSON.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Flatten a serializable query struct into key/value pairs
///
/// `None` fields are omitted, arrays repeat their key, everything else is
/// passed through untouched.
pub fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> ApiResult<Vec<(String, String)>> {
    let value = serde_json::to_value(query).map_err(|e| ApiError::Encode {
        message: e.to_string(),
    })?;

    let mut pairs = Vec::new();
    let serde_json::Value::Object(map) = value else {
        return Ok(pairs);
    };

    for (key, value) in map {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_to_string(item)));
                }
            }
            other => pairs.push((key, scalar_to_string(other))),
        }
    }
    Ok(pairs)
}

fn scalar_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Sends a request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the given base URL (e.g. `https://host/api`)
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        reqwest::Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), self.url_for(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::Transport {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let content_disposition = header(reqwest::header::CONTENT_DISPOSITION);

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport {
                message: e.to_string(),
            })?
            .to_vec();

        Ok(ApiResponse {
            status,
            content_type,
            content_disposition,
            body,
        })
    }
}

/// Entry point for all contract calls
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build a client talking HTTP to the configured backend
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let transport = HttpTransport::new(&config.api_url(), config.timeout())?
            .with_token(config.token.clone());
        Ok(Self::new(Arc::new(transport)))
    }

    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, query = ?request.query, "sending request");

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(%method, %path, error = %e, "request failed");
            e
        })?;

        debug!(%method, %path, status = response.status, "received response");

        if !response.is_success() {
            let detail = extract_detail(&response.body);
            warn!(%method, %path, status = response.status, detail = ?detail, "backend rejected request");
            return Err(ApiError::Status {
                status: response.status,
                detail,
            });
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ApiResult<T> {
        serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }

    fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<serde_json::Value> {
        serde_json::to_value(body).map_err(|e| ApiError::Encode {
            message: e.to_string(),
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(ApiRequest::new(Method::Get, path)).await?;
        Self::decode(&response)
    }

    pub(crate) async fn get_with<Q, T>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = ApiRequest::new(Method::Get, path);
        request.query = query_pairs(query)?;
        let response = self.execute(request).await?;
        Self::decode(&response)
    }

    async fn send_body<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = ApiRequest::new(method, path);
        request.body = body.map(Self::encode).transpose()?;
        let response = self.execute(request).await?;
        Self::decode(&response)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_body(Method::Post, path, Some(body)).await
    }

    /// POST without a request body (action endpoints such as resend/revoke)
    pub(crate) async fn post_action<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_body::<serde_json::Value, T>(Method::Post, path, None)
            .await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_body(Method::Put, path, Some(body)).await
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_body(Method::Patch, path, Some(body)).await
    }

    /// DELETE; the response body, if any, is ignored
    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    /// GET a binary payload, keeping its content type and suggested filename
    pub(crate) async fn get_blob(&self, path: &str) -> ApiResult<Blob> {
        let response = self.execute(ApiRequest::new(Method::Get, path)).await?;
        Ok(Blob::from_response(response))
    }
}
