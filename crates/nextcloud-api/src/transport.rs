//! Transport seam and the reqwest-backed implementation.
//!
//! A [`Transport`] turns a [`Request`] into a [`RawResponse`]. Any status
//! code the server answers with is a successful transport result; only calls
//! that never produce a response are errors.

use reqwest::Method;
use reqwest::blocking::Client;
use tracing::trace;

use crate::auth::basic_auth;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{Request, RequestBody};

/// Status, headers and body of a completed HTTP call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Executes requests against a server.
///
/// Implementations must not interpret status codes and must not retry.
pub trait Transport: Send + Sync {
    /// Issues `request` and returns whatever the server answered.
    fn execute(&self, request: &Request) -> ApiResult<RawResponse>;
}

/// Blocking HTTP transport built on reqwest.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    authorization: Option<String>,
}

impl HttpTransport {
    /// Creates a transport for the instance described by `config`.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::from_reqwest("failed to create HTTP client", e))?;

        let authorization = match (&config.username, &config.password) {
            (Some(user), Some(password)) => Some(basic_auth(user, password)),
            _ => None,
        };

        Ok(Self {
            client,
            endpoint: config.endpoint_str().to_string(),
            authorization,
        })
    }

    /// Returns the full URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> ApiResult<RawResponse> {
        let method = Method::from_bytes(request.verb.as_str().as_bytes()).map_err(|_| {
            ApiError::invalid_request(format!("invalid HTTP method: {}", request.verb))
        })?;
        let url = self.url_for(&request.path);

        let mut builder = self.client.request(method, &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query.to_pairs());
        }

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(ref auth) = self.authorization {
            builder = builder.header("Authorization", auth);
        }

        match &request.body {
            Some(RequestBody::Form(params)) => {
                builder = builder.form(&params.to_pairs());
            }
            Some(RequestBody::Raw { content_type, data }) => {
                builder = builder
                    .header("Content-Type", content_type)
                    .body(data.clone());
            }
            None => {}
        }

        trace!(method = %request.verb, url = %url, "Sending request");

        let response = builder
            .send()
            .map_err(|e| ApiError::from_reqwest("request failed", e))?;

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
            .bytes()
            .map_err(|e| ApiError::from_reqwest("failed to read response body", e))?
            .to_vec();

        trace!(status, bytes = body.len(), "Received response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
