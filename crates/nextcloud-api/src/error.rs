//! Error types for client-side failures.
//!
//! Only failures that happen on this side of the wire are errors: the
//! transport could not complete the call, the request could not be built, or
//! the client is misconfigured. A completed call whose status code marks a
//! remote failure is returned as a normal [`Response`](crate::Response) with
//! `is_success() == false`.

use std::fmt;
use thiserror::Error;

/// The category of an API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// The HTTP call could not complete (DNS, connection refused, TLS, broken body).
    Transport,
    /// The transport gave up waiting for the server.
    Timeout,
    /// The request could not be built (bad URL, bad header value).
    InvalidRequest,
    /// Missing or invalid client configuration, or an unregistered wrapper.
    Configuration,
    /// Unexpected internal state.
    Internal,
}

impl ApiErrorCode {
    /// Returns true for failures of the network call itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport | Self::Timeout)
    }

    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport_error",
            Self::Timeout => "timeout",
            Self::InvalidRequest => "invalid_request",
            Self::Configuration => "configuration_error",
            Self::Internal => "internal_error",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while issuing a request.
#[derive(Debug, Error)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
    /// Wrapper group that issued the request (e.g. "spreed", "webdav").
    wrapper: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            wrapper: None,
            source: None,
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Transport, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Timeout, message)
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidRequest, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Configuration, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }

    /// Converts a reqwest error, keeping it as the source.
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ApiErrorCode::Timeout
        } else if err.is_builder() {
            ApiErrorCode::InvalidRequest
        } else {
            ApiErrorCode::Transport
        };
        Self::new(code, format!("{}: {}", context, err)).with_source(err)
    }

    /// Sets the wrapper name for this error.
    pub fn with_wrapper(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapper = Some(wrapper.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the wrapper name, if set.
    pub fn wrapper(&self) -> Option<&str> {
        self.wrapper.as_deref()
    }

    /// Returns true if the network call itself failed.
    pub fn is_transport(&self) -> bool {
        self.code.is_transport()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref wrapper) = self.wrapper {
            write!(f, "[{}] ", wrapper)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
