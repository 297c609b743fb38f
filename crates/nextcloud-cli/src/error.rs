//! CLI error types.

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
    /// Secret reference could not be resolved.
    #[error("secret error: {0}")]
    Secret(String),
    /// The request never got an answer, or could not be built.
    #[error(transparent)]
    Api(#[from] nextcloud_api::ApiError),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Output could not be rendered.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<url::ParseError> for CliError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid endpoint URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_their_message() {
        let err: CliError = nextcloud_api::ApiError::transport("connection refused")
            .with_wrapper("spreed")
            .into();
        assert_eq!(err.to_string(), "[spreed] transport_error: connection refused");
    }

    #[test]
    fn bad_endpoint_is_a_config_error() {
        let err: CliError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, CliError::Config(_)));
    }
}
