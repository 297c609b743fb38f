//! Client configuration.

use std::fmt;
use std::time::Duration;
use url::Url;

/// Connection settings shared by every wrapper of a client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Nextcloud instance (may include a sub-path).
    pub endpoint: Url,

    /// Username for HTTP Basic authentication.
    pub username: Option<String>,

    /// Password or app token for HTTP Basic authentication.
    pub password: Option<String>,

    /// Ask OCS endpoints for JSON (`format=json`) and parse it.
    pub json_output: bool,

    /// Whether to verify TLS certificates.
    pub verify_tls: bool,

    /// Transport timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// User agent string.
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("json_output", &self.json_output)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the instance at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        Ok(Self {
            endpoint,
            username: None,
            password: None,
            json_output: true,
            verify_tls: true,
            timeout: Some(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS)),
            user_agent: format!("nextcloud-api-rs/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the credentials for authentication.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Enables or disables JSON output for OCS endpoints.
    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }

    /// Disables TLS verification (for self-signed test instances only).
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Sets the transport timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the endpoint with any trailing slash removed.
    pub fn endpoint_str(&self) -> &str {
        self.endpoint.as_str().trim_end_matches('/')
    }

    /// Returns the path component of the endpoint without trailing slash.
    ///
    /// Empty for instances served at the domain root.
    pub fn endpoint_path(&self) -> &str {
        self.endpoint.path().trim_end_matches('/')
    }

    /// Returns true if credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Returns the configured username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
