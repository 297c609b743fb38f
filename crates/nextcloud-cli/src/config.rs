//! CLI configuration.
//!
//! Settings live in `config.toml`, by default at
//! `~/.config/nextcloud/config.toml`:
//!
//! ```toml
//! [server]
//! endpoint = "https://cloud.example.com"
//! username = "alice"
//! password = "pass::nextcloud/alice"
//! ```
//!
//! The password supports secret references (`pass::…`, `env::…`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};
use crate::secret;

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Debug logging.
    pub debug: bool,

    /// Instance and credentials.
    pub server: ServerSettings,
}

/// Connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Instance URL, including any sub path.
    pub endpoint: Option<String>,

    pub username: Option<String>,

    /// Account or app password (supports `pass::` and `env::` prefixes).
    pub password: Option<String>,

    /// Request JSON from OCS endpoints.
    pub json_output: bool,

    /// Verify the server certificate.
    pub verify_tls: bool,

    /// Request timeout in seconds, 0 to disable.
    pub timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            password: None,
            json_output: true,
            verify_tls: true,
            timeout: nextcloud_api::ClientConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Loads the default file, or defaults when it does not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from `path`.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nextcloud")
            .join("config.toml")
    }

    /// Debug logging is on when `--debug` is given or the file asks for it.
    pub fn debug_enabled(&self, flag: bool) -> bool {
        flag || self.debug
    }

    /// Merges `overrides` into the file settings.
    pub fn apply(&mut self, overrides: Overrides) {
        let server = &mut self.server;
        if overrides.endpoint.is_some() {
            server.endpoint = overrides.endpoint;
        }
        if overrides.username.is_some() {
            server.username = overrides.username;
        }
        if overrides.password.is_some() {
            server.password = overrides.password;
        }
        if overrides.insecure {
            server.verify_tls = false;
        }
        if let Some(timeout) = overrides.timeout {
            server.timeout = timeout;
        }
    }

    /// Builds the library configuration, resolving the password reference.
    pub fn to_client_config(&self) -> CliResult<nextcloud_api::ClientConfig> {
        let server = &self.server;
        let endpoint = server.endpoint.as_deref().ok_or_else(|| {
            CliError::Config(format!(
                "no endpoint configured. Add to {}:\n  \
                 [server]\n  \
                 endpoint = \"https://cloud.example.com\"\n\n  \
                 Or pass --endpoint",
                Self::default_path().display()
            ))
        })?;

        let mut config = nextcloud_api::ClientConfig::new(endpoint)?
            .with_json_output(server.json_output)
            .with_timeout((server.timeout > 0).then(|| Duration::from_secs(server.timeout)));

        if !server.verify_tls {
            config = config.with_insecure_tls();
        }

        match (&server.username, &server.password) {
            (Some(username), Some(password)) => {
                let password = secret::resolve(password)?;
                config = config.with_credentials(username.as_str(), password);
            }
            (Some(_), None) => {
                return Err(CliError::Config(
                    "username is set but password is missing".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(CliError::Config(
                    "password is set but username is missing".to_string(),
                ));
            }
            (None, None) => {}
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CliConfig::default();
        assert!(!config.debug);
        assert!(config.server.json_output);
        assert!(config.server.verify_tls);
        assert_eq!(config.server.timeout, 30);
        assert!(CliConfig::default_path().ends_with("nextcloud/config.toml"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
debug = true

[server]
endpoint = "https://cloud.example.com/nc"
username = "alice"
password = "secret"
timeout = 10
"#
        )
        .unwrap();

        let config = CliConfig::load_from(file.path()).unwrap();
        assert!(config.debug);
        assert_eq!(config.server.endpoint.as_deref(), Some("https://cloud.example.com/nc"));
        assert_eq!(config.server.timeout, 10);
        assert!(config.server.verify_tls);

        let client = config.to_client_config().unwrap();
        assert_eq!(client.endpoint_path(), "/nc");
        assert_eq!(client.username(), Some("alice"));
        assert_eq!(client.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn debug_from_file_or_flag() {
        let quiet = CliConfig::default();
        assert!(!quiet.debug_enabled(false));
        assert!(quiet.debug_enabled(true));

        let verbose: CliConfig = toml::from_str("debug = true\n").unwrap();
        assert!(verbose.debug_enabled(false));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nendpoint = ").unwrap();
        let err = CliConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config: CliConfig = toml::from_str(
            "[server]\nendpoint = \"https://a.example.com\"\nusername = \"alice\"\n",
        )
        .unwrap();
        config.apply(Overrides {
            endpoint: Some("https://b.example.com".into()),
            password: Some("pw".into()),
            insecure: true,
            timeout: Some(0),
            ..Default::default()
        });

        assert_eq!(config.server.endpoint.as_deref(), Some("https://b.example.com"));
        assert_eq!(config.server.username.as_deref(), Some("alice"));
        assert!(!config.server.verify_tls);

        let client = config.to_client_config().unwrap();
        assert!(!client.verify_tls);
        assert!(client.timeout.is_none());
        assert!(client.has_credentials());
    }

    #[test]
    fn password_reference_is_resolved() {
        unsafe {
            std::env::set_var("_NEXTCLOUD_CFG_TEST_PASSWORD", "from-env");
        }
        let config: CliConfig = toml::from_str(
            "[server]\nendpoint = \"https://cloud.example.com\"\nusername = \"alice\"\npassword = \"env::_NEXTCLOUD_CFG_TEST_PASSWORD\"\n",
        )
        .unwrap();
        let client = config.to_client_config().unwrap();
        assert_eq!(client.password.as_deref(), Some("from-env"));
        unsafe {
            std::env::remove_var("_NEXTCLOUD_CFG_TEST_PASSWORD");
        }
    }

    #[test]
    fn missing_endpoint_errors() {
        let err = CliConfig::default().to_client_config().unwrap_err();
        assert!(err.to_string().contains("no endpoint configured"));
    }

    #[test]
    fn half_credentials_error() {
        let config: CliConfig =
            toml::from_str("[server]\nendpoint = \"https://c.example.com\"\nusername = \"alice\"\n")
                .unwrap();
        assert!(config.to_client_config().is_err());
    }
}
