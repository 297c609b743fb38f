//! Configuration commands.

use std::io::Write;
use std::path::Path;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::secret;

/// Writes the configuration as TOML, with a literal password masked.
pub fn dump(out: &mut impl Write, config: &CliConfig, path: &Path) -> CliResult<()> {
    let mut shown = config.clone();
    if let Some(ref password) = shown.server.password {
        if !secret::is_reference(password) {
            shown.server.password = Some("********".to_string());
        }
    }
    let toml_str = toml::to_string_pretty(&shown)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    writeln!(out, "# config.toml ({})", path.display())?;
    writeln!(out, "{}", toml_str)?;
    Ok(())
}

/// Checks that the configuration yields a usable client configuration.
pub fn validate(out: &mut impl Write, config: &CliConfig) -> CliResult<()> {
    let client = config.to_client_config()?;
    if !client.has_credentials() {
        writeln!(out, "No credentials configured; only public endpoints will work.")?;
    }
    writeln!(out, "Configuration is valid ({}).", client.endpoint_str())?;
    Ok(())
}

/// Shows the configuration file path.
pub fn path(out: &mut impl Write, path: &Path) -> CliResult<()> {
    writeln!(out, "config: {}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(password: &str) -> CliConfig {
        toml::from_str(&format!(
            "[server]\nendpoint = \"https://cloud.example.com\"\nusername = \"alice\"\npassword = \"{}\"\n",
            password
        ))
        .unwrap()
    }

    #[test]
    fn dump_masks_literal_password() {
        let mut out = Vec::new();
        dump(&mut out, &config("hunter2"), Path::new("/tmp/config.toml")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# config.toml (/tmp/config.toml)"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("********"));
    }

    #[test]
    fn dump_keeps_references() {
        let mut out = Vec::new();
        dump(&mut out, &config("pass::cloud/alice"), Path::new("c.toml")).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("pass::cloud/alice"));
    }

    #[test]
    fn validate_reports_endpoint() {
        let mut out = Vec::new();
        validate(&mut out, &config("pw")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Configuration is valid (https://cloud.example.com)"));
    }

    #[test]
    fn validate_rejects_missing_endpoint() {
        let mut out = Vec::new();
        assert!(validate(&mut out, &CliConfig::default()).is_err());
    }
}
