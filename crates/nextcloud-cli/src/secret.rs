//! Password values that point somewhere else.
//!
//! `password` in `config.toml` (and `--password`) holds either the app
//! password itself or a reference that is looked up when the client is
//! built. `pass::<entry>` takes the first line of a password-store entry,
//! `env::<NAME>` takes an environment variable.

use std::process::Command;

use tracing::debug;

use crate::error::{CliError, CliResult};

/// Where a configured password comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source<'a> {
    Literal(&'a str),
    PasswordStore(&'a str),
    Environment(&'a str),
}

impl<'a> Source<'a> {
    fn of(value: &'a str) -> Self {
        if let Some(entry) = value.strip_prefix("pass::") {
            Self::PasswordStore(entry)
        } else if let Some(name) = value.strip_prefix("env::") {
            Self::Environment(name)
        } else {
            Self::Literal(value)
        }
    }
}

/// True when `value` is looked up rather than used as is.
pub fn is_reference(value: &str) -> bool {
    !matches!(Source::of(value), Source::Literal(_))
}

/// Returns the password `value` stands for.
pub fn resolve(value: &str) -> CliResult<String> {
    match Source::of(value) {
        Source::Literal(password) => Ok(password.to_owned()),
        Source::Environment(name) => {
            debug!(name, "Reading password from environment");
            std::env::var(name)
                .map_err(|_| CliError::Secret(format!("${} is not set", name)))
        }
        Source::PasswordStore(entry) => {
            debug!(entry, "Reading password from pass");
            from_password_store(entry)
        }
    }
}

fn from_password_store(entry: &str) -> CliResult<String> {
    let output = Command::new("pass")
        .args(["show", entry])
        .output()
        .map_err(|e| CliError::Secret(format!("cannot run pass for {}: {}", entry, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CliError::Secret(format!(
            "pass could not read {}: {}",
            entry,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().next() {
        Some(line) if !line.is_empty() => Ok(line.to_owned()),
        _ => Err(CliError::Secret(format!("pass entry {} is empty", entry))),
    }
}
