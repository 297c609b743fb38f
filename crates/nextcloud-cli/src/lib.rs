//! Command-line client for the Nextcloud APIs.
//!
//! This crate provides the `nextcloud` binary: argument parsing, the
//! `config.toml` layer with secret references, and one command group per
//! endpoint wrapper.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
