//! nextcloud CLI entry point.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use nextcloud_api::NextCloud;
use nextcloud_cli::cli::{Cli, Command, ConfigAction};
use nextcloud_cli::commands;
use nextcloud_cli::config::CliConfig;
use nextcloud_cli::error::CliResult;
use nextcloud_core::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
    let loaded = if cli.config.is_some() {
        CliConfig::load_from(&config_path)
    } else {
        CliConfig::load()
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut tracing_config = if config.debug_enabled(cli.debug) {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Some(format) = cli.log_format {
        tracing_config = tracing_config.with_format(format);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    config.apply(cli.connection.overrides());
    debug!(path = %config_path.display(), "Configuration loaded");

    match run(cli, config, &config_path) {
        Ok(true) => ExitCode::SUCCESS,
        // The server answered with a failure status; the answer was printed.
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: CliConfig, config_path: &Path) -> CliResult<bool> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Command::Config { action } = cli.command {
        match action {
            ConfigAction::Dump => commands::config::dump(&mut out, &config, config_path)?,
            ConfigAction::Validate => commands::config::validate(&mut out, &config)?,
            ConfigAction::Path => commands::config::path(&mut out, config_path)?,
        }
        return Ok(true);
    }

    let client = NextCloud::new(config.to_client_config()?)?;
    info!(endpoint = client.config().endpoint_str(), "Connected client");

    let response = match cli.command {
        Command::Talk { action } => commands::talk::run(&client, action)?,
        Command::Files { action } => commands::files::run(&client, action)?,
        Command::Shares { action } => commands::shares::run(&client, action)?,
        Command::Users { action } => commands::users::run(&client, action)?,
        Command::Capabilities => commands::capabilities(&client)?,
        Command::Wrappers => {
            commands::wrappers(&mut out, &client)?;
            return Ok(true);
        }
        Command::Config { .. } => return Ok(true),
    };

    let success = commands::print_response(&mut out, &response)?;
    out.flush()?;
    Ok(success)
}
