//! Subcommand implementations.

pub mod config;
pub mod files;
pub mod shares;
pub mod talk;
pub mod users;

use std::io::Write;

use nextcloud_api::{NextCloud, Response};
use tracing::info;

use crate::error::CliResult;

/// Writes the response as pretty JSON and returns its success flag.
pub fn print_response(out: &mut impl Write, response: &Response) -> CliResult<bool> {
    serde_json::to_writer_pretty(&mut *out, &response.to_summary_json())?;
    writeln!(out)?;
    Ok(response.is_success())
}

/// Lists the wrappers the client exposes.
pub fn wrappers(out: &mut impl Write, client: &NextCloud) -> CliResult<()> {
    for descriptor in client.registry().iter() {
        writeln!(
            out,
            "{:<14} {:<13} {}",
            descriptor.name,
            descriptor.dialect,
            descriptor.base_path()
        )?;
    }
    info!(count = client.registry().len(), "Listed wrappers");
    Ok(())
}

/// Shows server capabilities.
pub fn capabilities(client: &NextCloud) -> CliResult<Response> {
    Ok(client.capabilities().get_capabilities()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextcloud_api::{ClientConfig, Dialect, RawResponse, Request};

    #[test]
    fn prints_summary_json() {
        let request = Request::get("/ocs/v1.php/cloud/capabilities");
        let raw = RawResponse::new(
            200,
            r#"{"ocs":{"meta":{"status":"ok","statuscode":100},"data":{"version":{"major":28}}}}"#,
        );
        let response = Response::new(&request, Dialect::OcsV1, raw, true, &request.path);

        let mut out = Vec::new();
        assert!(print_response(&mut out, &response).unwrap());
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["data"]["version"]["major"], 28);
        assert_eq!(printed["status_code"], 100);
    }

    #[test]
    fn lists_registered_wrappers() {
        let config = ClientConfig::new("https://cloud.example.com").unwrap();
        let client = NextCloud::new(config).unwrap();
        let mut out = Vec::new();
        wrappers(&mut out, &client).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("spreed"));
        assert!(text.contains("/ocs/v2.php/apps/spreed/api/v3"));
        assert!(!text.contains("group_folders"));
    }
}
