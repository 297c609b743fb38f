//! HTTP Basic authentication (RFC 7617).
//!
//! Nextcloud accepts the account password or an app password here.

use base64::Engine;

/// Generates a Basic authentication header value.
///
/// The credentials are encoded as UTF-8 before base64, which is what the
/// server expects for non-ASCII passwords.
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}
