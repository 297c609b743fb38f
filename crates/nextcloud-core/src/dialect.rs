//! Protocol dialects and their success-code tables.
//!
//! Every group of Nextcloud endpoints speaks one dialect. The dialect decides
//! which status codes count as success for a given verb and whether the
//! response body is JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codes::{ocs, provisioning, webdav};

/// HTTP verbs used by the Nextcloud APIs, WebDAV extensions included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Propfind,
    Proppatch,
    Report,
    Mkcol,
    Copy,
    Move,
}

impl HttpVerb {
    /// All verbs, in declaration order.
    pub const ALL: [HttpVerb; 10] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Propfind,
        Self::Proppatch,
        Self::Report,
        Self::Mkcol,
        Self::Copy,
        Self::Move,
    ];

    /// Returns the method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Propfind => "PROPFIND",
            Self::Proppatch => "PROPPATCH",
            Self::Report => "REPORT",
            Self::Mkcol => "MKCOL",
            Self::Copy => "COPY",
            Self::Move => "MOVE",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown HTTP verb: {}", s))
    }
}

/// Request/response convention of a group of endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// OCS endpoints under `/ocs/v1.php`.
    OcsV1,
    /// OCS endpoints under `/ocs/v2.php`.
    OcsV2,
    /// User and group provisioning API.
    Provisioning,
    /// WebDAV endpoints under `/remote.php/dav`.
    WebDav,
}

const OCS_V1_SUCCESS: &[u16] = &[ocs::SUCCESS_V1];
const OCS_V2_SUCCESS: &[u16] = &[ocs::SUCCESS_V2];
const PROVISIONING_SUCCESS: &[u16] = &[provisioning::SUCCESS];

const DAV_MULTISTATUS: &[u16] = &[webdav::MULTISTATUS];
const DAV_CREATED: &[u16] = &[webdav::CREATED];
const DAV_NO_CONTENT: &[u16] = &[webdav::NO_CONTENT];
const DAV_CREATED_OR_NO_CONTENT: &[u16] = &[webdav::CREATED, webdav::NO_CONTENT];

impl Dialect {
    /// All dialects.
    pub const ALL: [Dialect; 4] = [Self::OcsV1, Self::OcsV2, Self::Provisioning, Self::WebDav];

    /// Returns the status codes considered successful for `verb`.
    ///
    /// OCS-family dialects have one code regardless of the verb. WebDAV
    /// returns an empty slice for verbs it has no entry for.
    pub fn success_codes(self, verb: HttpVerb) -> &'static [u16] {
        match self {
            Self::OcsV1 => OCS_V1_SUCCESS,
            Self::OcsV2 => OCS_V2_SUCCESS,
            Self::Provisioning => PROVISIONING_SUCCESS,
            Self::WebDav => match verb {
                HttpVerb::Propfind | HttpVerb::Proppatch | HttpVerb::Report => DAV_MULTISTATUS,
                HttpVerb::Mkcol | HttpVerb::Put | HttpVerb::Post => DAV_CREATED,
                HttpVerb::Copy | HttpVerb::Move => DAV_CREATED_OR_NO_CONTENT,
                HttpVerb::Delete => DAV_NO_CONTENT,
                HttpVerb::Get => &[],
            },
        }
    }

    /// Returns true if `code` observed for `verb` means success.
    pub fn is_success(self, verb: HttpVerb, code: u16) -> bool {
        self.success_codes(verb).contains(&code)
    }

    /// Returns true if response bodies of this dialect are JSON.
    pub fn is_json_capable(self) -> bool {
        !matches!(self, Self::WebDav)
    }

    /// Returns true for dialects that use the OCS envelope and headers.
    pub fn is_ocs(self) -> bool {
        !matches!(self, Self::WebDav)
    }

    /// Returns a short name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OcsV1 => "ocs_v1",
            Self::OcsV2 => "ocs_v2",
            Self::Provisioning => "provisioning",
            Self::WebDav => "webdav",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every code a server could plausibly answer with.
    fn observed_codes() -> impl Iterator<Item = u16> {
        [
            100, 101, 102, 103, 104, 105, 200, 201, 204, 207, 304, 400, 401, 403, 404, 405, 409,
            412, 500, 996, 997, 998, 999,
        ]
        .into_iter()
    }

    #[test]
    fn ocs_dialects_ignore_the_verb() {
        for verb in HttpVerb::ALL {
            assert_eq!(Dialect::OcsV1.success_codes(verb), &[100]);
            assert_eq!(Dialect::OcsV2.success_codes(verb), &[200]);
            assert_eq!(Dialect::Provisioning.success_codes(verb), &[100]);
        }
    }

    #[test]
    fn webdav_table() {
        let dav = Dialect::WebDav;
        assert_eq!(dav.success_codes(HttpVerb::Propfind), &[207]);
        assert_eq!(dav.success_codes(HttpVerb::Proppatch), &[207]);
        assert_eq!(dav.success_codes(HttpVerb::Report), &[207]);
        assert_eq!(dav.success_codes(HttpVerb::Mkcol), &[201]);
        assert_eq!(dav.success_codes(HttpVerb::Put), &[201]);
        assert_eq!(dav.success_codes(HttpVerb::Post), &[201]);
        assert_eq!(dav.success_codes(HttpVerb::Copy), &[201, 204]);
        assert_eq!(dav.success_codes(HttpVerb::Move), &[201, 204]);
        assert_eq!(dav.success_codes(HttpVerb::Delete), &[204]);
        assert!(dav.success_codes(HttpVerb::Get).is_empty());
    }

    #[test]
    fn success_iff_code_in_table() {
        for dialect in Dialect::ALL {
            for verb in HttpVerb::ALL {
                let table = dialect.success_codes(verb);
                for code in observed_codes() {
                    assert_eq!(
                        dialect.is_success(verb, code),
                        table.contains(&code),
                        "{dialect} {verb} {code}"
                    );
                }
            }
        }
    }

    #[test]
    fn webdav_delete_needs_no_content() {
        assert!(Dialect::WebDav.is_success(HttpVerb::Delete, 204));
        assert!(!Dialect::WebDav.is_success(HttpVerb::Delete, 200));
        assert!(!Dialect::WebDav.is_success(HttpVerb::Get, 200));
    }

    #[test]
    fn only_webdav_is_not_json() {
        assert!(Dialect::OcsV1.is_json_capable());
        assert!(Dialect::OcsV2.is_json_capable());
        assert!(Dialect::Provisioning.is_json_capable());
        assert!(!Dialect::WebDav.is_json_capable());
        assert!(!Dialect::WebDav.is_ocs());
    }

    #[test]
    fn verb_round_trips_through_str() {
        for verb in HttpVerb::ALL {
            assert_eq!(verb.as_str().parse::<HttpVerb>(), Ok(verb));
        }
        assert_eq!("propfind".parse::<HttpVerb>(), Ok(HttpVerb::Propfind));
        assert!("PATCH".parse::<HttpVerb>().is_err());
    }
}
