//! The response envelope.
//!
//! Every completed call yields a [`Response`], whatever its status. The
//! envelope keeps the raw status and body, the payload extracted according
//! to the dialect, and the success flag computed from the dialect's
//! success-code table.

use nextcloud_core::{Dialect, HttpVerb};
use quick_xml::events::Event;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::request::Request;
use crate::transport::RawResponse;
use crate::webdav::{PropertySet, parse_multistatus, strip_root};

/// A body that was present but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ParseError {
    #[error("invalid JSON body: {0}")]
    Json(String),
    #[error("invalid XML body: {0}")]
    Xml(String),
    #[error("body is not an OCS envelope")]
    MissingEnvelope,
}

/// Payload extracted from a response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// `ocs.data` of an OCS envelope (or the whole document if not one).
    Json(Value),
    /// Body returned as text when JSON output is disabled.
    Text(String),
    /// Entries of a WebDAV multistatus, the queried resource excluded.
    PropertySets(Vec<PropertySet>),
}

/// `ocs.meta` block of an OCS envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcsMeta {
    pub status: String,
    pub statuscode: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totalitems: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itemsperpage: Option<String>,
}

#[derive(Deserialize)]
struct OcsDocument {
    ocs: OcsBody,
}

#[derive(Deserialize)]
struct OcsBody {
    meta: OcsMeta,
    #[serde(default)]
    data: Value,
}

/// Normalized result of one request.
#[derive(Debug, Clone)]
pub struct Response {
    verb: HttpVerb,
    path: String,
    dialect: Dialect,
    http_status: u16,
    status_code: u16,
    is_success: bool,
    headers: Vec<(String, String)>,
    raw_body: Vec<u8>,
    meta: Option<OcsMeta>,
    data: Option<Payload>,
    self_entry: Option<PropertySet>,
    parse_error: Option<ParseError>,
}

impl Response {
    /// Wraps a raw result.
    ///
    /// `root_path` is the server path of the queried resource, used to
    /// separate the WebDAV self entry from its children.
    pub fn new(
        request: &Request,
        dialect: Dialect,
        raw: RawResponse,
        json_output: bool,
        root_path: &str,
    ) -> Self {
        let mut response = Self {
            verb: request.verb,
            path: request.path.clone(),
            dialect,
            http_status: raw.status,
            status_code: raw.status,
            is_success: false,
            headers: raw.headers,
            raw_body: raw.body,
            meta: None,
            data: None,
            self_entry: None,
            parse_error: None,
        };

        let has_body = !response.raw_body.iter().all(u8::is_ascii_whitespace);
        if has_body {
            if dialect.is_json_capable() {
                response.parse_ocs(json_output);
            } else {
                response.parse_webdav(root_path);
            }
        }

        response.is_success = dialect.is_success(response.verb, response.status_code);
        response
    }

    fn parse_ocs(&mut self, json_output: bool) {
        let body = String::from_utf8_lossy(&self.raw_body).into_owned();

        if !json_output {
            if let Some(code) = ocs_xml_statuscode(&body) {
                self.status_code = code;
            }
            self.data = Some(Payload::Text(body));
            return;
        }

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                self.parse_error = Some(ParseError::Json(e.to_string()));
                return;
            }
        };

        match serde_json::from_value::<OcsDocument>(value.clone()) {
            Ok(doc) => {
                self.status_code = doc.ocs.meta.statuscode;
                self.meta = Some(doc.ocs.meta);
                self.data = Some(Payload::Json(doc.ocs.data));
            }
            Err(_) => {
                self.parse_error = Some(ParseError::MissingEnvelope);
                self.data = Some(Payload::Json(value));
            }
        }
    }

    fn parse_webdav(&mut self, root_path: &str) {
        if self.http_status != nextcloud_core::codes::webdav::MULTISTATUS {
            return;
        }
        let body = String::from_utf8_lossy(&self.raw_body);
        match parse_multistatus(&body) {
            Ok(sets) => {
                let (root, children) = strip_root(sets, root_path);
                self.self_entry = root;
                self.data = Some(Payload::PropertySets(children));
            }
            Err(e) => self.parse_error = Some(e),
        }
    }

    /// True when the status code is in the dialect's success set for the verb.
    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// HTTP status line code.
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Code tested against the success table: the OCS meta status code when
    /// the body is an OCS envelope, the HTTP status otherwise.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the value of the header `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    pub fn meta(&self) -> Option<&OcsMeta> {
        self.meta.as_ref()
    }

    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<Payload> {
        self.data
    }

    /// The WebDAV entry describing the queried resource itself.
    pub fn self_entry(&self) -> Option<&PropertySet> {
        self.self_entry.as_ref()
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    /// JSON payload, if any.
    pub fn json(&self) -> Option<&Value> {
        match self.data {
            Some(Payload::Json(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn text(&self) -> Option<&str> {
        match self.data {
            Some(Payload::Text(ref text)) => Some(text),
            _ => None,
        }
    }

    /// WebDAV entries; empty when the response carried none.
    pub fn property_sets(&self) -> &[PropertySet] {
        match self.data {
            Some(Payload::PropertySets(ref sets)) => sets,
            _ => &[],
        }
    }

    /// First WebDAV entry, if any.
    pub fn first(&self) -> Option<&PropertySet> {
        self.property_sets().first()
    }

    /// Deserializes the JSON payload.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ParseError> {
        let value = self.json().ok_or(ParseError::MissingEnvelope)?;
        serde_json::from_value(value.clone()).map_err(|e| ParseError::Json(e.to_string()))
    }

    /// Compact JSON view used for printing.
    pub fn to_summary_json(&self) -> Value {
        json!({
            "verb": self.verb,
            "path": self.path,
            "http_status": self.http_status,
            "status_code": self.status_code,
            "success": self.is_success,
            "meta": self.meta,
            "data": self.data,
            "parse_error": self.parse_error.as_ref().map(ToString::to_string),
        })
    }
}

/// Reads `ocs/meta/statuscode` from an XML OCS envelope.
fn ocs_xml_statuscode(body: &str) -> Option<u16> {
    let mut reader = quick_xml::Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(e)) => {
                if path == ["ocs", "meta", "statuscode"] {
                    return e.unescape().ok()?.trim().parse().ok();
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocs_body(statuscode: u16, data: Value) -> Vec<u8> {
        json!({
            "ocs": {
                "meta": { "status": "ok", "statuscode": statuscode, "message": "OK" },
                "data": data,
            }
        })
        .to_string()
        .into_bytes()
    }

    fn wrap(request: &Request, dialect: Dialect, raw: RawResponse) -> Response {
        Response::new(request, dialect, raw, true, &request.path)
    }

    #[test]
    fn ocs_v2_success_uses_meta_code() {
        let req = Request::get("/ocs/v2.php/apps/spreed/api/v3/room");
        let raw = RawResponse::new(200, ocs_body(200, json!([{"token": "abc"}])));
        let resp = wrap(&req, Dialect::OcsV2, raw);

        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.json(), Some(&json!([{"token": "abc"}])));
        assert_eq!(resp.meta().unwrap().status, "ok");
        assert!(resp.parse_error().is_none());
    }

    #[test]
    fn ocs_v1_success_code_comes_from_body() {
        let req = Request::get("/ocs/v1.php/cloud/capabilities");
        let raw = RawResponse::new(200, ocs_body(100, json!({"version": {}})));
        let resp = wrap(&req, Dialect::OcsV1, raw);
        assert!(resp.is_success());
        assert_eq!(resp.http_status(), 200);
        assert_eq!(resp.status_code(), 100);
    }

    #[test]
    fn ocs_remote_failure_is_data() {
        let req = Request::delete("/ocs/v2.php/apps/spreed/api/v3/room/nope");
        let raw = RawResponse::new(404, ocs_body(404, json!([])));
        let resp = wrap(&req, Dialect::OcsV2, raw);
        assert!(!resp.is_success());
        assert_eq!(resp.status_code(), 404);
        assert_eq!(resp.json(), Some(&json!([])));
    }

    #[test]
    fn malformed_json_keeps_raw_body() {
        let req = Request::get("/ocs/v2.php/apps/spreed/api/v3/room");
        let raw = RawResponse::new(500, "<html>Internal Server Error</html>");
        let resp = wrap(&req, Dialect::OcsV2, raw);
        assert!(!resp.is_success());
        assert!(matches!(resp.parse_error(), Some(ParseError::Json(_))));
        assert!(resp.data().is_none());
        assert_eq!(resp.raw_body(), b"<html>Internal Server Error</html>");
    }

    #[test]
    fn json_without_envelope_is_flagged() {
        let req = Request::get("/ocs/v2.php/apps/spreed/api/v3/room");
        let raw = RawResponse::new(200, r#"{"hello": "world"}"#);
        let resp = wrap(&req, Dialect::OcsV2, raw);
        assert_eq!(resp.parse_error(), Some(&ParseError::MissingEnvelope));
        assert_eq!(resp.json(), Some(&json!({"hello": "world"})));
        assert!(resp.is_success());
    }

    #[test]
    fn empty_body_is_not_a_parse_error() {
        let req = Request::post("/ocs/v2.php/apps/spreed/api/v3/room/abc/favorite");
        let raw = RawResponse::new(200, Vec::new());
        let resp = wrap(&req, Dialect::OcsV2, raw);
        assert!(resp.is_success());
        assert!(resp.parse_error().is_none());
        assert!(resp.data().is_none());
    }

    #[test]
    fn xml_ocs_envelope_when_json_disabled() {
        let req = Request::get("/ocs/v1.php/cloud/users");
        let body = "<?xml version=\"1.0\"?>\n<ocs><meta><status>ok</status><statuscode>100</statuscode></meta><data/></ocs>";
        let raw = RawResponse::new(200, body);
        let resp = Response::new(&req, Dialect::Provisioning, raw, false, &req.path);
        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 100);
        assert_eq!(resp.text(), Some(body));
    }

    #[test]
    fn webdav_no_content_delete_is_success() {
        let req = Request::delete("/remote.php/dav/files/alice/old.txt");
        let raw = RawResponse::new(204, Vec::new());
        let resp = wrap(&req, Dialect::WebDav, raw);
        assert!(resp.is_success());
        assert!(resp.property_sets().is_empty());
        assert!(resp.parse_error().is_none());
    }

    #[test]
    fn webdav_multistatus_strips_self_entry() {
        let req = Request::new(HttpVerb::Propfind, "/remote.php/dav/files/alice");
        let body = r#"<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/remote.php/dav/files/alice/</d:href>
    <d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat>
  </d:response>
  <d:response><d:href>/remote.php/dav/files/alice/a.txt</d:href>
    <d:propstat><d:prop><d:getcontentlength>3</d:getcontentlength></d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat>
  </d:response>
</d:multistatus>"#;
        let resp = wrap(&req, Dialect::WebDav, RawResponse::new(207, body));

        assert!(resp.is_success());
        assert!(resp.self_entry().unwrap().is_collection());
        assert_eq!(resp.property_sets().len(), 1);
        assert_eq!(resp.first().unwrap().content_length(), Some(3));
    }

    #[test]
    fn webdav_broken_multistatus_is_parse_error() {
        let req = Request::new(HttpVerb::Propfind, "/remote.php/dav/files/alice");
        let resp = wrap(&req, Dialect::WebDav, RawResponse::new(207, "<d:multistatus"));
        assert!(resp.is_success());
        assert!(matches!(resp.parse_error(), Some(ParseError::Xml(_))));
        assert!(resp.property_sets().is_empty());
    }

    #[test]
    fn deserialize_typed_payload() {
        #[derive(Deserialize)]
        struct Room {
            token: String,
        }
        let req = Request::get("/ocs/v2.php/apps/spreed/api/v3/room/abc");
        let raw = RawResponse::new(200, ocs_body(200, json!({"token": "abc"})));
        let room: Room = wrap(&req, Dialect::OcsV2, raw).deserialize().unwrap();
        assert_eq!(room.token, "abc");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::get("/ocs/v2.php/apps/spreed/api/v3/chat/abc");
        let raw = RawResponse::new(200, ocs_body(200, json!([])))
            .with_header("x-chat-last-given", "1234");
        let resp = wrap(&req, Dialect::OcsV2, raw);
        assert_eq!(resp.header("X-Chat-Last-Given"), Some("1234"));
    }

    #[test]
    fn summary_json_shape() {
        let req = Request::get("/ocs/v2.php/apps/spreed/api/v3/room");
        let raw = RawResponse::new(200, ocs_body(200, json!([])));
        let summary = wrap(&req, Dialect::OcsV2, raw).to_summary_json();
        assert_eq!(summary["verb"], "GET");
        assert_eq!(summary["success"], true);
        assert_eq!(summary["data"], json!([]));
        assert_eq!(summary["parse_error"], Value::Null);
    }
}
