//! XML handling for the WebDAV dialect.
//!
//! Builds PROPFIND, PROPPATCH and REPORT bodies and parses `207 Multi-Status`
//! responses into [`PropertySet`]s.

use std::collections::BTreeMap;
use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::response::ParseError;

/// DAV namespace
pub const DAV_NS: &str = "DAV:";
/// ownCloud namespace
pub const OC_NS: &str = "http://owncloud.org/ns";
/// Nextcloud namespace
pub const NC_NS: &str = "http://nextcloud.org/ns";

/// Properties requested by a plain folder listing.
pub const DEFAULT_PROPERTIES: &[&str] = &[
    "d:getlastmodified",
    "d:getetag",
    "d:getcontenttype",
    "d:resourcetype",
    "d:getcontentlength",
    "oc:fileid",
];

/// Every file property the server documents.
pub const ALL_FILE_PROPERTIES: &[&str] = &[
    "d:getlastmodified",
    "d:getetag",
    "d:getcontenttype",
    "d:resourcetype",
    "d:getcontentlength",
    "d:displayname",
    "oc:id",
    "oc:fileid",
    "oc:favorite",
    "oc:comments-href",
    "oc:comments-count",
    "oc:comments-unread",
    "oc:owner-id",
    "oc:owner-display-name",
    "oc:share-types",
    "oc:checksums",
    "oc:size",
    "oc:permissions",
    "nc:has-preview",
];

/// Properties of one resource in a multistatus response.
///
/// Properties are keyed by their local element name (`getetag`, `fileid`),
/// so the namespace prefix the server picked does not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertySet {
    /// Percent-decoded href of the resource.
    pub href: String,
    /// Property values from successful propstat blocks.
    pub properties: BTreeMap<String, String>,
    /// Children of `resourcetype` (e.g. `collection`).
    pub resource_types: Vec<String>,
}

impl PropertySet {
    /// Returns the raw value of a property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns true for folders.
    pub fn is_collection(&self) -> bool {
        self.resource_types.iter().any(|t| t == "collection")
    }

    /// Last path segment of the href.
    pub fn name(&self) -> &str {
        self.href
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// ETag without surrounding quotes.
    pub fn etag(&self) -> Option<&str> {
        self.get("getetag").map(|e| e.trim_matches('"'))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get("getcontenttype")
    }

    pub fn content_length(&self) -> Option<u64> {
        self.get("getcontentlength").and_then(|v| v.parse().ok())
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.get("getlastmodified")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get("displayname")
    }

    pub fn file_id(&self) -> Option<u64> {
        self.get("fileid").and_then(|v| v.parse().ok())
    }

    /// Size in bytes, folders included (`oc:size`).
    pub fn size(&self) -> Option<u64> {
        self.get("size").and_then(|v| v.parse().ok())
    }

    pub fn favorite(&self) -> bool {
        self.get("favorite") == Some("1")
    }
}

/// Generates a PROPFIND body requesting `properties`.
///
/// Property names use the `d:`, `oc:` and `nc:` prefixes.
pub fn propfind_body(properties: &[&str]) -> ApiResult<String> {
    let mut xml = XmlBody::new();
    xml.start_with_namespaces("d:propfind")?;
    xml.start("d:prop")?;
    for property in properties {
        xml.empty(property)?;
    }
    xml.end("d:prop")?;
    xml.end("d:propfind")?;
    Ok(xml.finish())
}

/// Generates a PROPPATCH body setting each `(property, value)` pair.
pub fn proppatch_body(values: &[(&str, &str)]) -> ApiResult<String> {
    let mut xml = XmlBody::new();
    xml.start_with_namespaces("d:propertyupdate")?;
    xml.start("d:set")?;
    xml.start("d:prop")?;
    for (property, value) in values {
        xml.text_element(property, value)?;
    }
    xml.end("d:prop")?;
    xml.end("d:set")?;
    xml.end("d:propertyupdate")?;
    Ok(xml.finish())
}

/// Generates the `oc:filter-files` REPORT body that lists favorites.
pub fn favorites_report_body(properties: &[&str]) -> ApiResult<String> {
    let mut xml = XmlBody::new();
    xml.start_with_namespaces("oc:filter-files")?;
    xml.start("d:prop")?;
    for property in properties {
        xml.empty(property)?;
    }
    xml.end("d:prop")?;
    xml.start("oc:filter-rules")?;
    xml.text_element("oc:favorite", "1")?;
    xml.end("oc:filter-rules")?;
    xml.end("oc:filter-files")?;
    Ok(xml.finish())
}

/// Parses a `207 Multi-Status` body.
///
/// Entries keep document order. Values from propstat blocks with a non-200
/// status (properties the server does not know) are dropped.
pub fn parse_multistatus(xml: &str) -> Result<Vec<PropertySet>, ParseError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut sets = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut saw_multistatus = false;

    let mut current: Option<PropertySet> = None;
    let mut propstat: Option<Propstat> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| ParseError::Xml(e.to_string()))?;

        match event {
            Event::Start(e) => {
                let local = local_name(&e);
                match local.as_str() {
                    "multistatus" => saw_multistatus = true,
                    "response" => current = Some(PropertySet::default()),
                    "propstat" => propstat = Some(Propstat::default()),
                    _ => {
                        if let Some(ref mut ps) = propstat {
                            ps.open(&stack, &local);
                        }
                    }
                }
                stack.push(local);
            }
            Event::Empty(e) => {
                let local = local_name(&e);
                if let Some(ref mut ps) = propstat {
                    ps.open(&stack, &local);
                }
            }
            Event::Text(e) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                handle_text(&stack, text, current.as_mut(), propstat.as_mut());
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                handle_text(&stack, text, current.as_mut(), propstat.as_mut());
            }
            Event::End(_) => {
                let Some(local) = stack.pop() else {
                    return Err(ParseError::Xml("unbalanced end tag".to_string()));
                };
                match local.as_str() {
                    "propstat" => {
                        if let (Some(ps), Some(set)) = (propstat.take(), current.as_mut()) {
                            ps.merge_into(set);
                        }
                    }
                    "response" => {
                        if let Some(set) = current.take() {
                            if !set.href.is_empty() {
                                sets.push(set);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::Xml("unexpected end of document".to_string()));
    }
    if !saw_multistatus {
        return Err(ParseError::Xml("missing multistatus element".to_string()));
    }

    Ok(sets)
}

/// Separates the entry describing the queried resource itself.
///
/// PROPFIND with depth 1 answers with the resource first, then its
/// children. The first entry is split off only when its href matches
/// `root_path`; the order of the remaining entries is preserved.
pub fn strip_root(
    mut sets: Vec<PropertySet>,
    root_path: &str,
) -> (Option<PropertySet>, Vec<PropertySet>) {
    let is_root = sets
        .first()
        .is_some_and(|first| normalize_href(&first.href) == normalize_href(root_path));
    if is_root {
        let root = sets.remove(0);
        (Some(root), sets)
    } else {
        (None, sets)
    }
}

/// Compares hrefs by decoded path, ignoring a trailing slash.
fn normalize_href(href: &str) -> String {
    let path = match url::Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.to_string(),
    };
    let decoded = match urlencoding::decode(&path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.clone(),
    };
    decoded.trim_end_matches('/').to_string()
}

/// Properties collected inside one `propstat`.
#[derive(Debug, Default)]
struct Propstat {
    status: Option<String>,
    properties: BTreeMap<String, String>,
    resource_types: Vec<String>,
}

impl Propstat {
    /// Records an element opening at the position described by `stack`.
    fn open(&mut self, stack: &[String], local: &str) {
        match stack.last().map(String::as_str) {
            Some("prop") => {
                self.properties.entry(local.to_string()).or_default();
            }
            Some("resourcetype") => self.resource_types.push(local.to_string()),
            _ => {}
        }
    }

    fn is_ok(&self) -> bool {
        match self.status {
            None => true,
            Some(ref status) => status.split_whitespace().nth(1) == Some("200"),
        }
    }

    fn merge_into(self, set: &mut PropertySet) {
        if !self.is_ok() {
            return;
        }
        set.properties.extend(self.properties);
        set.resource_types.extend(self.resource_types);
    }
}

fn handle_text(
    stack: &[String],
    text: String,
    current: Option<&mut PropertySet>,
    propstat: Option<&mut Propstat>,
) {
    let Some(top) = stack.last().map(String::as_str) else {
        return;
    };
    let parent = stack.len().checked_sub(2).map(|i| stack[i].as_str());

    if let Some(ps) = propstat {
        if top == "status" && parent == Some("propstat") {
            ps.status = Some(text);
            return;
        }
        // Text anywhere below a property belongs to that property.
        if let Some(prop_idx) = stack.iter().rposition(|s| s == "prop") {
            if let Some(name) = stack.get(prop_idx + 1) {
                let value = ps.properties.entry(name.clone()).or_default();
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(&text);
            }
        }
        return;
    }

    if top == "href" && parent == Some("response") {
        if let Some(set) = current {
            set.href = match urlencoding::decode(&text) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => text.clone(),
            };
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Small writer wrapper that turns XML write failures into [`ApiError`]s.
struct XmlBody {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlBody {
    fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    fn write(&mut self, event: Event<'_>) -> ApiResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| ApiError::internal(format!("failed to write XML body: {}", e)))
    }

    fn start_with_namespaces(&mut self, name: &str) -> ApiResult<()> {
        let mut start = BytesStart::new(name);
        start.push_attribute(("xmlns:d", DAV_NS));
        start.push_attribute(("xmlns:oc", OC_NS));
        start.push_attribute(("xmlns:nc", NC_NS));
        self.write(Event::Start(start))
    }

    fn start(&mut self, name: &str) -> ApiResult<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> ApiResult<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str) -> ApiResult<()> {
        self.write(Event::Empty(BytesStart::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> ApiResult<()> {
        self.start(name)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.writer.into_inner().into_inner()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/files/alice/Documents/</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Tue, 04 Mar 2025 10:00:00 GMT</d:getlastmodified>
        <d:resourcetype><d:collection/></d:resourcetype>
        <oc:fileid>12</oc:fileid>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
    <d:propstat>
      <d:prop>
        <d:getcontentlength/>
      </d:prop>
      <d:status>HTTP/1.1 404 Not Found</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/files/alice/Documents/My%20Notes.md</d:href>
    <d:propstat>
      <d:prop>
        <d:getetag>&quot;5f1c&quot;</d:getetag>
        <d:getcontenttype>text/markdown</d:getcontenttype>
        <d:getcontentlength>1024</d:getcontentlength>
        <d:resourcetype/>
        <oc:fileid>34</oc:fileid>
        <oc:favorite>1</oc:favorite>
        <oc:share-types><oc:share-type>0</oc:share-type><oc:share-type>3</oc:share-type></oc:share-types>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/files/alice/Documents/Photos/</d:href>
    <d:propstat>
      <d:prop>
        <d:resourcetype><d:collection/></d:resourcetype>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

    #[test]
    fn parses_entries_in_document_order() {
        let sets = parse_multistatus(LISTING).unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].href, "/remote.php/dav/files/alice/Documents/");
        assert_eq!(sets[1].href, "/remote.php/dav/files/alice/Documents/My Notes.md");
        assert_eq!(sets[2].name(), "Photos");
    }

    #[test]
    fn typed_accessors() {
        let sets = parse_multistatus(LISTING).unwrap();
        let folder = &sets[0];
        assert!(folder.is_collection());
        assert_eq!(folder.file_id(), Some(12));
        assert_eq!(folder.last_modified(), Some("Tue, 04 Mar 2025 10:00:00 GMT"));

        let file = &sets[1];
        assert!(!file.is_collection());
        assert_eq!(file.name(), "My Notes.md");
        assert_eq!(file.etag(), Some("5f1c"));
        assert_eq!(file.content_type(), Some("text/markdown"));
        assert_eq!(file.content_length(), Some(1024));
        assert_eq!(file.file_id(), Some(34));
        assert!(file.favorite());
        assert_eq!(file.get("share-types"), Some("0 3"));
    }

    #[test]
    fn failed_propstat_is_ignored() {
        let sets = parse_multistatus(LISTING).unwrap();
        assert!(sets[0].get("getcontentlength").is_none());
        assert_eq!(sets[0].content_length(), None);
    }

    #[test]
    fn strip_root_removes_self_entry() {
        let sets = parse_multistatus(LISTING).unwrap();
        let (root, children) = strip_root(sets, "/remote.php/dav/files/alice/Documents");
        assert_eq!(root.unwrap().file_id(), Some(12));
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "My Notes.md");
        assert_eq!(children[1].name(), "Photos");
    }

    #[test]
    fn strip_root_keeps_everything_when_first_is_not_root() {
        let sets = parse_multistatus(LISTING).unwrap();
        let (root, children) = strip_root(sets, "/remote.php/dav/files/alice/Other");
        assert!(root.is_none());
        assert_eq!(children.len(), 3);
    }

    #[test]
    fn strip_root_matches_encoded_and_absolute_hrefs() {
        let sets = vec![
            PropertySet {
                href: "https://cloud.example.com/remote.php/dav/files/alice/My%20Docs/".into(),
                ..Default::default()
            },
            PropertySet {
                href: "/remote.php/dav/files/alice/My Docs/a.txt".into(),
                ..Default::default()
            },
        ];
        let (root, children) = strip_root(sets, "/remote.php/dav/files/alice/My Docs");
        assert!(root.is_some());
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn rejects_non_multistatus_documents() {
        assert!(parse_multistatus("<d:error xmlns:d=\"DAV:\"/>").is_err());
        assert!(parse_multistatus("<d:multistatus xmlns:d=\"DAV:\"><d:response>").is_err());
    }

    #[test]
    fn propfind_body_lists_properties() {
        let body = propfind_body(DEFAULT_PROPERTIES).unwrap();
        assert!(body.starts_with("<d:propfind"));
        assert!(body.contains("xmlns:oc=\"http://owncloud.org/ns\""));
        assert!(body.contains("<d:getetag/>"));
        assert!(body.contains("<oc:fileid/>"));
    }

    #[test]
    fn proppatch_body_sets_values() {
        let body = proppatch_body(&[("oc:favorite", "1")]).unwrap();
        assert!(body.contains("<d:set><d:prop><oc:favorite>1</oc:favorite></d:prop></d:set>"));
    }

    #[test]
    fn favorites_report_filters_on_favorite() {
        let body = favorites_report_body(&["oc:fileid"]).unwrap();
        assert!(body.starts_with("<oc:filter-files"));
        assert!(body.contains("<oc:filter-rules><oc:favorite>1</oc:favorite></oc:filter-rules>"));
    }
}
