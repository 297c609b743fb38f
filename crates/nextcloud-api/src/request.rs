//! Requests described as plain data.
//!
//! Endpoint wrappers build a [`Request`] and hand it to the
//! [`Requester`](crate::Requester); the [`Transport`](crate::Transport)
//! executes it. Keeping requests as values makes every endpoint method
//! testable without a server.

use std::fmt;

use nextcloud_core::HttpVerb;
use serde::Serialize;

/// Stringifies heterogeneous path segments.
///
/// ```ignore
/// let segs = segments!["room", token, "participants"];
/// ```
#[macro_export]
macro_rules! segments {
    () => { ::std::vec::Vec::<::std::string::String>::new() };
    ($($segment:expr),+ $(,)?) => {
        vec![$(::std::string::ToString::to_string(&$segment)),+]
    };
}

/// Joins path segments onto a base path.
///
/// Each segment is trimmed of surrounding slashes and empty segments are
/// skipped, so the result never contains a double separator. A trailing
/// slash survives only when there are no segments and the base has one.
pub fn join_path<S: AsRef<str>>(base: &str, segments: &[S]) -> String {
    let mut path = base.to_string();
    let mut first = true;
    for segment in segments {
        let segment = segment.as_ref().trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if first {
            path.truncate(path.trim_end_matches('/').len());
            first = false;
        }
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Percent-encodes every `/`-separated segment of `path`.
///
/// Separators are kept, so `a b/c#d` becomes `a%20b/c%23d`. Used for file
/// names and user ids placed in URLs, where `?` and `#` would otherwise end
/// the path.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! int_param {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

int_param!(u8, u16, u32, i8, i16, i32, i64);

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Str(value.to_string()))
    }
}

impl From<nextcloud_core::Permission> for ParamValue {
    fn from(value: nextcloud_core::Permission) -> Self {
        Self::Int(i64::from(value.bits()))
    }
}

impl From<nextcloud_core::ShareType> for ParamValue {
    fn from(value: nextcloud_core::ShareType) -> Self {
        Self::Int(i64::from(value.code()))
    }
}

/// Insertion-ordered parameter mapping.
///
/// Optional parameters are added with [`Params::with_opt`], which leaves the
/// key out entirely when the value is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds `key` only when `value` is set.
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the entries as string pairs, ready for urlencoding.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

/// Body of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` parameters.
    Form(Params),
    /// Raw payload (WebDAV XML, file contents).
    Raw { content_type: String, data: Vec<u8> },
}

impl RequestBody {
    /// An XML body for WebDAV methods.
    pub fn xml(xml: impl Into<String>) -> Self {
        Self::Raw {
            content_type: "application/xml; charset=utf-8".to_string(),
            data: xml.into().into_bytes(),
        }
    }

    /// Returns the form parameters, if this is a form body.
    pub fn form(&self) -> Option<&Params> {
        match self {
            Self::Form(params) => Some(params),
            Self::Raw { .. } => None,
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is absolute from the instance root (e.g.
/// `/ocs/v2.php/apps/spreed/api/v3/room`); the transport prefixes it with
/// the configured endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub verb: HttpVerb,
    pub path: String,
    pub query: Params,
    pub body: Option<RequestBody>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(verb: HttpVerb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            query: Params::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Delete, path)
    }

    /// Replaces the query parameters.
    pub fn query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    /// Sets a form body. An empty mapping sends no body at all.
    pub fn form(mut self, params: Params) -> Self {
        self.body = if params.is_empty() {
            None
        } else {
            Some(RequestBody::Form(params))
        };
        self
    }

    /// Places parameters where the verb expects them: the query string for
    /// GET and DELETE, a form body otherwise.
    pub fn params(self, params: Params) -> Self {
        match self.verb {
            HttpVerb::Get | HttpVerb::Delete => self.query(params),
            _ => self.form(params),
        }
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header, replacing a previous one with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Returns the value of the header `name`, ignoring case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the form body parameters, if any.
    pub fn form_params(&self) -> Option<&Params> {
        self.body.as_ref().and_then(RequestBody::form)
    }
}
