//! Files over WebDAV.
//!
//! Paths are relative to the user's files root, `/remote.php/dav/files/<uid>`.
//! Methods taking a `uid` fall back to the configured username when it is
//! `None`.

use nextcloud_core::{Dialect, HttpVerb};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::request::{Request, RequestBody, encode_path, join_path};
use crate::requester::Requester;
use crate::response::Response;
use crate::webdav::{
    ALL_FILE_PROPERTIES, DEFAULT_PROPERTIES, favorites_report_body, propfind_body, proppatch_body,
};
use crate::wrapper::{ApiWrapper, WrapperDescriptor, resolve_default};

const VERSIONS_PATH: &str = "/remote.php/dav/versions";

/// PROPFIND depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    Zero,
    #[default]
    One,
    Infinity,
}

impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        }
    }
}

/// WebDAV files wrapper.
#[derive(Debug, Clone)]
pub struct WebDav {
    requester: Requester,
}

impl ApiWrapper for WebDav {
    const DESCRIPTOR: WrapperDescriptor =
        WrapperDescriptor::new("webdav", Dialect::WebDav).with_api_path("/remote.php/dav/files");

    fn from_requester(requester: Requester) -> Self {
        Self { requester }
    }
}

impl WebDav {
    fn uid<'a>(&'a self, uid: Option<&'a str>) -> ApiResult<&'a str> {
        uid.or_else(|| self.requester.config().username())
            .ok_or_else(|| {
                ApiError::configuration("no user id given and no username configured")
                    .with_wrapper(Self::DESCRIPTOR.name)
            })
    }

    /// Encoded server path of `path` inside the files of `uid`.
    fn file_path(&self, uid: Option<&str>, path: &str) -> ApiResult<String> {
        let uid = urlencoding::encode(self.uid(uid)?);
        Ok(self.requester.path(&[&uid[..], encode_path(path).as_str()]))
    }

    fn propfind(&self, path: String, depth: Depth, properties: &[&str]) -> ApiResult<Response> {
        let request = Request::new(HttpVerb::Propfind, path)
            .header("Depth", depth.as_str())
            .body(RequestBody::xml(propfind_body(properties)?));
        self.requester.send(request)
    }

    /// Lists a folder.
    ///
    /// The folder's own entry is available as the response's self entry;
    /// the children are its property sets.
    pub fn list_folders(
        &self,
        uid: Option<&str>,
        path: &str,
        depth: Depth,
        all_properties: bool,
    ) -> ApiResult<Response> {
        let properties = if all_properties {
            ALL_FILE_PROPERTIES
        } else {
            DEFAULT_PROPERTIES
        };
        self.propfind(self.file_path(uid, path)?, depth, properties)
    }

    /// Properties of a single file or folder, in the response's self entry.
    pub fn get_file_info(
        &self,
        uid: Option<&str>,
        path: &str,
        properties: Option<&[&str]>,
    ) -> ApiResult<Response> {
        let properties = properties.unwrap_or(ALL_FILE_PROPERTIES);
        self.propfind(self.file_path(uid, path)?, Depth::Zero, properties)
    }

    pub fn create_folder(&self, uid: Option<&str>, path: &str) -> ApiResult<Response> {
        let request = Request::new(HttpVerb::Mkcol, self.file_path(uid, path)?);
        self.requester.send(request)
    }

    /// Deletes a file or a folder with its contents.
    pub fn delete_path(&self, uid: Option<&str>, path: &str) -> ApiResult<Response> {
        self.requester.send(Request::delete(self.file_path(uid, path)?))
    }

    /// Uploads `contents` to `path`, replacing an existing file.
    ///
    /// `mtime` sets the modification time (unix seconds) on the server.
    pub fn upload_file_contents(
        &self,
        uid: Option<&str>,
        path: &str,
        contents: Vec<u8>,
        mtime: Option<i64>,
    ) -> ApiResult<Response> {
        let mut request = Request::put(self.file_path(uid, path)?).body(RequestBody::Raw {
            content_type: "application/octet-stream".to_string(),
            data: contents,
        });
        if let Some(mtime) = mtime {
            request = request.header("X-OC-Mtime", mtime.to_string());
        }
        self.requester.send(request)
    }

    fn transfer(
        &self,
        verb: HttpVerb,
        uid: Option<&str>,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> ApiResult<Response> {
        let source = self.file_path(uid, path)?;
        let target = self.file_path(uid, destination)?;
        let request = Request::new(verb, source)
            .header("Destination", self.requester.absolute_url(&target))
            .header("Overwrite", if overwrite { "T" } else { "F" });
        self.requester.send(request)
    }

    pub fn copy_path(
        &self,
        uid: Option<&str>,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> ApiResult<Response> {
        self.transfer(HttpVerb::Copy, uid, path, destination, overwrite)
    }

    pub fn move_path(
        &self,
        uid: Option<&str>,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> ApiResult<Response> {
        self.transfer(HttpVerb::Move, uid, path, destination, overwrite)
    }

    /// Marks or unmarks `path` as favorite.
    pub fn set_favorites(&self, uid: Option<&str>, path: &str, favorite: bool) -> ApiResult<Response> {
        let value = if favorite { "1" } else { "0" };
        let body = proppatch_body(&[("oc:favorite", value)])?;
        let request = Request::new(HttpVerb::Proppatch, self.file_path(uid, path)?)
            .body(RequestBody::xml(body));
        self.requester.send(request)
    }

    /// Lists favorites below `path`.
    pub fn list_favorites(&self, uid: Option<&str>, path: &str) -> ApiResult<Response> {
        let body = favorites_report_body(DEFAULT_PROPERTIES)?;
        let request = Request::new(HttpVerb::Report, self.file_path(uid, path)?)
            .body(RequestBody::xml(body));
        self.requester.send(request)
    }

    /// Looks the file id of `path` up with a PROPFIND.
    pub fn get_file_id(&self, uid: Option<&str>, path: &str) -> ApiResult<Option<u64>> {
        let info = self.get_file_info(uid, path, Some(&["oc:fileid"][..]))?;
        Ok(info.self_entry().and_then(|entry| entry.file_id()))
    }

    /// Lists the versions of a file.
    ///
    /// Without `file_id`, the id is looked up from `path` first, which costs
    /// one extra request.
    pub fn list_file_versions(
        &self,
        uid: Option<&str>,
        file_id: Option<u64>,
        path: Option<&str>,
    ) -> ApiResult<Response> {
        let uid = self.uid(uid)?;
        let file_id = resolve_default(file_id, || match path {
            Some(path) => {
                debug!(path, "Resolving file id");
                self.get_file_id(Some(uid), path)
            }
            None => Ok(None),
        })?
        .ok_or_else(|| {
            ApiError::invalid_request("file versions need a file id or a path to an existing file")
                .with_wrapper(Self::DESCRIPTOR.name)
        })?;

        let segments = [urlencoding::encode(uid).into_owned(), "versions".into(), file_id.to_string()];
        let path = join_path(VERSIONS_PATH, &segments);
        self.propfind(path, Depth::One, DEFAULT_PROPERTIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_header_values() {
        assert_eq!(Depth::default().as_str(), "1");
        assert_eq!(Depth::Zero.as_str(), "0");
        assert_eq!(Depth::Infinity.as_str(), "infinity");
    }
}
