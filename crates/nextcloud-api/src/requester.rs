//! Request dispatch for one wrapper.
//!
//! The [`Requester`] resolves paths against the wrapper's base path, adds the
//! dialect's request conventions, executes through the shared transport and
//! wraps the result in a [`Response`].

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::request::{Params, Request, join_path};
use crate::response::Response;
use crate::transport::Transport;
use crate::wrapper::WrapperDescriptor;

#[derive(Clone)]
pub struct Requester {
    descriptor: WrapperDescriptor,
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester")
            .field("wrapper", &self.descriptor.name)
            .field("endpoint", &self.config.endpoint_str())
            .finish()
    }
}

impl Requester {
    pub fn new(
        descriptor: WrapperDescriptor,
        transport: Arc<dyn Transport>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            descriptor,
            transport,
            config,
        }
    }

    pub fn descriptor(&self) -> &WrapperDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Joins `segments` onto the wrapper's base path.
    pub fn path<S: AsRef<str>>(&self, segments: &[S]) -> String {
        join_path(self.descriptor.base_path(), segments)
    }

    /// Full URL of a server-absolute path, as used in `Destination` headers.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint_str(), path)
    }

    /// GET under the base path, parameters in the query string.
    pub fn get<S: AsRef<str>>(&self, segments: &[S], params: Params) -> ApiResult<Response> {
        self.send(Request::get(self.path(segments)).params(params))
    }

    /// POST under the base path, parameters in a form body.
    pub fn post<S: AsRef<str>>(&self, segments: &[S], params: Params) -> ApiResult<Response> {
        self.send(Request::post(self.path(segments)).params(params))
    }

    /// PUT under the base path, parameters in a form body.
    pub fn put<S: AsRef<str>>(&self, segments: &[S], params: Params) -> ApiResult<Response> {
        self.send(Request::put(self.path(segments)).params(params))
    }

    /// DELETE under the base path, parameters in the query string.
    pub fn delete<S: AsRef<str>>(&self, segments: &[S], params: Params) -> ApiResult<Response> {
        self.send(Request::delete(self.path(segments)).params(params))
    }

    /// Executes `request` and wraps the answer.
    ///
    /// Transport failures are returned as errors. Any answer from the server,
    /// successful or not, is returned as a [`Response`].
    pub fn send(&self, mut request: Request) -> ApiResult<Response> {
        let dialect = self.descriptor.dialect;
        let json_output = self.descriptor.json_capable && self.config.json_output;

        if dialect.is_ocs() {
            request = request.header("OCS-APIRequest", "true");
        }
        if json_output && !request.query.contains_key("format") {
            request.query.insert("format", "json");
        }

        debug!(
            wrapper = self.descriptor.name,
            verb = %request.verb,
            path = %request.path,
            "Sending request"
        );

        let raw = self
            .transport
            .execute(&request)
            .map_err(|e| e.with_wrapper(self.descriptor.name))?;

        trace!(
            wrapper = self.descriptor.name,
            status = raw.status,
            body = %String::from_utf8_lossy(&raw.body),
            "Raw response"
        );

        let root_path = format!("{}{}", self.config.endpoint_path(), request.path);
        let response = Response::new(&request, dialect, raw, json_output, &root_path);

        if response.is_success() {
            debug!(
                wrapper = self.descriptor.name,
                status = response.status_code(),
                "Request succeeded"
            );
        } else {
            warn!(
                wrapper = self.descriptor.name,
                verb = %request.verb,
                path = %request.path,
                http_status = response.http_status(),
                status = response.status_code(),
                "Request reported failure"
            );
        }
        if let Some(err) = response.parse_error() {
            warn!(wrapper = self.descriptor.name, error = %err, "Unparseable response body");
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::transport::RawResponse;
    use nextcloud_core::Dialect;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Request>>,
        answer: Option<RawResponse>,
    }

    impl Transport for Recorder {
        fn execute(&self, request: &Request) -> ApiResult<RawResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.answer
                .clone()
                .ok_or_else(|| ApiError::transport("connection refused"))
        }
    }

    fn requester(descriptor: WrapperDescriptor, answer: Option<RawResponse>) -> (Requester, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            answer,
        });
        let config = ClientConfig::new("https://cloud.example.com/nc").unwrap();
        (
            Requester::new(descriptor, recorder.clone(), Arc::new(config)),
            recorder,
        )
    }

    const TALK: WrapperDescriptor = WrapperDescriptor::new("talk", Dialect::OcsV2)
        .with_api_path("/ocs/v2.php/apps/spreed/api/v3");
    const FILES: WrapperDescriptor =
        WrapperDescriptor::new("files", Dialect::WebDav).with_api_path("/remote.php/dav/files");

    #[test]
    fn ocs_requests_carry_header_and_format() {
        let ok = RawResponse::new(200, r#"{"ocs":{"meta":{"status":"ok","statuscode":200},"data":[]}}"#);
        let (req, rec) = requester(TALK, Some(ok));
        let resp = req.get(&["room"], Params::new()).unwrap();
        assert!(resp.is_success());

        let seen = rec.seen.lock().unwrap();
        assert_eq!(seen[0].path, "/ocs/v2.php/apps/spreed/api/v3/room");
        assert_eq!(seen[0].header_value("OCS-APIRequest"), Some("true"));
        assert_eq!(seen[0].query.to_pairs(), vec![("format".into(), "json".into())]);
    }

    #[test]
    fn webdav_requests_stay_plain() {
        let (req, rec) = requester(FILES, Some(RawResponse::new(204, Vec::new())));
        let resp = req.delete(&["alice", "old.txt"], Params::new()).unwrap();
        assert!(resp.is_success());

        let seen = rec.seen.lock().unwrap();
        assert!(seen[0].header_value("OCS-APIRequest").is_none());
        assert!(seen[0].query.is_empty());
    }

    #[test]
    fn transport_failure_is_an_error() {
        let (req, _) = requester(TALK, None);
        let err = req.get(&["room"], Params::new()).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.wrapper(), Some("talk"));
    }

    #[test]
    fn absolute_url_keeps_sub_path() {
        let (req, _) = requester(FILES, None);
        assert_eq!(
            req.absolute_url("/remote.php/dav/files/alice/b.txt"),
            "https://cloud.example.com/nc/remote.php/dav/files/alice/b.txt"
        );
    }

    #[test]
    fn root_entry_matches_with_endpoint_sub_path() {
        let body = r#"<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/nc/remote.php/dav/files/alice/</d:href><d:propstat><d:prop/><d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>
  <d:response><d:href>/nc/remote.php/dav/files/alice/x</d:href><d:propstat><d:prop/><d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>
</d:multistatus>"#;
        let (req, _) = requester(FILES, Some(RawResponse::new(207, body)));
        let request = Request::new(nextcloud_core::HttpVerb::Propfind, req.path(&["alice"]));
        let resp = req.send(request).unwrap();
        assert!(resp.self_entry().is_some());
        assert_eq!(resp.property_sets().len(), 1);
    }
}
