//! Group folders app.
//!
//! Declared but not verified against a server, so the registry never exposes
//! it through the facade.

use nextcloud_core::Dialect;

use crate::error::ApiResult;
use crate::request::Params;
use crate::requester::Requester;
use crate::response::Response;
use crate::segments;
use crate::wrapper::{ApiWrapper, WrapperDescriptor};

#[derive(Debug, Clone)]
pub struct GroupFolders {
    requester: Requester,
}

impl ApiWrapper for GroupFolders {
    const DESCRIPTOR: WrapperDescriptor = WrapperDescriptor::new("group_folders", Dialect::OcsV1)
        .with_api_path("/apps/groupfolders")
        .unverified();

    fn from_requester(requester: Requester) -> Self {
        Self { requester }
    }
}

impl GroupFolders {
    pub fn get_group_folders(&self) -> ApiResult<Response> {
        self.requester.get(&segments!["folders"], Params::new())
    }

    pub fn create_group_folder(&self, mountpoint: &str) -> ApiResult<Response> {
        let params = Params::new().with("mountpoint", mountpoint);
        self.requester.post(&segments!["folders"], params)
    }

    pub fn delete_group_folder(&self, folder_id: u64) -> ApiResult<Response> {
        self.requester
            .delete(&segments!["folders", folder_id], Params::new())
    }
}
