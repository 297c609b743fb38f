//! OCS share API.

use nextcloud_core::{Dialect, Permission, ShareType};

use crate::error::ApiResult;
use crate::request::Params;
use crate::requester::Requester;
use crate::response::Response;
use crate::segments;
use crate::wrapper::{ApiWrapper, WrapperDescriptor};

/// Optional settings of a new share.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareOptions {
    /// User or group id; required for user and group shares.
    pub share_with: Option<String>,
    /// Allow uploads into a public link folder.
    pub public_upload: Option<bool>,
    /// Password protecting a public link.
    pub password: Option<String>,
    pub permissions: Option<Permission>,
}

/// Changes applied to an existing share. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareUpdate {
    pub permissions: Option<Permission>,
    pub password: Option<String>,
    pub public_upload: Option<bool>,
    /// Expiration date as `YYYY-MM-DD`.
    pub expire_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Shares {
    requester: Requester,
}

impl ApiWrapper for Shares {
    const DESCRIPTOR: WrapperDescriptor = WrapperDescriptor::new("shares", Dialect::OcsV1)
        .with_api_path("/ocs/v1.php/apps/files_sharing/api/v1");

    fn from_requester(requester: Requester) -> Self {
        Self { requester }
    }
}

impl Shares {
    /// Lists shares of the current user, or the shares of `path`.
    ///
    /// `reshares` includes shares by others on the same files; `subfiles`
    /// lists the shares inside the folder `path`.
    pub fn get_shares(
        &self,
        path: Option<&str>,
        reshares: Option<bool>,
        subfiles: Option<bool>,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with_opt("path", path)
            .with_opt("reshares", reshares)
            .with_opt("subfiles", subfiles);
        self.requester.get(&segments!["shares"], params)
    }

    pub fn get_share_info(&self, share_id: u64) -> ApiResult<Response> {
        self.requester.get(&segments!["shares", share_id], Params::new())
    }

    pub fn create_share(
        &self,
        path: &str,
        share_type: ShareType,
        options: &ShareOptions,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with("path", path)
            .with("shareType", share_type)
            .with_opt("shareWith", options.share_with.as_deref())
            .with_opt("publicUpload", options.public_upload)
            .with_opt("password", options.password.as_deref())
            .with_opt("permissions", options.permissions);
        self.requester.post(&segments!["shares"], params)
    }

    pub fn update_share(&self, share_id: u64, update: &ShareUpdate) -> ApiResult<Response> {
        let params = Params::new()
            .with_opt("permissions", update.permissions)
            .with_opt("password", update.password.as_deref())
            .with_opt("publicUpload", update.public_upload)
            .with_opt("expireDate", update.expire_date.as_deref());
        self.requester.put(&segments!["shares", share_id], params)
    }

    pub fn delete_share(&self, share_id: u64) -> ApiResult<Response> {
        self.requester.delete(&segments!["shares", share_id], Params::new())
    }
}
