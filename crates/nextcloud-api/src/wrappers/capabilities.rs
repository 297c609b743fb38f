//! Server capabilities.

use nextcloud_core::Dialect;

use crate::error::ApiResult;
use crate::request::Params;
use crate::requester::Requester;
use crate::response::Response;
use crate::segments;
use crate::wrapper::{ApiWrapper, WrapperDescriptor};

#[derive(Debug, Clone)]
pub struct Capabilities {
    requester: Requester,
}

impl ApiWrapper for Capabilities {
    const DESCRIPTOR: WrapperDescriptor = WrapperDescriptor::new("capabilities", Dialect::OcsV1)
        .with_api_path("/ocs/v1.php/cloud/capabilities");

    fn from_requester(requester: Requester) -> Self {
        Self { requester }
    }
}

impl Capabilities {
    /// Server version and the capabilities of every installed app.
    pub fn get_capabilities(&self) -> ApiResult<Response> {
        self.requester.get(&segments![], Params::new())
    }
}
