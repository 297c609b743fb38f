//! User provisioning API.

use nextcloud_core::Dialect;

use crate::error::ApiResult;
use crate::request::Params;
use crate::requester::Requester;
use crate::response::Response;
use crate::segments;
use crate::wrapper::{ApiWrapper, WrapperDescriptor};

/// Editable user attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Email,
    Quota,
    DisplayName,
    Phone,
    Address,
    Website,
    Twitter,
    Password,
}

impl UserField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Quota => "quota",
            Self::DisplayName => "displayname",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Website => "website",
            Self::Twitter => "twitter",
            Self::Password => "password",
        }
    }
}

impl std::str::FromStr for UserField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "quota" => Ok(Self::Quota),
            "displayname" | "display_name" => Ok(Self::DisplayName),
            "phone" => Ok(Self::Phone),
            "address" => Ok(Self::Address),
            "website" => Ok(Self::Website),
            "twitter" => Ok(Self::Twitter),
            "password" => Ok(Self::Password),
            other => Err(format!("unknown user field: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Users {
    requester: Requester,
}

impl ApiWrapper for Users {
    const DESCRIPTOR: WrapperDescriptor =
        WrapperDescriptor::new("users", Dialect::Provisioning).with_api_path("/ocs/v1.php/cloud/users");

    fn from_requester(requester: Requester) -> Self {
        Self { requester }
    }
}

impl Users {
    /// Lists user ids, optionally filtered and paginated.
    pub fn get_users(
        &self,
        search: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> ApiResult<Response> {
        let params = Params::new()
            .with_opt("search", search)
            .with_opt("limit", limit)
            .with_opt("offset", offset);
        self.requester.get(&segments![], params)
    }

    pub fn get_user(&self, uid: &str) -> ApiResult<Response> {
        self.requester.get(&segments![uid], Params::new())
    }

    pub fn add_user(&self, uid: &str, password: &str) -> ApiResult<Response> {
        let params = Params::new().with("userid", uid).with("password", password);
        self.requester.post(&segments![], params)
    }

    /// Changes one attribute of a user.
    ///
    /// Quota takes a size such as `1GB`, or `none`.
    pub fn edit_user(&self, uid: &str, field: UserField, value: &str) -> ApiResult<Response> {
        let params = Params::new().with("key", field.as_str()).with("value", value);
        self.requester.put(&segments![uid], params)
    }

    pub fn enable_user(&self, uid: &str) -> ApiResult<Response> {
        self.requester.put(&segments![uid, "enable"], Params::new())
    }

    pub fn disable_user(&self, uid: &str) -> ApiResult<Response> {
        self.requester.put(&segments![uid, "disable"], Params::new())
    }

    pub fn delete_user(&self, uid: &str) -> ApiResult<Response> {
        self.requester.delete(&segments![uid], Params::new())
    }
}
