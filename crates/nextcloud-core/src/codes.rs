//! Numeric codes returned or accepted by the Nextcloud APIs.
//!
//! OCS endpoints report their outcome in the `ocs.meta.statuscode` field of
//! the JSON envelope, WebDAV endpoints through the HTTP status line. The
//! share and permission values are the ones accepted by the files_sharing
//! API.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Status codes of the OCS envelope.
pub mod ocs {
    /// Success for the `/ocs/v1.php` endpoints.
    pub const SUCCESS_V1: u16 = 100;
    /// Success for the `/ocs/v2.php` endpoints.
    pub const SUCCESS_V2: u16 = 200;
    pub const FAILURE: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const SYNC_CONFLICT: u16 = 409;
}

/// Status codes of the user provisioning API.
pub mod provisioning {
    pub const SUCCESS: u16 = 100;
    pub const INVALID_INPUT_DATA: u16 = 101;
    pub const FAILED: u16 = 102;
    pub const CREATION_FAILED: u16 = 103;
    pub const INSUFFICIENT_PRIVILEGES: u16 = 104;
    pub const CHANGE_FAILED: u16 = 105;
}

/// Status codes of the external (legacy) API.
pub mod external {
    pub const SUCCESS: u16 = 100;
    pub const SERVER_ERROR: u16 = 996;
    pub const NOT_AUTHORIZED: u16 = 997;
    pub const NOT_FOUND: u16 = 998;
    pub const UNKNOWN_ERROR: u16 = 999;
}

/// HTTP statuses that matter to WebDAV operations.
pub mod webdav {
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const MULTISTATUS: u16 = 207;
    pub const NOT_AUTHENTICATED: u16 = 401;
    pub const ALREADY_EXISTS: u16 = 405;
    pub const PRECONDITION_FAILED: u16 = 412;
}

/// Quota value meaning "no limit".
pub const QUOTA_UNLIMITED: i64 = -3;

/// Kind of recipient a share is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ShareType {
    User,
    Group,
    PublicLink,
    FederatedCloudShare,
}

impl ShareType {
    /// Returns the numeric value sent to the server.
    pub fn code(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Group => 1,
            Self::PublicLink => 3,
            Self::FederatedCloudShare => 6,
        }
    }
}

impl From<ShareType> for u8 {
    fn from(value: ShareType) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for ShareType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::User),
            1 => Ok(Self::Group),
            3 => Ok(Self::PublicLink),
            6 => Ok(Self::FederatedCloudShare),
            other => Err(format!("unknown share type {}", other)),
        }
    }
}

/// Share permissions.
///
/// A share's permission value is the sum of the selected flags, so values
/// combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Permission(u8);

impl Permission {
    pub const NONE: Self = Self(0);
    pub const READ: Self = Self(1);
    pub const UPDATE: Self = Self(2);
    pub const CREATE: Self = Self(4);
    pub const DELETE: Self = Self(8);
    pub const SHARE: Self = Self(16);
    pub const ALL: Self = Self(31);

    /// Builds a permission from its raw value, dropping unknown bits.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the raw value sent to the server.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every flag of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl From<u8> for Permission {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<Permission> for u8 {
    fn from(permission: Permission) -> Self {
        permission.0
    }
}

impl BitOr for Permission {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permission {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_type_codes() {
        assert_eq!(ShareType::User.code(), 0);
        assert_eq!(ShareType::Group.code(), 1);
        assert_eq!(ShareType::PublicLink.code(), 3);
        assert_eq!(ShareType::FederatedCloudShare.code(), 6);
        assert_eq!(ShareType::try_from(3), Ok(ShareType::PublicLink));
        assert!(ShareType::try_from(2).is_err());
    }

    #[test]
    fn share_type_serializes_as_number() {
        let json = serde_json::to_string(&ShareType::FederatedCloudShare).unwrap();
        assert_eq!(json, "6");
        let back: ShareType = serde_json::from_str("1").unwrap();
        assert_eq!(back, ShareType::Group);
    }

    #[test]
    fn permissions_combine_as_sum() {
        let perms = Permission::READ | Permission::UPDATE | Permission::SHARE;
        assert_eq!(perms.bits(), 19);
        assert!(perms.contains(Permission::READ));
        assert!(!perms.contains(Permission::DELETE));

        let all = Permission::READ
            | Permission::UPDATE
            | Permission::CREATE
            | Permission::DELETE
            | Permission::SHARE;
        assert_eq!(all, Permission::ALL);
        assert_eq!(Permission::from_bits(0xff), Permission::ALL);
    }

    #[test]
    fn permissions_from_json_drop_unknown_bits() {
        let perms: Permission = serde_json::from_str("255").unwrap();
        assert_eq!(perms, Permission::ALL);
        let read_share: Permission = serde_json::from_str("49").unwrap();
        assert_eq!(read_share, Permission::READ | Permission::SHARE);
        assert_eq!(serde_json::to_string(&read_share).unwrap(), "17");
    }
}
