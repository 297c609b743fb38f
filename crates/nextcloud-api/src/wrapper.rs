//! Wrapper descriptors and the registry of exposed wrappers.
//!
//! A wrapper is a named group of endpoint methods sharing a base path and a
//! dialect. Each wrapper type declares a [`WrapperDescriptor`]; the
//! [`DECLARED_WRAPPERS`] table lists every declared descriptor and the
//! [`Registry`] keeps those eligible to be exposed by the facade.

use std::sync::OnceLock;

use nextcloud_core::Dialect;
use tracing::debug;

use crate::error::ApiResult;
use crate::requester::Requester;
use crate::wrappers::{Capabilities, GroupFolders, Shares, Spreed, Users, WebDav};

/// Static description of a wrapper group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapperDescriptor {
    /// Unique wrapper name.
    pub name: &'static str,
    /// Base path from the instance root. `None` means not implemented.
    pub api_path: Option<&'static str>,
    pub dialect: Dialect,
    /// Unverified wrappers are declared but never exposed.
    pub verified: bool,
    /// Whether responses can be requested as JSON.
    pub json_capable: bool,
}

impl WrapperDescriptor {
    pub const fn new(name: &'static str, dialect: Dialect) -> Self {
        Self {
            name,
            api_path: None,
            dialect,
            verified: true,
            json_capable: !matches!(dialect, Dialect::WebDav),
        }
    }

    pub const fn with_api_path(mut self, api_path: &'static str) -> Self {
        self.api_path = Some(api_path);
        self
    }

    pub const fn unverified(mut self) -> Self {
        self.verified = false;
        self
    }

    pub const fn without_json(mut self) -> Self {
        self.json_capable = false;
        self
    }

    /// True when the wrapper may appear in a registry.
    pub const fn is_registrable(&self) -> bool {
        self.api_path.is_some() && self.verified
    }

    /// Base path, empty when unset.
    pub fn base_path(&self) -> &'static str {
        self.api_path.unwrap_or("")
    }
}

/// A wrapper type built on a [`Requester`].
pub trait ApiWrapper: Sized {
    const DESCRIPTOR: WrapperDescriptor;

    fn from_requester(requester: Requester) -> Self;
}

/// Every wrapper declared by this crate, registrable or not.
pub static DECLARED_WRAPPERS: &[WrapperDescriptor] = &[
    <Spreed as ApiWrapper>::DESCRIPTOR,
    <WebDav as ApiWrapper>::DESCRIPTOR,
    <Shares as ApiWrapper>::DESCRIPTOR,
    <Users as ApiWrapper>::DESCRIPTOR,
    <Capabilities as ApiWrapper>::DESCRIPTOR,
    <GroupFolders as ApiWrapper>::DESCRIPTOR,
];

/// Set of wrappers a facade may expose.
///
/// Membership is decided once, at construction: a descriptor is admitted
/// when its base path is set and it is verified. Names are unique; the first
/// descriptor with a given name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<WrapperDescriptor>,
}

impl Registry {
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = WrapperDescriptor>,
    {
        let mut entries: Vec<WrapperDescriptor> = Vec::new();
        for descriptor in descriptors {
            if !descriptor.is_registrable() {
                debug!(wrapper = descriptor.name, "Skipping unregistrable wrapper");
                continue;
            }
            if entries.iter().any(|e| e.name == descriptor.name) {
                debug!(wrapper = descriptor.name, "Skipping duplicate wrapper");
                continue;
            }
            entries.push(descriptor);
        }
        Self { entries }
    }

    /// Process-wide registry built from [`DECLARED_WRAPPERS`].
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let registry = Registry::from_descriptors(DECLARED_WRAPPERS.iter().copied());
            debug!(wrappers = registry.len(), "Wrapper registry initialized");
            registry
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&WrapperDescriptor> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WrapperDescriptor> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns `value` when set, otherwise asks `fallback` for it.
///
/// ```ignore
/// let file_id = resolve_default(file_id, || self.file_id_of(uid, path))?;
/// ```
pub fn resolve_default<T, F>(value: Option<T>, fallback: F) -> ApiResult<Option<T>>
where
    F: FnOnce() -> ApiResult<Option<T>>,
{
    match value {
        Some(value) => Ok(Some(value)),
        None => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    const INFO: WrapperDescriptor =
        WrapperDescriptor::new("info", Dialect::OcsV1).with_api_path("/ocs/v1.php/info");

    #[test]
    fn unset_path_is_never_registered() {
        let unset = WrapperDescriptor::new("abstract", Dialect::OcsV2);
        let registry = Registry::from_descriptors([unset, INFO]);
        assert!(!registry.contains("abstract"));
        assert!(registry.contains("info"));
    }

    #[test]
    fn unverified_is_never_registered() {
        let draft = WrapperDescriptor::new("draft", Dialect::OcsV1)
            .with_api_path("/apps/draft")
            .unverified();
        let registry = Registry::from_descriptors([draft]);
        assert!(registry.is_empty());
    }

    #[test]
    fn eligible_wrapper_appears_exactly_once() {
        let registry = Registry::from_descriptors([INFO, INFO, INFO]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.iter().filter(|d| d.name == "info").count(), 1);
    }

    #[test]
    fn webdav_descriptors_are_not_json_capable() {
        let files = WrapperDescriptor::new("files", Dialect::WebDav);
        assert!(!files.json_capable);
        assert!(INFO.json_capable);
        assert!(!INFO.without_json().json_capable);
    }

    #[test]
    fn global_registry_matches_declarations() {
        let registry = Registry::global();
        for descriptor in DECLARED_WRAPPERS {
            assert_eq!(
                registry.contains(descriptor.name),
                descriptor.is_registrable(),
                "{}",
                descriptor.name
            );
        }
        assert!(registry.contains("spreed"));
        assert!(!registry.contains("group_folders"));
    }

    #[test]
    fn declared_names_are_unique() {
        let mut names: Vec<_> = DECLARED_WRAPPERS.iter().map(|d| d.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DECLARED_WRAPPERS.len());
    }

    #[test]
    fn resolve_default_prefers_explicit_value() {
        let resolved = resolve_default(Some(7), || -> ApiResult<Option<i32>> {
            Err(ApiError::internal("fallback must not run"))
        });
        assert_eq!(resolved.unwrap(), Some(7));

        let resolved = resolve_default(None, || Ok(Some(42)));
        assert_eq!(resolved.unwrap(), Some(42));
    }
}
