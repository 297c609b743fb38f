//! Core types: protocol dialects, success codes, Nextcloud constants, tracing

pub mod codes;
pub mod dialect;
pub mod tracing;

pub use codes::{Permission, QUOTA_UNLIMITED, ShareType};
pub use dialect::{Dialect, HttpVerb};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
