//! Client bindings for the Nextcloud APIs.
//!
//! This crate provides the request layer and the endpoint wrappers:
//!
//! - [`Request`] - An HTTP call described as plain data
//! - [`Transport`] - The seam that executes requests ([`HttpTransport`] uses reqwest)
//! - [`Requester`] - Per-wrapper dispatch applying the dialect conventions
//! - [`Response`] - Normalized envelope with the success flag and parsed payload
//! - [`Registry`] - The set of wrappers the facade exposes
//! - [`NextCloud`] - The facade handing out wrappers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │   Spreed    │   │   WebDav    │   │   Shares…   │
//! └──────┬──────┘   └──────┬──────┘   └──────┬──────┘
//!        │   Request       │                 │
//!        └─────────────────┼─────────────────┘
//!                          ▼
//!                   ┌─────────────┐
//!                   │  Requester  │──── Dialect success codes
//!                   └──────┬──────┘
//!                          ▼
//!                   ┌─────────────┐
//!                   │  Transport  │
//!                   └──────┬──────┘
//!                          ▼ RawResponse
//!                   ┌─────────────┐
//!                   │  Response   │
//!                   └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use nextcloud_api::{ClientConfig, NextCloud};
//!
//! let config = ClientConfig::new("https://cloud.example.com")?
//!     .with_credentials("alice", "app-password");
//! let nc = NextCloud::new(config)?;
//! let rooms = nc.talk().get_user_conversations(None, None)?;
//! if let (true, Some(data)) = (rooms.is_success(), rooms.json()) {
//!     println!("{}", data);
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod requester;
pub mod response;
pub mod transport;
pub mod webdav;
pub mod wrapper;
pub mod wrappers;

// Re-export main types at crate root
pub use client::NextCloud;
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use request::{ParamValue, Params, Request, RequestBody, encode_path, join_path};
pub use requester::Requester;
pub use response::{OcsMeta, ParseError, Payload, Response};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use webdav::PropertySet;
pub use wrapper::{ApiWrapper, DECLARED_WRAPPERS, Registry, WrapperDescriptor, resolve_default};

pub use nextcloud_core::{Dialect, HttpVerb, Permission, ShareType};
