//! The `NextCloud` facade.

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::requester::Requester;
use crate::transport::{HttpTransport, Transport};
use crate::wrapper::{ApiWrapper, Registry};
use crate::wrappers::{Capabilities, Shares, Spreed, Users, WebDav};

/// Client for one Nextcloud instance.
///
/// Wrappers share the configuration and the transport, so creating them is
/// cheap. Only wrappers present in the registry can be obtained.
#[derive(Clone)]
pub struct NextCloud {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    registry: &'static Registry,
}

impl std::fmt::Debug for NextCloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextCloud")
            .field("endpoint", &self.config.endpoint_str())
            .field("user", &self.config.username())
            .field("wrappers", &self.registry.names())
            .finish()
    }
}

impl NextCloud {
    /// Creates a client talking HTTP to the configured endpoint.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client on top of an existing transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        debug!(endpoint = config.endpoint_str(), "Creating Nextcloud client");
        Self {
            config: Arc::new(config),
            transport,
            registry: Registry::global(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Builds wrapper `W`, failing when it is not registered.
    pub fn wrapper<W: ApiWrapper>(&self) -> ApiResult<W> {
        let descriptor = self.registry.get(W::DESCRIPTOR.name).ok_or_else(|| {
            ApiError::configuration("wrapper is not registered").with_wrapper(W::DESCRIPTOR.name)
        })?;
        let requester = Requester::new(*descriptor, self.transport.clone(), self.config.clone());
        Ok(W::from_requester(requester))
    }

    fn registered<W: ApiWrapper>(&self) -> W {
        let requester = Requester::new(W::DESCRIPTOR, self.transport.clone(), self.config.clone());
        W::from_requester(requester)
    }

    /// Talk conversations, participants and chat.
    pub fn talk(&self) -> Spreed {
        self.registered()
    }

    pub fn files(&self) -> WebDav {
        self.registered()
    }

    pub fn shares(&self) -> Shares {
        self.registered()
    }

    pub fn users(&self) -> Users {
        self.registered()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.registered()
    }
}
