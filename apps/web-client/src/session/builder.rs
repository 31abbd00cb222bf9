use std::sync::Arc;

use super::context::SessionContext;
use crate::auth::{CredentialStore, FileCredentialStore};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{ReqwestTransport, Transport};
use crate::routes::{Navigator, TracingNavigator};

/// Builder for creating a ready SessionContext (used in both tests and the CLI)
pub struct SessionBuilder {
    config: ClientConfig,
    store: Option<Arc<dyn CredentialStore>>,
    transport: Option<Arc<dyn Transport>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            store: None,
            transport: None,
            navigator: None,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Fill in defaults from the config (reqwest transport, per-origin
    /// credential file, logging navigator) and restore any stored session.
    pub fn build(self) -> Result<SessionContext, ClientError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        let store: Arc<dyn CredentialStore> = match self.store {
            Some(store) => store,
            None => Arc::new(FileCredentialStore::new(self.config.credentials_path())),
        };
        let navigator: Arc<dyn Navigator> = match self.navigator {
            Some(navigator) => navigator,
            None => Arc::new(TracingNavigator),
        };

        let session = SessionContext::new(store, transport, navigator);
        session.initialize();
        Ok(session)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_session() -> SessionBuilder {
    SessionBuilder::new()
}
