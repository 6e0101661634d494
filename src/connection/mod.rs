pub mod config;

use crate::core::{Result, StoreError};
use crate::namespace::{NamespaceResolver, TenantIdentity};
use crate::storage::{DocumentStore, InMemoryStore};
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use config::StoreConfig;

/// Owned handle onto a document store
///
/// Construct one per process (or per store) and share it behind an `Arc`.
/// Connecting makes sure the root tenant's namespace exists. Call
/// [`StoreClient::close`] during teardown; it releases the store once.
pub struct StoreClient {
    config: StoreConfig,
    store: Arc<dyn DocumentStore>,
    namespaces: NamespaceResolver,
    closed: AtomicBool,
}

impl StoreClient {
    /// Connect through an existing store driver
    pub async fn connect(config: StoreConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        info!(
            "Store endpoint: {}, database: {}",
            config.endpoint(),
            store.database_name()
        );

        // Fails fast when the store is unreachable.
        let existing = store.list_collection_names().await?;

        let identity = TenantIdentity::from_config(&config);
        let namespaces = NamespaceResolver::new(Arc::clone(&store), identity);
        let client = Self {
            config,
            store,
            namespaces,
            closed: AtomicBool::new(false),
        };

        let root = client.config.root_app.clone();
        if !existing.iter().any(|name| name.eq_ignore_ascii_case(&root)) {
            client.namespaces.create(&root).await;
        }
        Ok(client)
    }

    /// Connect to a fresh in-memory store named after `config.database`
    pub async fn in_memory(config: StoreConfig) -> Result<Self> {
        let store = Arc::new(InMemoryStore::new(config.database.clone()));
        Self::connect(config, store).await
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn namespaces(&self) -> &NamespaceResolver {
        &self.namespaces
    }

    pub fn root_tenant(&self) -> &str {
        &self.config.root_app
    }

    /// The store driver, or `StoreError::Closed` after [`StoreClient::close`]
    pub fn store(&self) -> Result<&dyn DocumentStore> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(self.store.as_ref())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release the store. Only the first call has an effect.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.store.shutdown().await;
        info!("Store client for database '{}' closed", self.store.database_name());
    }
}
