//! Tenant-to-namespace resolution and namespace lifecycle.
//!
//! Every tenant owns one collection named `"{prefix}-{tenant}"`. The root
//! tenant and names that already carry the prefix map to themselves.
//! Lifecycle operations never fail outward: faults are logged and turned into
//! `false`, `-1` or an empty list.

mod identity;

pub use identity::TenantIdentity;

use crate::storage::DocumentStore;
use log::{debug, error, info};
use std::sync::Arc;

pub struct NamespaceResolver {
    store: Arc<dyn DocumentStore>,
    identity: TenantIdentity,
}

impl NamespaceResolver {
    pub fn new(store: Arc<dyn DocumentStore>, identity: TenantIdentity) -> Self {
        Self { store, identity }
    }

    pub fn identity(&self) -> &TenantIdentity {
        &self.identity
    }

    /// Collection name for a tenant, `None` when the tenant id is blank.
    pub fn resolve_name(&self, tenant: &str) -> Option<String> {
        if tenant.trim().is_empty() {
            return None;
        }
        if self.identity.is_root(tenant) || self.identity.is_prefixed(tenant) {
            Some(tenant.to_string())
        } else {
            Some(format!("{}-{}", self.identity.prefix(), tenant))
        }
    }

    /// Case-insensitive lookup among existing collections.
    pub async fn exists(&self, tenant: &str) -> bool {
        let Some(name) = self.resolve_name(tenant) else {
            return false;
        };
        match self.store.list_collection_names().await {
            Ok(names) => names.iter().any(|n| n.eq_ignore_ascii_case(&name)),
            Err(err) => {
                debug!("Namespace lookup for '{}' failed: {}", name, err);
                false
            }
        }
    }

    /// Create the tenant's namespace. Returns `false` for blank ids, ids
    /// containing whitespace, existing namespaces, and faults.
    pub async fn create(&self, tenant: &str) -> bool {
        if tenant.trim().is_empty()
            || tenant.chars().any(char::is_whitespace)
            || self.exists(tenant).await
        {
            return false;
        }
        let Some(name) = self.resolve_name(tenant) else {
            return false;
        };
        match self.store.create_collection(&name).await {
            Ok(()) => {
                info!("Created namespace '{}'.", name);
                true
            }
            Err(err) => {
                error!("Failed to create namespace '{}': {}", name, err);
                false
            }
        }
    }

    /// Drop the tenant's namespace. `true` only when the drop was confirmed by
    /// the store.
    pub async fn drop(&self, tenant: &str) -> bool {
        if !self.exists(tenant).await {
            return false;
        }
        let Some(name) = self.resolve_name(tenant) else {
            return false;
        };
        match self.store.drop_collection(&name).await {
            Ok(()) => {
                info!("Deleted namespace '{}'.", name);
                true
            }
            Err(err) => {
                error!("Failed to delete namespace '{}': {}", name, err);
                false
            }
        }
    }

    /// Number of documents in the tenant's namespace, `-1` on blank ids and faults.
    pub async fn count(&self, tenant: &str) -> i64 {
        let Some(name) = self.resolve_name(tenant) else {
            return -1;
        };
        match self.store.count_documents(&name).await {
            Ok(count) => i64::try_from(count).unwrap_or(i64::MAX),
            Err(err) => {
                error!("Failed to count namespace '{}': {}", name, err);
                -1
            }
        }
    }

    /// Every namespace visible through the store.
    pub async fn list(&self) -> Vec<String> {
        match self.store.list_collection_names().await {
            Ok(names) => names,
            Err(err) => {
                error!("Failed to list namespaces: {}", err);
                Vec::new()
            }
        }
    }
}
