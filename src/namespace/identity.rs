use crate::connection::StoreConfig;

const APP_QUALIFIER: &str = "app:";

/// Root-tenant predicate and namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantIdentity {
    root: String,
    prefix: String,
}

impl TenantIdentity {
    pub fn new(root: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.root_app.clone(), config.prefix.clone())
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True when `tenant` names the root tenant, with or without the `app:`
    /// qualifier.
    pub fn is_root(&self, tenant: &str) -> bool {
        !tenant.trim().is_empty() && unqualified(tenant) == unqualified(&self.root)
    }

    /// True when `name` already starts with `"{prefix}-"`.
    pub fn is_prefixed(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

fn unqualified(tenant: &str) -> &str {
    tenant.strip_prefix(APP_QUALIFIER).unwrap_or(tenant)
}
