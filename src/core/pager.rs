use serde::{Deserialize, Serialize};

/// Default number of records per page.
pub const DEFAULT_LIMIT: usize = 30;

/// Caller-owned cursor for resumable scans.
///
/// `read_page` advances `last_key` and `count` after every non-empty page. The
/// DAO never stores a pager; carry it between calls yourself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    /// Pagination key of the last record returned so far.
    pub last_key: Option<String>,
    /// Maximum number of records per page.
    pub limit: usize,
    /// Running total of records returned through this pager.
    pub count: u64,
    /// Current page number (1-based).
    pub page: u64,
}

impl Pager {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            last_key: None,
            limit: limit.max(1),
            count: 0,
            page: 1,
        }
    }

    /// Resume after the given pagination key.
    pub fn after(mut self, last_key: impl Into<String>) -> Self {
        self.last_key = Some(last_key.into());
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page.max(1);
        self
    }

    /// Effective limit; a deserialized zero counts as one.
    pub fn effective_limit(&self) -> usize {
        self.limit.max(1)
    }

    pub fn has_started(&self) -> bool {
        self.last_key.is_some()
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}
