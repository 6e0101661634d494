// ============================================================================
// tenantdb Library
// ============================================================================

//! Multi-tenant persistence adapter over a document store.
//!
//! Each tenant's records live in their own namespace (collection). The
//! [`Dao`] maps records to documents and back, and offers CRUD, bulk CRUD and
//! a cursor-paginated scan that stays stable across calls.
//!
//! ```
//! use std::sync::Arc;
//! use tenantdb::{Dao, Pager, Record, StoreClient, StoreConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = StoreClient::in_memory(StoreConfig::default()).await.unwrap();
//! let dao = Dao::new(Arc::new(client));
//!
//! let mut note = Record::new("note").with("name", "first");
//! let id = dao.create("shop", Some(&mut note)).await.unwrap();
//! assert_eq!(dao.read("shop", &id).await, Some(note));
//!
//! let mut pager = Pager::with_limit(10);
//! let page = dao.read_page("shop", Some(&mut pager)).await;
//! assert_eq!(page.len(), 1);
//! assert_eq!(pager.count, 1);
//!
//! dao.client().close().await;
//! # }
//! ```

pub mod connection;
pub mod core;
pub mod dao;
pub mod mapper;
pub mod namespace;
pub mod storage;

// Re-export main types for convenience
pub use connection::{StoreClient, StoreConfig};
pub use crate::core::{Document, ObjectId, Pager, Record, Result, StoreError};
pub use dao::{Dao, RecordMap};
pub use mapper::{FieldKind, FieldSpec, FieldTag, RecordMapper, RecordSchema};
pub use namespace::{NamespaceResolver, TenantIdentity};
pub use storage::{DocumentStore, Filter, FindOptions, InMemoryStore, SortOrder, WriteModel};
