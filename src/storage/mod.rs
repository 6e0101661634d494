pub mod collection;
pub mod engine;
pub mod filter;
pub mod memory;

pub use collection::Collection;
pub use engine::{
    BulkWriteResult, DocumentStore, FindOptions, SortOrder, UpdateResult, WriteModel,
};
pub use filter::Filter;
pub use memory::InMemoryStore;
