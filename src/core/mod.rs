pub mod error;
pub mod oid;
pub mod pager;
pub mod record;
pub mod types;

pub use error::{Result, StoreError};
pub use oid::{ObjectId, generate_id};
pub use pager::Pager;
pub use record::Record;
pub use types::{Document, PAGINATION_KEY, PRIMARY_KEY, is_blank, json_type_name, timestamp};
