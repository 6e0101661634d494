//! Root-tenant shorthands. Each one delegates to the tenant-scoped operation
//! with the configured root tenant id.

use super::{Dao, RecordMap};
use crate::core::{Pager, Record};

impl Dao {
    fn root_tenant(&self) -> String {
        self.client.root_tenant().to_string()
    }

    pub async fn create_root(&self, record: Option<&mut Record>) -> Option<String> {
        self.create(&self.root_tenant(), record).await
    }

    pub async fn read_root(&self, id: &str) -> Option<Record> {
        self.read(&self.root_tenant(), id).await
    }

    pub async fn update_root(&self, record: Option<&mut Record>) {
        self.update(&self.root_tenant(), record).await
    }

    pub async fn delete_root(&self, record: Option<&Record>) {
        self.delete(&self.root_tenant(), record).await
    }

    pub async fn create_all_root<'a, I>(&self, records: I)
    where
        I: IntoIterator<Item = Option<&'a mut Record>>,
    {
        self.create_all(&self.root_tenant(), records).await
    }

    pub async fn read_all_root(&self, ids: &[String], all_fields: bool) -> RecordMap {
        self.read_all(&self.root_tenant(), ids, all_fields).await
    }

    pub async fn read_page_root(&self, pager: Option<&mut Pager>) -> Vec<Record> {
        self.read_page(&self.root_tenant(), pager).await
    }

    pub async fn update_all_root<'a, I>(&self, records: I)
    where
        I: IntoIterator<Item = Option<&'a mut Record>>,
    {
        self.update_all(&self.root_tenant(), records).await
    }

    pub async fn delete_all_root<'a, I>(&self, records: I)
    where
        I: IntoIterator<Item = Option<&'a Record>>,
    {
        self.delete_all(&self.root_tenant(), records).await
    }
}
