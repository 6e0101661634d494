use super::Dao;
use crate::core::{PAGINATION_KEY, Pager, Record};
use crate::mapper::pagination_key;
use crate::storage::{Filter, FindOptions, SortOrder};
use tracing::{Instrument, Level, event, info_span};

impl Dao {
    /// Read the next page of a full namespace scan.
    ///
    /// Records come back in pagination-key order, starting after
    /// `pager.last_key`. On a non-empty page the pager moves to the last
    /// returned key and its `count` grows by the page size. An empty page,
    /// a blank tenant or a fault leaves the pager untouched. Without a pager
    /// the first page is read with the default limit.
    pub async fn read_page(&self, tenant: &str, pager: Option<&mut Pager>) -> Vec<Record> {
        let mut default_pager = Pager::default();
        let pager = pager.unwrap_or(&mut default_pager);

        let Some(namespace) = self.namespace(tenant) else {
            return Vec::new();
        };

        let limit = pager.effective_limit();
        let filter = match &pager.last_key {
            Some(last_key) => Filter::gt(PAGINATION_KEY, last_key.as_str()),
            None => Filter::All,
        };
        let options = FindOptions::new()
            .sort_by(PAGINATION_KEY, SortOrder::Ascending)
            .batch_size(limit)
            .limit(limit);

        let span = info_span!("dao.read_page", tenant = %tenant, page = pager.page, limit);
        async {
            let result = async { self.store()?.find(&namespace, &filter, &options).await }.await;
            let documents = match result {
                Ok(documents) => documents,
                Err(err) => {
                    event!(Level::ERROR, error = %err, "readPage failed");
                    return Vec::new();
                }
            };

            let mut results = Vec::with_capacity(documents.len());
            let mut last_key = None;
            for document in documents {
                let key = pagination_key(&document).map(str::to_string);
                if let Some(record) = self.mapper.from_document(Some(document)) {
                    results.push(record);
                    if key.is_some() {
                        last_key = key;
                    }
                }
            }

            if !results.is_empty() {
                if last_key.is_some() {
                    pager.last_key = last_key;
                }
                pager.count += results.len() as u64;
            }
            event!(Level::DEBUG, results = results.len(), "readPage() page: {}", pager.page);
            results
        }
        .instrument(span)
        .await
    }
}
