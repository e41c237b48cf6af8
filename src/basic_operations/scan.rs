//! Scan operation.

use std::collections::BTreeMap;
use tracing::debug;

use crate::conversions::from_store_record;
use crate::errors::DispatchError;
use crate::metrics::OperationTimer;
use crate::request::{RequiredField, RequestBody, validate};
use crate::store::TableStore;

/// Read every item of a table, following continuation keys until the store
/// reports no more pages.
pub async fn scan_all(
    store: &dyn TableStore,
    body: &RequestBody,
) -> Result<Vec<BTreeMap<String, String>>, DispatchError> {
    validate(body, &[RequiredField::TableName])?;
    let table = body.table_name.as_str();

    let timer = OperationTimer::start("scan");
    let mut items = Vec::new();
    let mut start_key = None;
    let mut pages = 0usize;

    loop {
        let page = store
            .scan_page(table, start_key.take())
            .await
            .map_err(DispatchError::Scan)?;
        pages += 1;
        items.extend(page.items.into_iter().map(from_store_record));

        match page.last_evaluated_key {
            Some(key) => start_key = Some(key),
            None => break,
        }
    }

    debug!(table, pages, "scan finished");
    timer.finish(table, items.len());
    Ok(items)
}
