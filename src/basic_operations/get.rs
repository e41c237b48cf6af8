//! Get item operation.

use std::collections::BTreeMap;

use crate::conversions::{from_store_record, key_for};
use crate::errors::DispatchError;
use crate::metrics::OperationTimer;
use crate::store::TableStore;

/// Fetch one item by id.
///
/// No field validation happens here: a blank id or table surfaces as a
/// not-found or get failure from the store.
pub async fn get_item(
    store: &dyn TableStore,
    table: &str,
    id: &str,
) -> Result<BTreeMap<String, String>, DispatchError> {
    let timer = OperationTimer::start("get_item");
    let record = store
        .get_item(table, key_for(id))
        .await
        .map_err(DispatchError::Get)?;

    match record {
        Some(record) => {
            timer.finish(table, 1);
            Ok(from_store_record(record))
        }
        None => Err(DispatchError::NotFound { id: id.to_string() }),
    }
}
