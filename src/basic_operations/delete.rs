//! Delete item operation.

use tracing::info;

use crate::conversions::key_for;
use crate::errors::DispatchError;
use crate::metrics::OperationTimer;
use crate::request::{KEYED_FIELDS, RequestBody, validate};
use crate::store::TableStore;

/// Delete one item by id. The table is expected to exist already.
///
/// Deleting an id that is not stored succeeds.
pub async fn delete_item(
    store: &dyn TableStore,
    body: &RequestBody,
) -> Result<(), DispatchError> {
    validate(body, KEYED_FIELDS)?;

    let timer = OperationTimer::start("delete_item");
    store
        .delete_item(&body.table_name, key_for(&body.id))
        .await
        .map_err(DispatchError::Delete)?;

    info!(table = %body.table_name, id = %body.id, "item deleted");
    timer.finish(&body.table_name, 1);
    Ok(())
}
