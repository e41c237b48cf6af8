//! Table existence check.

use aws_sdk_dynamodb::types::TableStatus;

use crate::errors::StoreError;
use crate::store::TableStore;

/// Describe a table, mapping "not found" to `None`.
pub async fn table_exists(
    store: &dyn TableStore,
    table: &str,
) -> Result<Option<TableStatus>, StoreError> {
    match store.describe_table(table).await {
        Ok(status) => Ok(Some(status)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
