//! Table creation.

use tracing::info;

use crate::conversions::KEY_ATTRIBUTE;
use crate::errors::StoreError;
use crate::store::TableStore;

/// Key schema and provisioned throughput of a new table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// String-typed hash key. Tables never get a sort key.
    pub hash_key: &'static str,
    pub read_capacity: i64,
    pub write_capacity: i64,
}

/// Schema every table is created with.
pub const DEFAULT_TABLE: TableSpec = TableSpec {
    hash_key: KEY_ATTRIBUTE,
    read_capacity: 5,
    write_capacity: 5,
};

/// Create a table.
///
/// Returns `Ok(true)` when this call created it and `Ok(false)` when another
/// writer got there first (the store answered resource-in-use).
pub async fn create_table(
    store: &dyn TableStore,
    table: &str,
    spec: &TableSpec,
) -> Result<bool, StoreError> {
    match store.create_table(table, spec).await {
        Ok(()) => {
            info!(table, hash_key = spec.hash_key, "creating table");
            Ok(true)
        }
        Err(e) if e.is_in_use() => {
            info!(table, "table is already being created");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
