//! Table store seam.
//!
//! `TableStore` mirrors the handful of DynamoDB calls the dispatcher needs and
//! stays as close as possible to `aws_sdk_dynamodb::Client`, so the code above
//! it can run against the real service or the in-memory store.

mod dynamo;
mod memory;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::TableStatus;

use crate::conversions::Item;
use crate::errors::StoreError;
use crate::table_operations::TableSpec;

pub use dynamo::DynamoStore;
pub use memory::{MemoryStore, StoreOp};

/// One page of scan results.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Continuation token; `None` once the table is exhausted.
    pub last_evaluated_key: Option<Item>,
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Current status of a table. Fails with a resource-not-found error when
    /// the table does not exist.
    async fn describe_table(&self, table: &str) -> Result<TableStatus, StoreError>;

    async fn create_table(&self, table: &str, spec: &TableSpec) -> Result<(), StoreError>;

    async fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError>;

    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>, StoreError>;

    async fn delete_item(&self, table: &str, key: Item) -> Result<(), StoreError>;

    async fn scan_page(
        &self,
        table: &str,
        exclusive_start_key: Option<Item>,
    ) -> Result<ScanPage, StoreError>;
}
