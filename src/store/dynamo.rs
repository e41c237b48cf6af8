//! `TableStore` backed by the AWS SDK DynamoDB client.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType,
    TableStatus,
};

use super::{ScanPage, TableStore};
use crate::conversions::Item;
use crate::errors::{StoreError, StoreErrorKind, map_sdk_error};
use crate::table_operations::TableSpec;

/// DynamoDB-backed store. Cloning is cheap; the SDK client is shared.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn build_failed(what: &str, err: BuildError) -> StoreError {
    StoreError::new(
        StoreErrorKind::Other,
        format!("Failed to build {}: {}", what, err),
    )
}

#[async_trait]
impl TableStore for DynamoStore {
    async fn describe_table(&self, table: &str) -> Result<TableStatus, StoreError> {
        let output = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Some(table)))?;

        Ok(output
            .table()
            .and_then(|t| t.table_status())
            .cloned()
            .unwrap_or_else(|| TableStatus::from("UNKNOWN")))
    }

    async fn create_table(&self, table: &str, spec: &TableSpec) -> Result<(), StoreError> {
        let key_schema = KeySchemaElement::builder()
            .attribute_name(spec.hash_key)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| build_failed("key schema", e))?;

        let attribute = AttributeDefinition::builder()
            .attribute_name(spec.hash_key)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| build_failed("attribute definition", e))?;

        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(spec.read_capacity)
            .write_capacity_units(spec.write_capacity)
            .build()
            .map_err(|e| build_failed("provisioned throughput", e))?;

        self.client
            .create_table()
            .table_name(table)
            .key_schema(key_schema)
            .attribute_definitions(attribute)
            .provisioned_throughput(throughput)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Some(table)))?;

        Ok(())
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Some(table)))?;
        Ok(())
    }

    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Some(table)))?;
        Ok(output.item)
    }

    async fn delete_item(&self, table: &str, key: Item) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Some(table)))?;
        Ok(())
    }

    async fn scan_page(
        &self,
        table: &str,
        exclusive_start_key: Option<Item>,
    ) -> Result<ScanPage, StoreError> {
        let output = self
            .client
            .scan()
            .table_name(table)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Some(table)))?;

        Ok(ScanPage {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key.filter(|key| !key.is_empty()),
        })
    }
}
