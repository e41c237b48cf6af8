//! Put item operations (Insert and Insert-Big).

use tracing::info;

use crate::conversions::{ItemLayout, to_item};
use crate::errors::DispatchError;
use crate::metrics::OperationTimer;
use crate::request::{KEYED_FIELDS, Request, RequestBody, validate};
use crate::store::TableStore;
use crate::table_operations::{ProvisionSettings, ensure_table};

/// Validate, provision the table, then write one item.
///
/// `ItemLayout::Basic` writes the key and profile attributes;
/// `ItemLayout::WithData` also writes every non-empty `Data_N` slot.
pub async fn put_item(
    store: &dyn TableStore,
    provision: &ProvisionSettings,
    body: RequestBody,
    layout: ItemLayout,
) -> Result<(), DispatchError> {
    validate(&body, KEYED_FIELDS)?;
    let request = Request::from(body);

    ensure_table(store, &request.table_name, provision).await?;

    let item = to_item(&request, layout);
    let attributes = item.len();
    let timer = OperationTimer::start("put_item");
    store
        .put_item(&request.table_name, item)
        .await
        .map_err(DispatchError::Put)?;

    info!(
        table = %request.table_name,
        id = %request.id,
        attributes,
        "item stored"
    );
    timer.finish(&request.table_name, 1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_operations::test_support::{body, fast_provision};
    use crate::conversions::key_for;
    use crate::errors::{StoreError, StoreErrorKind};
    use crate::store::{MemoryStore, StoreOp};

    #[tokio::test]
    async fn provisions_table_on_first_write() {
        let store = MemoryStore::new().with_activation_polls(2);

        put_item(&store, &fast_provision(), body("users", "1"), ItemLayout::Basic)
            .await
            .unwrap();

        assert!(store.has_table("users"));
        assert_eq!(store.item_count("users"), 1);
        let stored = store.get_item("users", key_for("1")).await.unwrap().unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn basic_layout_skips_data_slots() {
        let store = MemoryStore::new();
        let mut request = body("users", "1");
        request.name = "Ana".into();
        request.data_1 = "x".into();

        put_item(&store, &fast_provision(), request, ItemLayout::Basic)
            .await
            .unwrap();

        let stored = store.get_item("users", key_for("1")).await.unwrap().unwrap();
        assert!(stored.contains_key("Name"));
        assert!(!stored.contains_key("Data_1"));
    }

    #[tokio::test]
    async fn validation_happens_before_provisioning() {
        let store = MemoryStore::new();

        let err = put_item(&store, &fast_provision(), body("", ""), ItemLayout::WithData)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Validation { ref missing } if missing == &["TableName", "id"]));
        assert_eq!(store.describe_calls(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_a_put_error() {
        let store = MemoryStore::new();
        store.insert_table("users");
        store.fail(
            StoreOp::PutItem,
            StoreError::new(StoreErrorKind::Throttled, "slow down"),
        );

        let err = put_item(&store, &fast_provision(), body("users", "1"), ItemLayout::Basic)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Put(_)));
        assert_eq!(err.status(), 500);
    }
}
