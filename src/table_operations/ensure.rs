//! Idempotent table provisioning.

use aws_sdk_dynamodb::types::TableStatus;
use std::time::Duration;
use tracing::{debug, info};

use super::create::{DEFAULT_TABLE, create_table};
use super::exists::table_exists;
use super::wait::{WaitDeadline, WaitOutcome, is_unusable, unusable_table, wait_for_table_active};
use crate::errors::DispatchError;
use crate::store::TableStore;

/// How long provisioning may block waiting for a new table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Make sure `table` exists and is active, creating it when absent.
///
/// An existing ACTIVE table is a no-op. A table that is being created or
/// updated is waited on; one that is being deleted is waited out and then
/// created again. Archived or otherwise unusable tables fail at once. The
/// whole call is bounded by `settings.timeout`.
pub async fn ensure_table(
    store: &dyn TableStore,
    table: &str,
    settings: &ProvisionSettings,
) -> Result<(), DispatchError> {
    let provision_failed = |source| DispatchError::Provision {
        table: table.to_string(),
        source,
    };
    let deadline = WaitDeadline::after(settings.timeout);

    loop {
        let just_created = match table_exists(store, table).await.map_err(provision_failed)? {
            Some(TableStatus::Active) => {
                debug!(table, "table already exists");
                return Ok(());
            }
            Some(status) if is_unusable(&status) => return Err(unusable_table(table, &status)),
            Some(status) => {
                info!(table, status = status.as_str(), "waiting on existing table");
                false
            }
            None => {
                info!(table, "table not found, creating");
                create_table(store, table, &DEFAULT_TABLE)
                    .await
                    .map_err(provision_failed)?;
                true
            }
        };

        match wait_for_table_active(
            store,
            table,
            &deadline,
            settings.poll_interval,
            just_created,
        )
        .await?
        {
            WaitOutcome::Active => {
                info!(table, "table is active");
                return Ok(());
            }
            WaitOutcome::Gone => info!(table, "table was deleted while waiting, recreating"),
        }
    }
}
