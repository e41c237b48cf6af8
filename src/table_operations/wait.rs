//! Wait for table to become active.

use aws_sdk_dynamodb::types::TableStatus;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::errors::{DispatchError, StoreError, StoreErrorKind};
use crate::store::TableStore;

/// Point in time a provisioning wait gives up at.
#[derive(Debug, Clone, Copy)]
pub struct WaitDeadline {
    /// `None` when `now + timeout` is not representable; never expires.
    at: Option<Instant>,
    timeout: Duration,
}

impl WaitDeadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
            timeout,
        }
    }

    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    fn timed_out(&self, table: &str) -> DispatchError {
        DispatchError::ProvisionTimeout {
            table: table.to_string(),
            waited: self.timeout,
        }
    }
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Active,
    /// The table vanished while being waited on (it was being deleted).
    Gone,
}

/// Statuses a table never leaves on its own.
pub fn is_unusable(status: &TableStatus) -> bool {
    matches!(
        status,
        TableStatus::Archived
            | TableStatus::Archiving
            | TableStatus::InaccessibleEncryptionCredentials
    )
}

pub(crate) fn unusable_table(table: &str, status: &TableStatus) -> DispatchError {
    DispatchError::Provision {
        table: table.to_string(),
        source: StoreError::new(
            StoreErrorKind::Other,
            format!("Table '{}' is {} and cannot be written", table, status.as_str()),
        ),
    }
}

/// Poll a table until it reports ACTIVE.
///
/// With `just_created`, not-found answers are polled through since a fresh
/// table may not be visible yet; otherwise not-found ends the wait with
/// `WaitOutcome::Gone`. Unusable statuses fail at once and the deadline
/// fails with `ProvisionTimeout`.
pub async fn wait_for_table_active(
    store: &dyn TableStore,
    table: &str,
    deadline: &WaitDeadline,
    poll_interval: Duration,
    just_created: bool,
) -> Result<WaitOutcome, DispatchError> {
    loop {
        match store.describe_table(table).await {
            Ok(TableStatus::Active) => return Ok(WaitOutcome::Active),
            Ok(status) if is_unusable(&status) => return Err(unusable_table(table, &status)),
            Ok(status) => debug!(table, status = status.as_str(), "table not active yet"),
            Err(e) if e.is_not_found() && just_created => debug!(table, "table not visible yet"),
            Err(e) if e.is_not_found() => return Ok(WaitOutcome::Gone),
            Err(e) => {
                return Err(DispatchError::Provision {
                    table: table.to_string(),
                    source: e,
                });
            }
        }

        if deadline.expired() {
            return Err(deadline.timed_out(table));
        }
        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn unrepresentable_deadline_never_expires() {
        let deadline = WaitDeadline::after(Duration::MAX);
        assert!(!deadline.expired());
        assert!(WaitDeadline::after(Duration::ZERO).expired());
    }

    #[tokio::test]
    async fn deleted_table_ends_the_wait() {
        let store = MemoryStore::new();
        store.insert_table_with_status("t", TableStatus::Deleting, 1);

        let outcome = wait_for_table_active(
            &store,
            "t",
            &WaitDeadline::after(Duration::from_secs(1)),
            Duration::from_millis(1),
            false,
        )
        .await
        .unwrap();
        assert_eq!(outcome, WaitOutcome::Gone);
    }

    #[tokio::test]
    async fn archived_table_fails_fast() {
        let store = MemoryStore::new();
        store.insert_table_with_status("t", TableStatus::Archived, 0);

        let err = wait_for_table_active(
            &store,
            "t",
            &WaitDeadline::after(Duration::from_secs(60)),
            Duration::from_millis(1),
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DispatchError::Provision { .. }));
        assert_eq!(store.describe_calls(), 1);
    }
}
