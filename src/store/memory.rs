//! In-memory `TableStore` for tests and local runs.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, TableStatus};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{ScanPage, TableStore};
use crate::conversions::{Item, KEY_ATTRIBUTE};
use crate::errors::{StoreError, StoreErrorKind};
use crate::table_operations::TableSpec;

/// Store call that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    DescribeTable,
    CreateTable,
    PutItem,
    GetItem,
    DeleteItem,
    Scan,
}

#[derive(Debug)]
struct MemoryTable {
    status: TableStatus,
    /// Describe calls left before the status settles: CREATING turns ACTIVE,
    /// DELETING removes the table.
    pending_polls: usize,
    items: BTreeMap<String, Item>,
}

impl MemoryTable {
    fn with_status(status: TableStatus, pending_polls: usize) -> Self {
        Self {
            status,
            pending_polls,
            items: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, MemoryTable>,
    failing: HashMap<StoreOp, StoreError>,
    create_calls: usize,
    describe_calls: usize,
    scan_calls: usize,
}

/// Thread-safe in-memory store.
///
/// New tables report CREATING for `activation_polls` describe calls before
/// turning ACTIVE. Scans return at most `page_size` items per page.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<State>,
    activation_polls: usize,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            activation_polls: 0,
            page_size: 100,
        }
    }

    pub fn with_activation_polls(mut self, polls: usize) -> Self {
        self.activation_polls = polls;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every call of `op` fail with `error` until cleared.
    pub fn fail(&self, op: StoreOp, error: StoreError) {
        self.lock().failing.insert(op, error);
    }

    pub fn clear_failures(&self) {
        self.lock().failing.clear();
    }

    /// Add an already-active table, bypassing create.
    pub fn insert_table(&self, table: &str) {
        self.lock()
            .tables
            .entry(table.to_string())
            .or_insert_with(|| MemoryTable::with_status(TableStatus::Active, 0));
    }

    /// Add or replace a table in an arbitrary status.
    ///
    /// The status is reported for `polls` describe calls; CREATING then turns
    /// ACTIVE and DELETING makes the table disappear. Other statuses stick.
    pub fn insert_table_with_status(&self, table: &str, status: TableStatus, polls: usize) {
        self.lock()
            .tables
            .insert(table.to_string(), MemoryTable::with_status(status, polls));
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.lock().tables.contains_key(table)
    }

    pub fn item_count(&self, table: &str) -> usize {
        self.lock()
            .tables
            .get(table)
            .map_or(0, |t| t.items.len())
    }

    pub fn create_calls(&self) -> usize {
        self.lock().create_calls
    }

    pub fn describe_calls(&self) -> usize {
        self.lock().describe_calls
    }

    pub fn scan_calls(&self) -> usize {
        self.lock().scan_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn check_failure(state: &State, op: StoreOp) -> Result<(), StoreError> {
    match state.failing.get(&op) {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

fn table_not_found(table: &str) -> StoreError {
    StoreError::new(
        StoreErrorKind::ResourceNotFound,
        format!("Table '{}' not found", table),
    )
}

fn key_of(item: &Item) -> Result<String, StoreError> {
    match item.get(KEY_ATTRIBUTE) {
        Some(AttributeValue::S(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(StoreError::new(
            StoreErrorKind::Validation,
            format!("Missing or empty string key attribute '{}'", KEY_ATTRIBUTE),
        )),
    }
}

fn active_table<'a>(state: &'a mut State, table: &str) -> Result<&'a mut MemoryTable, StoreError> {
    match state.tables.get_mut(table) {
        Some(t) if t.status == TableStatus::Active => Ok(t),
        Some(_) => Err(StoreError::new(
            StoreErrorKind::ResourceNotFound,
            format!("Table '{}' is not active yet", table),
        )),
        None => Err(table_not_found(table)),
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn describe_table(&self, table: &str) -> Result<TableStatus, StoreError> {
        let mut state = self.lock();
        state.describe_calls += 1;
        check_failure(&state, StoreOp::DescribeTable)?;

        let entry = state
            .tables
            .get_mut(table)
            .ok_or_else(|| table_not_found(table))?;
        if entry.pending_polls > 0 {
            entry.pending_polls -= 1;
            return Ok(entry.status.clone());
        }
        if entry.status == TableStatus::Deleting {
            state.tables.remove(table);
            return Err(table_not_found(table));
        }
        if entry.status == TableStatus::Creating {
            entry.status = TableStatus::Active;
        }
        Ok(entry.status.clone())
    }

    async fn create_table(&self, table: &str, spec: &TableSpec) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.create_calls += 1;
        check_failure(&state, StoreOp::CreateTable)?;

        if spec.hash_key != KEY_ATTRIBUTE {
            return Err(StoreError::new(
                StoreErrorKind::Validation,
                format!("Unsupported hash key '{}'", spec.hash_key),
            ));
        }
        if state.tables.contains_key(table) {
            return Err(StoreError::new(
                StoreErrorKind::ResourceInUse,
                format!("Table '{}' already exists", table),
            ));
        }

        let status = if self.activation_polls == 0 {
            TableStatus::Active
        } else {
            TableStatus::Creating
        };
        state.tables.insert(
            table.to_string(),
            MemoryTable::with_status(status, self.activation_polls),
        );
        Ok(())
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        let mut state = self.lock();
        check_failure(&state, StoreOp::PutItem)?;
        let id = key_of(&item)?;
        active_table(&mut state, table)?.items.insert(id, item);
        Ok(())
    }

    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>, StoreError> {
        let mut state = self.lock();
        check_failure(&state, StoreOp::GetItem)?;
        let id = key_of(&key)?;
        Ok(active_table(&mut state, table)?.items.get(&id).cloned())
    }

    async fn delete_item(&self, table: &str, key: Item) -> Result<(), StoreError> {
        let mut state = self.lock();
        check_failure(&state, StoreOp::DeleteItem)?;
        let id = key_of(&key)?;
        active_table(&mut state, table)?.items.remove(&id);
        Ok(())
    }

    async fn scan_page(
        &self,
        table: &str,
        exclusive_start_key: Option<Item>,
    ) -> Result<ScanPage, StoreError> {
        let mut state = self.lock();
        state.scan_calls += 1;
        check_failure(&state, StoreOp::Scan)?;

        let start = exclusive_start_key.as_ref().map(key_of).transpose()?;
        let entry = active_table(&mut state, table)?;

        let mut remaining = entry
            .items
            .iter()
            .filter(|(id, _)| start.as_ref().is_none_or(|s| id.as_str() > s.as_str()));
        let items: Vec<Item> = remaining
            .by_ref()
            .take(self.page_size)
            .map(|(_, item)| item.clone())
            .collect();
        let has_more = remaining.next().is_some();

        let last_evaluated_key = match items.last() {
            Some(last) if has_more => {
                let id = key_of(last)?;
                Some(HashMap::from([(
                    KEY_ATTRIBUTE.to_string(),
                    AttributeValue::S(id),
                )]))
            }
            _ => None,
        };

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::key_for;
    use crate::table_operations::DEFAULT_TABLE;

    #[tokio::test]
    async fn new_tables_activate_after_polls() {
        let store = MemoryStore::new().with_activation_polls(2);
        store.create_table("t", &DEFAULT_TABLE).await.unwrap();

        assert_eq!(store.describe_table("t").await.unwrap(), TableStatus::Creating);
        assert_eq!(store.describe_table("t").await.unwrap(), TableStatus::Creating);
        assert_eq!(store.describe_table("t").await.unwrap(), TableStatus::Active);
    }

    #[tokio::test]
    async fn deleting_tables_disappear_after_polls() {
        let store = MemoryStore::new();
        store.insert_table_with_status("t", TableStatus::Deleting, 1);

        assert_eq!(store.describe_table("t").await.unwrap(), TableStatus::Deleting);
        assert!(store.describe_table("t").await.unwrap_err().is_not_found());
        assert!(!store.has_table("t"));
    }

    #[tokio::test]
    async fn duplicate_create_is_in_use() {
        let store = MemoryStore::new();
        store.create_table("t", &DEFAULT_TABLE).await.unwrap();
        let err = store.create_table("t", &DEFAULT_TABLE).await.unwrap_err();
        assert!(err.is_in_use());
        assert_eq!(store.create_calls(), 2);
    }

    #[tokio::test]
    async fn scan_pages_until_exhausted() {
        let store = MemoryStore::new().with_page_size(2);
        store.insert_table("t");
        for id in ["a", "b", "c"] {
            store.put_item("t", key_for(id)).await.unwrap();
        }

        let first = store.scan_page("t", None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let token = first.last_evaluated_key.expect("more pages");

        let second = store.scan_page("t", Some(token)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn missing_table_is_not_found() {
        let store = MemoryStore::new();
        assert!(store.describe_table("nope").await.unwrap_err().is_not_found());
        assert!(store.get_item("nope", key_for("1")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn injected_failures_apply_until_cleared() {
        let store = MemoryStore::new();
        store.insert_table("t");
        store.fail(
            StoreOp::PutItem,
            StoreError::new(StoreErrorKind::Throttled, "slow down"),
        );
        let err = store.put_item("t", key_for("1")).await.unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Throttled);

        store.clear_failures();
        store.put_item("t", key_for("1")).await.unwrap();
        assert_eq!(store.item_count("t"), 1);
    }
}
