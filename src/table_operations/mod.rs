//! Table management operations for DynamoDB.
//!
//! This module provides table lifecycle operations:
//! - `exists` - Check if a table exists
//! - `create` - Create a table with the fixed single-key schema
//! - `wait` - Wait for a table to become active
//! - `ensure` - Make a table usable, creating it on first use

mod create;
mod ensure;
mod exists;
mod wait;

pub use create::{DEFAULT_TABLE, TableSpec, create_table};
pub use ensure::{ProvisionSettings, ensure_table};
pub use exists::table_exists;
pub use wait::{WaitDeadline, WaitOutcome, is_unusable, wait_for_table_active};
