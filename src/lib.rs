//! table-dispatch - serverless CRUD endpoint over DynamoDB tables.
//!
//! A single HTTP entry point reads a JSON body, picks one of five operations
//! from its `state_p` selector and runs it against a DynamoDB table,
//! provisioning the table on first write.

pub mod basic_operations;
pub mod client;
pub mod config;
pub mod conversions;
pub mod dispatcher;
pub mod errors;
pub mod http;
pub mod metrics;
pub mod request;
pub mod store;
pub mod table_operations;

pub use client::build_client;
pub use config::DispatchConfig;
pub use dispatcher::{DispatchResponse, Dispatcher, Operation};
pub use errors::{DispatchError, ErrorKind, StoreError, StoreErrorKind};
pub use store::{DynamoStore, MemoryStore, StoreOp, TableStore};
pub use table_operations::ProvisionSettings;
