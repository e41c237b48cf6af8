//! Request dispatcher.
//!
//! Routes a request body to one of the five operations by its `state_p`
//! selector and turns every outcome, success or failure, into a status code
//! and a JSON body. Nothing past this point returns an error to the caller.

use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::basic_operations::{delete_item, get_item, put_item, scan_all};
use crate::conversions::ItemLayout;
use crate::errors::DispatchError;
use crate::request::{RequestBody, parse_body, raw_selector};
use crate::store::TableStore;
use crate::table_operations::ProvisionSettings;

/// Operation chosen by the `state_p` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    GetById,
    Delete,
    ScanAll,
    InsertBig,
}

impl Operation {
    pub fn from_selector(selector: &str) -> Result<Self, DispatchError> {
        match selector {
            "1" => Ok(Operation::Insert),
            "2" => Ok(Operation::GetById),
            "3" => Ok(Operation::Delete),
            "4" => Ok(Operation::ScanAll),
            "5" => Ok(Operation::InsertBig),
            other => Err(DispatchError::UnknownOperation(other.to_string())),
        }
    }
}

/// Status code and JSON body handed back to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    pub status: u16,
    pub body: Value,
}

impl DispatchResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn message(text: &str) -> Self {
        Self::ok(json!({ "message": text }))
    }

    fn from_error(err: &DispatchError) -> Self {
        let kind = err.kind();
        Self {
            status: kind.status(),
            body: json!({ "error": err.to_string(), "kind": kind.as_str() }),
        }
    }
}

pub const INSERTED_MESSAGE: &str = "data inserted successfully";
pub const DELETED_MESSAGE: &str = "data deleted successfully";
pub const INSERTED_BIG_MESSAGE: &str = "table created and extended data inserted successfully";
pub const EMPTY_TABLE_MESSAGE: &str = "no data in table";

/// Entry point shared by every invocation.
///
/// Holds the store client built once at startup; cloning shares it.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn TableStore>,
    provision: ProvisionSettings,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn TableStore>, provision: ProvisionSettings) -> Self {
        Self { store, provision }
    }

    /// Handle one request.
    ///
    /// `OPTIONS` pre-flight requests answer `200 {}` without looking at the
    /// body or touching the store.
    pub async fn handle(&self, method: &str, body: &[u8]) -> DispatchResponse {
        if method.eq_ignore_ascii_case("OPTIONS") {
            return DispatchResponse::ok(json!({}));
        }

        debug!(body = %String::from_utf8_lossy(body), "received request");
        let request = match parse_body(body) {
            Ok(request) => request,
            Err(e) => {
                warn!(
                    selector = %raw_selector(body),
                    kind = e.kind().as_str(),
                    error = %e,
                    "rejecting request body"
                );
                return DispatchResponse::from_error(&e);
            }
        };

        let selector = request.selector.clone();
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => {
                if e.status() >= 500 {
                    error!(selector = %selector, kind = e.kind().as_str(), error = %e, "operation failed");
                } else {
                    warn!(selector = %selector, kind = e.kind().as_str(), error = %e, "operation rejected");
                }
                DispatchResponse::from_error(&e)
            }
        }
    }

    async fn dispatch(&self, request: RequestBody) -> Result<DispatchResponse, DispatchError> {
        let store = self.store.as_ref();

        match Operation::from_selector(&request.selector)? {
            Operation::Insert => {
                put_item(store, &self.provision, request, ItemLayout::Basic).await?;
                Ok(DispatchResponse::message(INSERTED_MESSAGE))
            }
            Operation::GetById => {
                let item = get_item(store, &request.table_name, &request.id).await?;
                Ok(DispatchResponse::ok(json!(item)))
            }
            Operation::Delete => {
                delete_item(store, &request).await?;
                Ok(DispatchResponse::message(DELETED_MESSAGE))
            }
            Operation::ScanAll => {
                let items = scan_all(store, &request).await?;
                if items.is_empty() {
                    Ok(DispatchResponse::message(EMPTY_TABLE_MESSAGE))
                } else {
                    Ok(DispatchResponse::ok(json!(items)))
                }
            }
            Operation::InsertBig => {
                put_item(store, &self.provision, request, ItemLayout::WithData).await?;
                Ok(DispatchResponse::message(INSERTED_BIG_MESSAGE))
            }
        }
    }
}
