//! Error types for table-dispatch.
//!
//! Two layers live here:
//! - `StoreError` classifies failures coming back from the table store.
//! - `DispatchError` is what operation handlers return; the dispatcher turns
//!   it into a status code and a JSON error body.
//!
//! SDK errors are classified with typed `SdkError` variant matching and
//! `ProvideErrorMetadata` codes, no string parsing of debug output.

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a table-store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    ResourceNotFound,
    ResourceInUse,
    Validation,
    Credentials,
    AccessDenied,
    Throttled,
    Connection,
    Other,
}

/// A failed call into the table store.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::ResourceNotFound
    }

    pub fn is_in_use(&self) -> bool {
        self.kind == StoreErrorKind::ResourceInUse
    }
}

// ========== TYPED ERROR MAPPING ==========

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `None` for `ServiceError`.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>) -> Option<StoreError>
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            let msg = if dispatch.is_timeout() {
                "Connection timed out to DynamoDB. Check your network or endpoint."
            } else if dispatch.is_io() {
                "Connection failed to DynamoDB (I/O error). Check if the endpoint is reachable."
            } else {
                "Connection failed to DynamoDB. Check if the endpoint is reachable."
            };
            Some(StoreError::new(StoreErrorKind::Connection, msg))
        }
        SdkError::TimeoutError(_) => Some(StoreError::new(
            StoreErrorKind::Connection,
            "Connection timed out to DynamoDB. Check your network or endpoint.",
        )),
        SdkError::ConstructionFailure(err) => {
            let msg = format!("{:?}", err);
            if msg.contains("credentials") || msg.contains("Credentials") {
                Some(StoreError::new(
                    StoreErrorKind::Credentials,
                    "No AWS credentials found. Configure credentials via environment variables, \
                    an AWS profile, or an IAM role.",
                ))
            } else {
                Some(StoreError::new(
                    StoreErrorKind::Other,
                    format!("Failed to build request: {}", msg),
                ))
            }
        }
        SdkError::ResponseError(err) => Some(StoreError::new(
            StoreErrorKind::Other,
            format!("Invalid response from DynamoDB: {:?}", err),
        )),
        SdkError::ServiceError(_) => None,
        _ => Some(StoreError::new(
            StoreErrorKind::Other,
            format!("Unknown error from DynamoDB: {:?}", err),
        )),
    }
}

/// Map a DynamoDB service error code + message to a `StoreError`.
fn map_dynamodb_code(
    code: Option<&str>,
    message: Option<&str>,
    display: &str,
    table: Option<&str>,
) -> StoreError {
    let text = message.unwrap_or(display);
    match code {
        Some("ResourceNotFoundException") => {
            let msg = match table {
                Some(t) => format!("Table '{}' not found", t),
                None => "Resource not found".to_string(),
            };
            StoreError::new(StoreErrorKind::ResourceNotFound, msg)
        }
        Some("ResourceInUseException") => {
            let msg = match table {
                Some(t) => format!("Table '{}' already exists", t),
                None => "Resource already in use".to_string(),
            };
            StoreError::new(StoreErrorKind::ResourceInUse, msg)
        }
        Some("ValidationException") => StoreError::new(StoreErrorKind::Validation, text),
        Some("UnrecognizedClientException") => StoreError::new(
            StoreErrorKind::Credentials,
            "Invalid AWS credentials. Check your access key and secret.",
        ),
        Some("ExpiredTokenException") => StoreError::new(
            StoreErrorKind::Credentials,
            "AWS credentials have expired. Refresh your session token.",
        ),
        Some("AccessDeniedException") => StoreError::new(
            StoreErrorKind::AccessDenied,
            format!("Access denied to DynamoDB: {}", text),
        ),
        Some("ProvisionedThroughputExceededException")
        | Some("LimitExceededException")
        | Some("RequestLimitExceeded")
        | Some("ThrottlingException") => StoreError::new(
            StoreErrorKind::Throttled,
            "DynamoDB request rate too high. Try again later.",
        ),
        _ => StoreError::new(StoreErrorKind::Other, text),
    }
}

/// Map DynamoDB errors using typed `SdkError` variants.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, table: Option<&str>) -> StoreError
where
    E: ProvideErrorMetadata + std::fmt::Debug + std::fmt::Display,
    R: std::fmt::Debug,
{
    if let Some(store_err) = map_outer_sdk_error(&err) {
        return store_err;
    }

    if let Some(service_err) = err.as_service_error() {
        let meta = ProvideErrorMetadata::meta(service_err);
        let display = service_err.to_string();
        return map_dynamodb_code(meta.code(), meta.message(), &display, table);
    }

    StoreError::new(
        StoreErrorKind::Other,
        format!("Unexpected DynamoDB error: {:?}", err),
    )
}

// ========== DISPATCH ERRORS ==========

/// Machine-readable error category, independent of the display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Validation,
    Provision,
    ProvisionTimeout,
    Put,
    Get,
    Delete,
    Scan,
    NotFound,
    UnknownOperation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse_error",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Provision => "provision_error",
            ErrorKind::ProvisionTimeout => "provision_timeout",
            ErrorKind::Put => "put_error",
            ErrorKind::Get => "get_error",
            ErrorKind::Delete => "delete_error",
            ErrorKind::Scan => "scan_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnknownOperation => "unknown_operation",
        }
    }

    /// HTTP status the dispatcher answers with.
    ///
    /// A failed get answers 404 like a missing item does.
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::Parse | ErrorKind::Validation | ErrorKind::UnknownOperation => 400,
            ErrorKind::NotFound | ErrorKind::Get => 404,
            ErrorKind::Provision
            | ErrorKind::ProvisionTimeout
            | ErrorKind::Put
            | ErrorKind::Delete
            | ErrorKind::Scan => 500,
        }
    }
}

/// Failure of a dispatched operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid request body: {0}")]
    Parse(String),

    #[error("missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("failed to prepare table '{table}': {source}")]
    Provision {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("table '{table}' did not become active within {}s", .waited.as_secs())]
    ProvisionTimeout { table: String, waited: Duration },

    #[error("failed to insert data: {0}")]
    Put(#[source] StoreError),

    #[error("failed to get data: {0}")]
    Get(#[source] StoreError),

    #[error("failed to delete data: {0}")]
    Delete(#[source] StoreError),

    #[error("failed to scan table: {0}")]
    Scan(#[source] StoreError),

    #[error("no data found for id: {id}")]
    NotFound { id: String },

    #[error("unknown state: {0:?}")]
    UnknownOperation(String),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Parse(_) => ErrorKind::Parse,
            DispatchError::Validation { .. } => ErrorKind::Validation,
            DispatchError::Provision { .. } => ErrorKind::Provision,
            DispatchError::ProvisionTimeout { .. } => ErrorKind::ProvisionTimeout,
            DispatchError::Put(_) => ErrorKind::Put,
            DispatchError::Get(_) => ErrorKind::Get,
            DispatchError::Delete(_) => ErrorKind::Delete,
            DispatchError::Scan(_) => ErrorKind::Scan,
            DispatchError::NotFound { .. } => ErrorKind::NotFound,
            DispatchError::UnknownOperation(_) => ErrorKind::UnknownOperation,
        }
    }

    pub fn status(&self) -> u16 {
        self.kind().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::operation::get_item::GetItemError;

    fn service_error(code: &str) -> SdkError<GetItemError, ()> {
        let meta = ErrorMetadata::builder()
            .code(code)
            .message("from service")
            .build();
        SdkError::service_error(GetItemError::generic(meta), ())
    }

    #[test]
    fn validation_message_lists_fields_in_order() {
        let err = DispatchError::Validation {
            missing: vec!["TableName", "id"],
        };
        assert_eq!(err.to_string(), "missing required fields: TableName, id");
        assert_eq!(err.status(), 400);
        assert_eq!(err.kind().as_str(), "validation_error");
    }

    #[test]
    fn store_failures_are_server_errors() {
        let cause = StoreError::new(StoreErrorKind::Throttled, "slow down");
        assert_eq!(DispatchError::Put(cause.clone()).status(), 500);
        assert_eq!(DispatchError::Delete(cause.clone()).status(), 500);
        assert_eq!(DispatchError::Scan(cause.clone()).status(), 500);
        assert_eq!(
            DispatchError::Provision {
                table: "t".into(),
                source: cause,
            }
            .status(),
            500
        );
        assert_eq!(
            DispatchError::ProvisionTimeout {
                table: "t".into(),
                waited: Duration::from_secs(300),
            }
            .to_string(),
            "table 't' did not become active within 300s"
        );
    }

    #[test]
    fn lookups_answer_not_found() {
        let missing = DispatchError::NotFound { id: "42".into() };
        assert_eq!(missing.status(), 404);
        assert_eq!(missing.to_string(), "no data found for id: 42");

        let failed = DispatchError::Get(StoreError::new(StoreErrorKind::Connection, "down"));
        assert_eq!(failed.status(), 404);
        assert_eq!(failed.kind(), ErrorKind::Get);
    }

    #[test]
    fn unknown_selector_names_the_state() {
        let err = DispatchError::UnknownOperation("9".into());
        assert_eq!(err.to_string(), "unknown state: \"9\"");
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn dynamodb_codes_are_classified() {
        let err = map_dynamodb_code(Some("ResourceNotFoundException"), None, "x", Some("users"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Table 'users' not found");

        let err = map_dynamodb_code(Some("ResourceInUseException"), None, "x", Some("users"));
        assert!(err.is_in_use());

        let err = map_dynamodb_code(Some("ThrottlingException"), None, "x", None);
        assert_eq!(err.kind(), StoreErrorKind::Throttled);

        let err = map_dynamodb_code(None, Some("boom"), "display", None);
        assert_eq!(err.kind(), StoreErrorKind::Other);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn service_errors_use_their_code() {
        let err = map_sdk_error(service_error("ResourceNotFoundException"), Some("users"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Table 'users' not found");

        let err = map_sdk_error(service_error("ValidationException"), Some("users"));
        assert_eq!(err.kind(), StoreErrorKind::Validation);
        assert_eq!(err.to_string(), "from service");

        let err = map_sdk_error(service_error("AccessDeniedException"), None);
        assert_eq!(err.kind(), StoreErrorKind::AccessDenied);
    }

    #[test]
    fn transport_errors_are_classified() {
        let err: SdkError<GetItemError, ()> = SdkError::timeout_error("timed out");
        assert_eq!(map_sdk_error(err, None).kind(), StoreErrorKind::Connection);

        let err: SdkError<GetItemError, ()> =
            SdkError::construction_failure("no credentials in the chain");
        assert_eq!(map_sdk_error(err, None).kind(), StoreErrorKind::Credentials);
    }
}
