//! Inbound request model, body parsing and required-field validation.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::DispatchError;

/// Raw JSON body as sent by callers.
///
/// Unknown fields are ignored; missing and `null` fields default to empty
/// strings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RequestBody {
    #[serde(rename = "TableName")]
    pub table_name: String,
    pub id: String,
    pub name: String,
    pub date: String,
    pub pass: String,
    #[serde(rename = "state_p")]
    pub selector: String,
    pub data_1: String,
    pub data_2: String,
    pub data_3: String,
    pub data_4: String,
}

/// Wire names of the known fields.
const FIELD_NAMES: [&str; 10] = [
    "TableName", "id", "name", "date", "pass", "state_p", "data_1", "data_2", "data_3", "data_4",
];

/// Rename keys to their wire names, matching case-insensitively when there is
/// no exact match, and drop `null` values.
fn canonical_fields(object: Map<String, Value>) -> Map<String, Value> {
    let mut fields = Map::new();
    for (key, value) in object {
        if value.is_null() {
            continue;
        }
        let name = FIELD_NAMES
            .iter()
            .find(|name| **name == key)
            .or_else(|| FIELD_NAMES.iter().find(|name| name.eq_ignore_ascii_case(&key)));
        if let Some(name) = name {
            fields.insert(name.to_string(), value);
        }
    }
    fields
}

/// Decode a request body.
///
/// Fails when the body is not JSON, is not a JSON object, or carries a
/// non-string, non-null value for a known field.
pub fn parse_body(body: &[u8]) -> Result<RequestBody, DispatchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| DispatchError::Parse(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(DispatchError::Parse("expected a JSON object".to_string()));
    };
    serde_json::from_value(Value::Object(canonical_fields(object)))
        .map_err(|e| DispatchError::Parse(e.to_string()))
}

/// Best-effort `state_p` of a body that may not parse.
pub fn raw_selector(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("state_p"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Field that an operation may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    TableName,
    Id,
}

impl RequiredField {
    /// Name as it appears in the JSON body.
    pub fn name(&self) -> &'static str {
        match self {
            RequiredField::TableName => "TableName",
            RequiredField::Id => "id",
        }
    }

    fn value<'a>(&self, body: &'a RequestBody) -> &'a str {
        match self {
            RequiredField::TableName => &body.table_name,
            RequiredField::Id => &body.id,
        }
    }
}

/// Fields required by the writing operations and delete.
pub const KEYED_FIELDS: &[RequiredField] = &[RequiredField::TableName, RequiredField::Id];

/// Names of the required fields that are absent or whitespace-only, in the
/// order they were asked for.
pub fn missing_fields(body: &RequestBody, required: &[RequiredField]) -> Vec<&'static str> {
    required
        .iter()
        .filter(|field| is_blank(field.value(body)))
        .map(RequiredField::name)
        .collect()
}

pub fn validate(body: &RequestBody, required: &[RequiredField]) -> Result<(), DispatchError> {
    let missing = missing_fields(body, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DispatchError::Validation { missing })
    }
}

/// Whether the item carries the profile attributes (`Name`, `Date`, `Pass`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemProfile {
    Simple,
    Extended {
        name: String,
        date: String,
        pass: String,
    },
}

/// Typed view of a request once the body has been decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub table_name: String,
    pub id: String,
    pub profile: ItemProfile,
    /// `data_1..data_4`; blank slots are `None`.
    pub data: [Option<String>; 4],
}

impl From<RequestBody> for Request {
    fn from(body: RequestBody) -> Self {
        let profile = if is_blank(&body.name) {
            ItemProfile::Simple
        } else {
            ItemProfile::Extended {
                name: body.name,
                date: body.date,
                pass: body.pass,
            }
        };
        let slot = |value: String| (!is_blank(&value)).then_some(value);

        Request {
            table_name: body.table_name,
            id: body.id,
            profile,
            data: [
                slot(body.data_1),
                slot(body.data_2),
                slot(body.data_3),
                slot(body.data_4),
            ],
        }
    }
}
