//! Conversions between requests, stored items and DynamoDB AttributeValue.
//!
//! Only string attributes are modeled. Items are written with `S` values
//! and anything else read back from the store is dropped.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::{BTreeMap, HashMap};

use crate::request::{ItemProfile, Request};

/// An item as the store sees it.
pub type Item = HashMap<String, AttributeValue>;

/// Name of the single hash key attribute of every table.
pub const KEY_ATTRIBUTE: &str = "ID";

const DATA_ATTRIBUTES: [&str; 4] = ["Data_1", "Data_2", "Data_3", "Data_4"];

/// Which optional attributes an insert writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLayout {
    /// Key plus the profile attributes.
    Basic,
    /// Key, profile attributes and every non-empty `Data_N` slot.
    WithData,
}

/// Key map addressing one item.
pub fn key_for(id: &str) -> Item {
    HashMap::from([(KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))])
}

/// Build the item to store for a request.
pub fn to_item(request: &Request, layout: ItemLayout) -> Item {
    let mut item = key_for(&request.id);

    if let ItemProfile::Extended { name, date, pass } = &request.profile {
        item.insert("Name".to_string(), AttributeValue::S(name.clone()));
        item.insert("Date".to_string(), AttributeValue::S(date.clone()));
        item.insert("Pass".to_string(), AttributeValue::S(pass.clone()));
    }

    if layout == ItemLayout::WithData {
        for (attribute, value) in DATA_ATTRIBUTES.iter().zip(&request.data) {
            if let Some(value) = value {
                item.insert(attribute.to_string(), AttributeValue::S(value.clone()));
            }
        }
    }

    item
}

/// Extract the string attributes of a stored record.
pub fn from_store_record(record: Item) -> BTreeMap<String, String> {
    record
        .into_iter()
        .filter_map(|(key, value)| match value {
            AttributeValue::S(s) => Some((key, s)),
            _ => None,
        })
        .collect()
}
