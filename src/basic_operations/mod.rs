//! Item operations behind the dispatcher.
//!
//! - `put` - Insert and Insert-Big, provisioning the table first
//! - `get` - Get an item by id
//! - `delete` - Delete an item by id
//! - `scan` - Read every item of a table

mod delete;
mod get;
mod put;
mod scan;

pub use delete::delete_item;
pub use get::get_item;
pub use put::put_item;
pub use scan::scan_all;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::request::RequestBody;
    use crate::table_operations::ProvisionSettings;
    use std::time::Duration;

    pub fn fast_provision() -> ProvisionSettings {
        ProvisionSettings {
            timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(1),
        }
    }

    pub fn body(table: &str, id: &str) -> RequestBody {
        RequestBody {
            table_name: table.to_string(),
            id: id.to_string(),
            ..Default::default()
        }
    }
}
