//! Environment configuration.
//!
//! Only ambient AWS settings plus the provisioning wait are read. Everything
//! is loaded once per process.

use std::time::Duration;
use tracing::warn;

use crate::table_operations::ProvisionSettings;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Longest table wait accepted; a Lambda invocation cannot outlive it.
pub const MAX_WAIT_TIMEOUT_SECS: u64 = 900;
pub const MAX_WAIT_POLL_MILLIS: u64 = 60_000;

/// Settings for the store client and table provisioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// AWS region; the SDK default provider chain is used when unset.
    pub region: Option<String>,
    /// Profile from the shared AWS config files.
    pub profile: Option<String>,
    /// Custom endpoint for local stores (DynamoDB Local, LocalStack).
    pub endpoint_url: Option<String>,
    pub provision: ProvisionSettings,
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = ProvisionSettings::default();

        let timeout = parse_number(
            get("TABLE_WAIT_TIMEOUT_SECS"),
            "TABLE_WAIT_TIMEOUT_SECS",
            MAX_WAIT_TIMEOUT_SECS,
        )
        .map_or(defaults.timeout, Duration::from_secs);
        let poll_interval = parse_number(
            get("TABLE_WAIT_POLL_MILLIS"),
            "TABLE_WAIT_POLL_MILLIS",
            MAX_WAIT_POLL_MILLIS,
        )
        .map_or(defaults.poll_interval, Duration::from_millis);

        Self {
            region: get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")),
            profile: get("AWS_PROFILE"),
            endpoint_url: get("DYNAMODB_ENDPOINT_URL"),
            provision: ProvisionSettings {
                timeout,
                poll_interval,
            },
        }
    }

    /// Region the client will use, falling back to `us-east-1`.
    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

fn parse_number(value: Option<String>, key: &str, max: u64) -> Option<u64> {
    let value = value?;
    match value.trim().parse::<u64>() {
        Ok(n) if n > max => {
            warn!(key, value = %value, max, "setting too large, capping");
            Some(max)
        }
        Ok(n) => Some(n),
        Err(_) => {
            warn!(key, value = %value, "ignoring unparseable setting, using default");
            None
        }
    }
}
