//! DynamoDB client construction.
//!
//! The client is built once per process and shared by every invocation.
//! Credentials come from the default chain (environment, Lambda execution
//! role, instance profile) unless a profile is configured.

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use tracing::info;

use crate::config::{DEFAULT_REGION, DispatchConfig};

/// Build the AWS SDK DynamoDB client with the given configuration.
pub async fn build_client(config: &DispatchConfig) -> Client {
    // Region priority: config > default provider chain > us-east-1
    let region_provider = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(DEFAULT_REGION);

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(profile_name) = &config.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile_name)
            .build();
        config_loader = config_loader.credentials_provider(profile_provider);
    }

    let sdk_config = config_loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = &config.endpoint_url {
        info!(endpoint = %url, "using custom DynamoDB endpoint");
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    Client::from_conf(dynamo_config.build())
}
