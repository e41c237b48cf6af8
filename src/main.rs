use lambda_http::{Error, Request, run, service_fn};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use table_dispatch::http::handle_request;
use table_dispatch::{DispatchConfig, Dispatcher, DynamoStore, build_client};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = DispatchConfig::from_env();
    let client = build_client(&config).await;
    let dispatcher = Dispatcher::new(Arc::new(DynamoStore::new(client)), config.provision);
    info!(region = config.region_or_default(), "table dispatcher ready");

    run(service_fn(|event: Request| handle_request(&dispatcher, event))).await
}
