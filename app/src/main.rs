mod config;
mod error;
mod feed;
mod logging;
mod models;
mod observer;
mod rest;
mod storage;

use crate::config::Config;
use crate::error::StartupError;
use crate::feed::HttpFeed;
use crate::observer::ReconcileObserver;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
pub async fn main() -> Result<(), StartupError> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    logging::init(config.log_level());
    info!("Starting traysync, core {}", traysync_core::CORE_VERSION);

    let client = feed::http_client(config.fetch_timeout())?;
    let sensor_feed = HttpFeed::with_client("sensor", config.sensor_feed_url(), client.clone());
    let config_feed = HttpFeed::with_client("configuration", config.config_feed_url(), client);
    let store = storage::connect(config.storage()).await?;

    let observer = ReconcileObserver::new(Arc::new(sensor_feed), Arc::new(config_feed), store);
    info!("{:?}", observer);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Couldn't listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };
    rest::dispatch_server(observer, config.bind_addr(), shutdown).await?;
    Ok(())
}
