use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use intercom::broker::Broker;
use intercom::config::load_config;
use intercom::transport::server::start_server;
use intercom::utils::logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.server.log_level);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let broker = Arc::new(Broker::new());

    tokio::spawn(Broker::start_expiry_loop(
        broker.clone(),
        Duration::from_secs(config.broker.sweep_interval_secs),
        Duration::from_secs(config.broker.ack_timeout_secs),
    ));

    tokio::select! {
        _ = start_server(&addr, broker) => {
            error!("Broker server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }
}
