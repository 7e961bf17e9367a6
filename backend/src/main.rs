//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env(&DefaultEnv::new());
    info!(bind_addr = %config.bind_addr, "starting feedback portal backend");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;

    // Fail the probes as soon as a shutdown signal arrives, while actix is
    // still draining in-flight connections.
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received; draining");
            health_state.begin_drain();
        }
    });

    server.await
}
