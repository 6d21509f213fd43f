mod config;
mod data;
mod error;
mod gateway;
mod model;
mod scheduler;
mod service;
mod startup;
mod util;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    data::broadcast_job::BroadcastJobRepository,
    error::AppError,
    gateway::discord::DiscordGateway,
    scheduler::broadcast_dispatch,
    service::dispatch::DispatchEngine,
    util::clock::SystemClock,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;

    // Broadcasts stranded in dispatching by an unclean shutdown go back to
    // pending before the first tick.
    let repository = BroadcastJobRepository::new(&db);
    let released = repository.release_dispatching(Utc::now()).await?;
    if released > 0 {
        tracing::warn!(
            "Released {} stranded broadcast(s) back to pending",
            released
        );
    }

    let counts = repository.count_by_status().await?;
    let summary = counts
        .iter()
        .map(|(status, count)| format!("{}={}", status, count))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!("Schedule store: {}", summary);

    let discord_http = startup::setup_discord_http(&config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let engine = DispatchEngine::new(
        db.clone(),
        Arc::new(DiscordGateway::new(discord_http)),
        Arc::new(SystemClock),
        config.dispatch.clone(),
        shutdown_rx,
    );

    let mut scheduler =
        broadcast_dispatch::start_scheduler(engine.clone(), config.dispatch.tick_interval).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    // Raise the flag first so in-flight deliveries can react, then stop the
    // scheduler so no further tick starts.
    shutdown_tx.send(true).ok();
    scheduler.shutdown().await?;
    engine.shutdown().await?;

    tracing::info!("Shutdown complete");

    Ok(())
}
