//! Jobwire Daemon - Main Entry Point
//! Hosts the job factory, an in-process bus and a trigger loop

mod bus;
mod config;
mod constants;
mod jobs;
mod shutdown;
mod telemetry;
mod trigger_loop;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use bus::LoggingBus;
use config::DaemonConfig;
use constants::SHUTDOWN_GRACE_PERIOD;
use jobwire_core::application::BusJobFactory;
use jobwire_core::port::id_provider::UuidProvider;
use jobwire_core::port::time_provider::SystemTimeProvider;
use shutdown::shutdown_channel;
use trigger_loop::TriggerLoop;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env().context("Failed to load configuration")?;

    // 2. Initialize logging (+ OpenTelemetry when configured)
    telemetry::init_tracing(config.log_format)?;

    info!("Jobwire daemon v{} starting...", VERSION);

    // 3. Setup dependencies (DI wiring)
    let bus = Arc::new(LoggingBus::new(config.bus_address.clone()));
    let registry = jobs::registry().context("Failed to build job registry")?;
    info!(
        job_types = ?registry.job_types(),
        bus = %config.bus_address,
        "Job registry ready"
    );
    let factory = Arc::new(BusJobFactory::new(bus.clone(), registry));

    let trigger_loop = Arc::new(TriggerLoop::new(
        factory.clone(),
        config.scheduler_context.clone(),
        Arc::new(SystemTimeProvider),
        Arc::new(UuidProvider),
    ));

    // 4. Start triggers
    info!(triggers = config.schedule.triggers.len(), "Starting trigger loop...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let triggers = config.schedule.triggers.clone();
    let loop_handle = tokio::spawn(async move {
        trigger_loop.run(&triggers, shutdown_rx).await;
    });

    info!("System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    shutdown_tx.shutdown();
    if tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, loop_handle)
        .await
        .is_err()
    {
        tracing::warn!("Trigger loop did not stop within the grace period");
    }

    info!(
        published = bus.published_count(),
        cached_job_types = ?factory.cached_types(),
        "Shutdown complete."
    );

    Ok(())
}
