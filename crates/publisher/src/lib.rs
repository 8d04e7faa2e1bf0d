//! Publisher Library
//!
//! Simulates a fleet of environmental sensors and publishes their
//! readings to an MQTT broker. It can be run standalone or embedded in the
//! combined binary.

pub mod config;
pub mod error;
pub mod mqtt_publisher;
pub mod runner;
pub mod simulator;

use std::future::Future;

use tracing::{error, info};

use crate::config::PublisherConfig;
use crate::mqtt_publisher::{MqttPublisher, ReadingPublisher};
use crate::runner::run_publish_loop;
use crate::simulator::SensorSimulator;

pub use error::{PublisherError, PublisherResult};

/// Run the publisher until Ctrl-C (for the standalone and combined binaries).
pub async fn run_embedded(config: PublisherConfig) -> Result<(), Box<dyn std::error::Error>> {
    run_until(config, shutdown_signal()).await
}

/// Run the publisher until `shutdown` resolves.
pub async fn run_until<F>(config: PublisherConfig, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let publisher = MqttPublisher::connect(&config.mqtt);
    publisher.wait_connected(config.connect_timeout).await?;

    let simulator = SensorSimulator::new();
    info!(
        "Publishing {} sensors every {} ms",
        simulator.sensors().len(),
        config.publish_interval.as_millis()
    );

    let batches = run_publish_loop(&simulator, &publisher, config.publish_interval, shutdown).await;

    publisher.disconnect().await?;
    info!("Publisher stopped after {} batches", batches);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
