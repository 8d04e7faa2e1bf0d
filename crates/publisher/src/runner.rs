//! Periodic publish loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::mqtt_publisher::{publish_batch, ReadingPublisher};
use crate::simulator::SensorSimulator;

/// Shortest period between batches; shorter intervals are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Publish one batch per interval until `shutdown` resolves.
///
/// Returns the number of batches attempted.
pub async fn run_publish_loop<F>(
    simulator: &SensorSimulator,
    publisher: &dyn ReadingPublisher,
    interval: Duration,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut batches = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping publisher");
                break;
            }
            _ = ticker.tick() => {
                let readings = simulator.generate_all();
                match publish_batch(publisher, &readings).await {
                    Ok(published) => info!("Published {}/{} readings", published, readings.len()),
                    Err(e) => error!("Failed to publish batch: {}", e),
                }
                batches += 1;
            }
        }
    }

    batches
}
