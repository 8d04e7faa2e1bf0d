//! Broker ingestion: topic mapping, payload decoding, device resolution
//! and fan-out to the hub.

mod ingestor;
mod listener;
mod payload;
mod topic;

pub use ingestor::{IngestOutcome, SensorIngestor};
pub use listener::run_listener;
pub use payload::SensorPayload;
pub use topic::parse_sensor_topic;
