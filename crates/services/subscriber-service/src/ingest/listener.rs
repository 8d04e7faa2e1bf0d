//! Background MQTT subscription feeding the ingestor.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use common::MqttConfig;
use domain::SENSOR_TOPIC_FILTER;

use super::ingestor::{IngestOutcome, SensorIngestor};

/// Consume sensor topics until the task is dropped.
///
/// The subscription is renewed on every acknowledged (re)connect. After a
/// connection error the loop sleeps `reconnect_delay` before polling again.
pub async fn run_listener(config: MqttConfig, reconnect_delay: Duration, ingestor: Arc<SensorIngestor>) {
    let client_id = config.client_id(&Uuid::new_v4().simple().to_string());
    let mut options = MqttOptions::new(client_id, config.host.clone(), config.port);
    options.set_keep_alive(Duration::from_secs(config.keep_alive_seconds));
    options.set_clean_session(true);

    info!("Starting MQTT listener for {}:{}", config.host, config.port);
    let (client, mut event_loop) = AsyncClient::new(options, 64);

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Connected to MQTT broker");
                match client.subscribe(SENSOR_TOPIC_FILTER, QoS::AtLeastOnce).await {
                    Ok(()) => info!("Subscribed to topic: {}", SENSOR_TOPIC_FILTER),
                    Err(e) => error!("Failed to subscribe to {}: {}", SENSOR_TOPIC_FILTER, e),
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                debug!("Received message on topic: {}", publish.topic);
                match ingestor.handle_message(&publish.topic, &publish.payload).await {
                    Ok(IngestOutcome::Dropped(reason)) => debug!("Dropped message: {}", reason),
                    Ok(_) => {}
                    Err(e) => error!("Error processing message on {}: {}", publish.topic, e),
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "Disconnected from MQTT broker: {}. Reconnecting in {}s",
                    e,
                    reconnect_delay.as_secs()
                );
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
