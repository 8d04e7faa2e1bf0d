//! MQTT transport for simulated readings.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use common::MqttConfig;
use domain::{is_blank, sensor_topic, SensorReading, FALLBACK_SENSOR_TOPIC};

use crate::error::{PublisherError, PublisherResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Sink for readings, abstracted over the broker client.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReadingPublisher: Send + Sync {
    /// Whether the broker has acknowledged the connection
    fn is_connected(&self) -> bool;

    /// Publish one reading on the given topic
    async fn publish(&self, reading: &SensorReading, topic: &str) -> PublisherResult<()>;

    /// Ask the broker connection to close
    async fn disconnect(&self) -> PublisherResult<()>;
}

/// Topic a reading is published on.
pub fn topic_for(reading: &SensorReading) -> String {
    if is_blank(&reading.sensor_id) {
        FALLBACK_SENSOR_TOPIC.to_string()
    } else {
        sensor_topic(&reading.sensor_id)
    }
}

/// Publish every reading on its own topic.
///
/// Fails up front when the client is disconnected. Individual publish
/// failures are logged and skipped; the number of published readings is
/// returned.
pub async fn publish_batch(
    publisher: &dyn ReadingPublisher,
    readings: &[SensorReading],
) -> PublisherResult<usize> {
    if !publisher.is_connected() {
        return Err(PublisherError::NotConnected);
    }

    let mut published = 0;
    for reading in readings {
        let topic = topic_for(reading);
        match publisher.publish(reading, &topic).await {
            Ok(()) => {
                published += 1;
                info!(
                    sensor_id = %reading.sensor_id,
                    location = %reading.location,
                    temperature = reading.temperature,
                    humidity = reading.humidity,
                    "Published reading to {}",
                    topic
                );
            }
            Err(e) => warn!("Failed to publish reading for {}: {}", reading.sensor_id, e),
        }
    }

    Ok(published)
}

/// rumqttc-backed publisher. The event loop runs on its own task and
/// reports connection state through a watch channel.
pub struct MqttPublisher {
    client: AsyncClient,
    connected: watch::Receiver<bool>,
}

impl MqttPublisher {
    /// Create the client and start driving its event loop.
    pub fn connect(config: &MqttConfig) -> Self {
        let client_id = config.client_id(&Uuid::new_v4().simple().to_string());
        let mut options = MqttOptions::new(client_id, config.host.clone(), config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_seconds));
        options.set_clean_session(true);

        info!("Connecting to MQTT broker at {}:{}", config.host, config.port);
        let (client, event_loop) = AsyncClient::new(options, 64);
        let (state_tx, state_rx) = watch::channel(false);
        tokio::spawn(drive_event_loop(event_loop, state_tx));

        Self {
            client,
            connected: state_rx,
        }
    }

    /// Wait until the broker acknowledges the connection.
    pub async fn wait_connected(&self, timeout: Duration) -> PublisherResult<()> {
        let mut state = self.connected.clone();
        let acknowledged = async move { state.wait_for(|connected| *connected).await.is_ok() };

        match tokio::time::timeout(timeout, acknowledged).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(PublisherError::NotConnected),
            Err(_) => Err(PublisherError::ConnectTimeout(timeout.as_secs())),
        }
    }
}

#[async_trait]
impl ReadingPublisher for MqttPublisher {
    fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    async fn publish(&self, reading: &SensorReading, topic: &str) -> PublisherResult<()> {
        if !self.is_connected() {
            return Err(PublisherError::NotConnected);
        }

        let payload = serde_json::to_vec(reading)?;
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await?;

        Ok(())
    }

    async fn disconnect(&self) -> PublisherResult<()> {
        self.client.disconnect().await?;
        info!("Disconnected from MQTT broker");
        Ok(())
    }
}

async fn drive_event_loop(mut event_loop: EventLoop, connected: watch::Sender<bool>) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Connected to MQTT broker");
                connected.send_replace(true);
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                connected.send_replace(false);
                break;
            }
            Ok(event) => debug!("MQTT event: {:?}", event),
            Err(ConnectionError::RequestsDone) => {
                connected.send_replace(false);
                break;
            }
            Err(e) => {
                if connected.send_replace(false) {
                    warn!("Lost connection to MQTT broker: {}", e);
                } else {
                    debug!("MQTT connection attempt failed: {}", e);
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(sensor_id: &str) -> SensorReading {
        SensorReading {
            sensor_id: sensor_id.to_string(),
            sensor_name: "Test".to_string(),
            location: "Kitchen".to_string(),
            temperature: 20.0,
            humidity: 50.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_topic_for_reading() {
        assert_eq!(topic_for(&reading("SENSOR_001")), "sensors/sensor_001/data");
        assert_eq!(topic_for(&reading(" ")), "sensor/data");
    }

    #[tokio::test]
    async fn test_publish_batch_refuses_when_disconnected() {
        let mut publisher = MockReadingPublisher::new();
        publisher.expect_is_connected().return_const(false);
        publisher.expect_publish().never();

        let result = publish_batch(&publisher, &[reading("SENSOR_001")]).await;
        assert!(matches!(result, Err(PublisherError::NotConnected)));
    }

    #[tokio::test]
    async fn test_publish_batch_skips_failures() {
        let mut publisher = MockReadingPublisher::new();
        publisher.expect_is_connected().return_const(true);
        publisher
            .expect_publish()
            .times(3)
            .returning(|reading, _| {
                if reading.sensor_id == "SENSOR_002" {
                    Err(PublisherError::NotConnected)
                } else {
                    Ok(())
                }
            });

        let readings = vec![reading("SENSOR_001"), reading("SENSOR_002"), reading("SENSOR_003")];
        let published = publish_batch(&publisher, &readings).await.unwrap();
        assert_eq!(published, 2);
    }

    #[tokio::test]
    async fn test_publish_batch_uses_per_sensor_topics() {
        let mut publisher = MockReadingPublisher::new();
        publisher.expect_is_connected().return_const(true);
        publisher
            .expect_publish()
            .withf(|reading, topic| topic == format!("sensors/{}/data", reading.sensor_id.to_lowercase()))
            .times(2)
            .returning(|_, _| Ok(()));

        let readings = vec![reading("SENSOR_001"), reading("Porch")];
        assert_eq!(publish_batch(&publisher, &readings).await.unwrap(), 2);
    }
}
