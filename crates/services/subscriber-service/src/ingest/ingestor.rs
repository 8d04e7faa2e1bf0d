//! Turns broker messages into stored readings and hub events.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use common::AppResult;
use domain::{
    clip, Device, House, Room, SensorData, DEFAULT_HOUSE_ADDRESS, DEFAULT_HOUSE_NAME,
    MAX_LOCATION_LENGTH, MAX_ROOM_NAME_LENGTH, MAX_SENSOR_ID_LENGTH, MAX_SENSOR_NAME_LENGTH,
    STATUS_DISCONNECTED, UNKNOWN_ROOM_NAME,
};

use super::payload::SensorPayload;
use super::topic::parse_sensor_topic;
use crate::realtime::{
    house_group, room_group, DeviceStatusUpdate, HubEvent, Notifier, SensorDataUpdate,
};
use crate::repository::{DeviceRepository, HouseRepository, RoomRepository, SensorDataRepository};

/// What became of one broker message
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Reading persisted and pushed
    Stored(SensorData),
    /// Device is switched off; only its status was pushed
    DeviceInactive(Uuid),
    /// Topic or payload unusable
    Dropped(String),
}

pub struct SensorIngestor {
    houses: Arc<dyn HouseRepository>,
    rooms: Arc<dyn RoomRepository>,
    devices: Arc<dyn DeviceRepository>,
    readings: Arc<dyn SensorDataRepository>,
    notifier: Arc<dyn Notifier>,
}

impl SensorIngestor {
    pub fn new(
        houses: Arc<dyn HouseRepository>,
        rooms: Arc<dyn RoomRepository>,
        devices: Arc<dyn DeviceRepository>,
        readings: Arc<dyn SensorDataRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            houses,
            rooms,
            devices,
            readings,
            notifier,
        }
    }

    /// Handle one message received on `topic`.
    ///
    /// Unusable topics and payloads are logged and reported as dropped;
    /// repository failures are returned.
    pub async fn handle_message(&self, topic: &str, payload: &[u8]) -> AppResult<IngestOutcome> {
        let Some(sensor_id) = parse_sensor_topic(topic) else {
            warn!("Invalid topic format: {}", topic);
            return Ok(IngestOutcome::Dropped(format!("invalid topic {}", topic)));
        };

        let payload = match SensorPayload::from_slice(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    "Failed to parse payload for sensor {}: {} ({})",
                    sensor_id,
                    e,
                    String::from_utf8_lossy(payload)
                );
                return Ok(IngestOutcome::Dropped(format!("undecodable payload: {}", e)));
            }
        };

        self.ingest(sensor_id, payload).await
    }

    /// Store a decoded reading for `sensor_id` and push it.
    ///
    /// Ids longer than a stored sensor id are cut first, so the device
    /// serial and the readings carry the same id.
    pub async fn ingest(&self, sensor_id: &str, payload: SensorPayload) -> AppResult<IngestOutcome> {
        let sensor_id = clip(sensor_id, MAX_SENSOR_ID_LENGTH);
        let sensor_id = sensor_id.as_str();
        let (device, room) = self.resolve_device(sensor_id, &payload).await?;
        let room_id = device.room_id;
        let house_id = room.as_ref().map(|r| r.house_id);
        let room_name = room.map(|r| r.name);

        if !device.is_active {
            debug!("Device {} is inactive, skipping reading", device.id);
            let event = HubEvent::DeviceStatus(DeviceStatusUpdate {
                device_id: device.id,
                room_id,
                house_id,
                sensor_id: sensor_id.to_string(),
                device_name: device.name.clone(),
                room_name,
                status: STATUS_DISCONNECTED.to_string(),
                is_active: false,
                timestamp: Utc::now(),
            });
            self.push(room_id, house_id, &event);
            return Ok(IngestOutcome::DeviceInactive(device.id));
        }

        let mut data = SensorData::new(device.id, payload.timestamp.unwrap_or_else(Utc::now));
        data.sensor_id = Some(sensor_id.to_string());
        data.sensor_name = payload.name().map(|n| clip(n, MAX_SENSOR_NAME_LENGTH));
        data.location = payload
            .resolved_location()
            .map(|l| clip(&l, MAX_LOCATION_LENGTH));
        data.temperature = payload.temperature;
        data.humidity = payload.humidity;

        let data = self.readings.insert(data).await?;

        let event = HubEvent::SensorData(SensorDataUpdate {
            device_id: device.id,
            room_id,
            house_id,
            sensor_id: sensor_id.to_string(),
            temperature: data.temperature,
            humidity: data.humidity,
            timestamp: data.timestamp,
            device_name: device.name,
            room_name,
        });
        self.push(room_id, house_id, &event);

        info!(
            "Persisted sensor data for device {} (sensor {}) at {}",
            data.device_id, sensor_id, data.timestamp
        );
        Ok(IngestOutcome::Stored(data))
    }

    fn push(&self, room_id: Option<Uuid>, house_id: Option<Uuid>, event: &HubEvent) {
        if let Some(room_id) = room_id {
            self.notifier.notify(&room_group(room_id), event);
        }
        if let Some(house_id) = house_id {
            self.notifier.notify(&house_group(house_id), event);
        }
    }

    async fn resolve_device(
        &self,
        sensor_id: &str,
        payload: &SensorPayload,
    ) -> AppResult<(Device, Option<Room>)> {
        if let Some(device) = self.devices.find_by_sensor_id(sensor_id).await? {
            let room = match device.room_id {
                Some(room_id) => self.rooms.find_by_id(room_id).await?,
                None => None,
            };
            return Ok((device, room));
        }

        let (device, room) = self.provision(sensor_id, payload).await?;
        Ok((device, Some(room)))
    }

    /// Register an unknown sensor under the default house.
    async fn provision(&self, sensor_id: &str, payload: &SensorPayload) -> AppResult<(Device, Room)> {
        let house = match self.houses.find_by_name(DEFAULT_HOUSE_NAME).await? {
            Some(house) => house,
            None => {
                let house = House::new(
                    DEFAULT_HOUSE_NAME.to_string(),
                    DEFAULT_HOUSE_ADDRESS.to_string(),
                );
                info!("Creating {} for unknown devices", DEFAULT_HOUSE_NAME);
                self.houses.insert(house).await?
            }
        };

        let room_name = payload
            .resolved_location()
            .map(|l| clip(&l, MAX_ROOM_NAME_LENGTH))
            .unwrap_or_else(|| UNKNOWN_ROOM_NAME.to_string());
        let room = match self.rooms.find_by_house_and_name(house.id, &room_name).await? {
            Some(room) => room,
            None => self.rooms.insert(Room::new(room_name, house.id)).await?,
        };

        let device = self
            .devices
            .insert(Device::auto_provisioned(sensor_id, payload.name(), room.id))
            .await?;
        info!(
            "Created new device {} for sensor {} in room {}",
            device.id, sensor_id, room.name
        );

        Ok((device, room))
    }
}
