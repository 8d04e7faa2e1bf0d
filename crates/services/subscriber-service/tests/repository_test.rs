//! Repository tests against an in-memory SQLite database.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use common::DatabaseConfig;
use domain::{Device, House, Room, SensorData};
use subscriber_lib::infra::Database;
use subscriber_lib::repository::{
    DeviceRepository, DeviceStore, HouseRepository, HouseStore, RoomRepository, RoomStore,
    SensorDataRepository, SensorDataStore,
};

struct Stores {
    houses: HouseStore,
    rooms: RoomStore,
    devices: DeviceStore,
    readings: SensorDataStore,
}

async fn stores() -> Stores {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = Database::connect(&config).await.unwrap();

    Stores {
        houses: HouseStore::new(db.get_connection()),
        rooms: RoomStore::new(db.get_connection()),
        devices: DeviceStore::new(db.get_connection()),
        readings: SensorDataStore::new(db.get_connection()),
    }
}

fn at(value: &str) -> DateTime<Utc> {
    value.parse().unwrap()
}

/// House with one room and one auto-provisioned device
async fn seed(stores: &Stores, sensor_id: &str) -> (House, Room, Device) {
    let house = stores
        .houses
        .insert(House::new("Lake House".to_string(), "12 Shore Road".to_string()))
        .await
        .unwrap();
    let room = stores
        .rooms
        .insert(Room::new("Kitchen".to_string(), house.id))
        .await
        .unwrap();
    let device = stores
        .devices
        .insert(Device::auto_provisioned(sensor_id, None, room.id))
        .await
        .unwrap();

    (house, room, device)
}

#[tokio::test]
async fn test_room_name_lookup_ignores_case() {
    let stores = stores().await;
    let (house, room, _) = seed(&stores, "sensor_001").await;

    let found = stores
        .rooms
        .find_by_house_and_name(house.id, "KITCHEN")
        .await
        .unwrap();
    assert_eq!(found.map(|r| r.id), Some(room.id));

    let other_house = stores
        .rooms
        .find_by_house_and_name(Uuid::new_v4(), "Kitchen")
        .await
        .unwrap();
    assert!(other_house.is_none());
}

#[tokio::test]
async fn test_find_by_sensor_id_prefers_serial_number() {
    let stores = stores().await;
    let (_, room, device) = seed(&stores, "sensor_001").await;

    let mut named = Device::auto_provisioned("other", Some("Porch sensor_002 unit"), room.id);
    named.serial_number = None;
    let named = stores.devices.insert(named).await.unwrap();

    let by_serial = stores.devices.find_by_sensor_id("sensor_001").await.unwrap();
    assert_eq!(by_serial.map(|d| d.id), Some(device.id));

    let by_name = stores.devices.find_by_sensor_id("sensor_002").await.unwrap();
    assert_eq!(by_name.map(|d| d.id), Some(named.id));

    assert!(stores
        .devices
        .find_by_sensor_id("sensor_404")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_name_match_takes_underscore_literally() {
    let stores = stores().await;
    let (_, room, _) = seed(&stores, "serial-abc").await;

    let mut lookalike = Device::auto_provisioned("other", Some("sensorX001 lamp"), room.id);
    lookalike.serial_number = None;
    stores.devices.insert(lookalike).await.unwrap();

    assert!(stores
        .devices
        .find_by_sensor_id("sensor_001")
        .await
        .unwrap()
        .is_none());

    let mut literal = Device::auto_provisioned("other", Some("Hall sensor_001 lamp"), room.id);
    literal.serial_number = None;
    let literal = stores.devices.insert(literal).await.unwrap();

    let found = stores.devices.find_by_sensor_id("sensor_001").await.unwrap();
    assert_eq!(found.map(|d| d.id), Some(literal.id));
}

#[tokio::test]
async fn test_find_by_sensor_id_falls_back_to_readings() {
    let stores = stores().await;
    let (_, _, device) = seed(&stores, "serial-xyz").await;

    let mut reading = SensorData::new(device.id, at("2025-03-01T10:00:00Z"));
    reading.sensor_id = Some("legacy_sensor".to_string());
    stores.readings.insert(reading).await.unwrap();

    let found = stores.devices.find_by_sensor_id("legacy_sensor").await.unwrap();
    assert_eq!(found.map(|d| d.id), Some(device.id));
}

#[tokio::test]
async fn test_range_query_and_latest() {
    let stores = stores().await;
    let (_, _, device) = seed(&stores, "sensor_001").await;

    for timestamp in [
        "2025-03-01T08:00:00Z",
        "2025-03-01T10:00:00Z",
        "2025-03-01T12:00:00Z",
        "2025-03-02T09:00:00Z",
    ] {
        let mut reading = SensorData::new(device.id, at(timestamp));
        reading.temperature = Some(21.0);
        stores.readings.insert(reading).await.unwrap();
    }

    let window = stores
        .readings
        .list_by_device_in_range(
            device.id,
            at("2025-03-01T10:00:00Z"),
            at("2025-03-01T12:00:00Z"),
        )
        .await
        .unwrap();
    let timestamps: Vec<_> = window.iter().map(|r| r.timestamp).collect();
    assert_eq!(
        timestamps,
        vec![at("2025-03-01T10:00:00Z"), at("2025-03-01T12:00:00Z")]
    );

    let latest = stores.readings.latest_by_device(device.id).await.unwrap();
    assert_eq!(latest.map(|r| r.timestamp), Some(at("2025-03-02T09:00:00Z")));
}

#[tokio::test]
async fn test_delete_older_than_counts_rows() {
    let stores = stores().await;
    let (_, _, device) = seed(&stores, "sensor_001").await;
    let now = Utc::now();

    for age in [40, 35, 1] {
        let reading = SensorData::new(device.id, now - Duration::days(age));
        stores.readings.insert(reading).await.unwrap();
    }

    let deleted = stores
        .readings
        .delete_older_than(now - Duration::days(30))
        .await
        .unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(stores.readings.list_by_device(device.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_house_delete_cascades_to_rooms() {
    let stores = stores().await;
    let house = stores
        .houses
        .insert(House::new("Cabin".to_string(), "1 Forest Lane".to_string()))
        .await
        .unwrap();
    let room = stores
        .rooms
        .insert(Room::new("Attic".to_string(), house.id))
        .await
        .unwrap();

    assert!(stores.houses.delete(house.id).await.unwrap());
    assert!(!stores.houses.delete(house.id).await.unwrap());
    assert!(stores.rooms.find_by_id(room.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_device_counts() {
    let stores = stores().await;
    let (_, room, _) = seed(&stores, "sensor_001").await;

    let mut inactive = Device::auto_provisioned("sensor_002", None, room.id);
    inactive.is_active = false;
    stores.devices.insert(inactive).await.unwrap();

    assert_eq!(stores.houses.count().await.unwrap(), 1);
    assert_eq!(stores.rooms.count().await.unwrap(), 1);
    assert_eq!(stores.devices.count().await.unwrap(), 2);
    assert_eq!(stores.devices.count_active().await.unwrap(), 1);
    assert_eq!(stores.devices.count_by_room(room.id).await.unwrap(), 2);
}
