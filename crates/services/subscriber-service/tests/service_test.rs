//! Service layer unit tests over mocked repositories.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockall::predicate::eq;
use uuid::Uuid;

use common::AppError;
use domain::{
    CreateDevice, CreateHouse, CreateRoom, CreateSensorData, Device, DeviceType, House,
    MqttSensorDataRequest, Room, SensorData, UpdateDevice, UpdateHouse, UpdateRoom,
};
use subscriber_lib::repository::{
    MockDeviceRepository, MockHouseRepository, MockRoomRepository, MockSensorDataRepository,
};
use subscriber_lib::service::{
    DashboardManager, DashboardService, DeviceManager, DeviceService, HouseManager, HouseService,
    RoomManager, RoomService, SensorDataManager, SensorDataService,
};

fn house(name: &str) -> House {
    House::new(name.to_string(), "12 Shore Road".to_string())
}

fn device(room_id: Uuid, serial: Option<&str>) -> Device {
    let mut device = Device::auto_provisioned("sensor_001", Some("Hall Sensor"), room_id);
    device.serial_number = serial.map(str::to_string);
    device
}

fn create_device(room_id: Option<Uuid>, serial: Option<&str>) -> CreateDevice {
    CreateDevice {
        name: "Hall Sensor".to_string(),
        room_id,
        device_type: DeviceType::TemperatureSensor,
        manufacturer: None,
        model: None,
        serial_number: serial.map(str::to_string),
        is_active: true,
    }
}

fn room_manager(
    rooms: MockRoomRepository,
    houses: MockHouseRepository,
    devices: MockDeviceRepository,
) -> RoomManager {
    RoomManager::new(Arc::new(rooms), Arc::new(houses), Arc::new(devices))
}

// =============================================================================
// Houses
// =============================================================================

#[tokio::test]
async fn test_create_house_success() {
    let mut repo = MockHouseRepository::new();
    repo.expect_insert().times(1).returning(Ok);

    let service = HouseManager::new(Arc::new(repo));
    let result = service
        .create_house(CreateHouse {
            name: "Lake House".to_string(),
            address: "12 Shore Road".to_string(),
        })
        .await;

    let house = result.unwrap();
    assert_eq!(house.name, "Lake House");
    assert_eq!(house.address, "12 Shore Road");
}

#[tokio::test]
async fn test_create_house_requires_name_and_address() {
    let mut repo = MockHouseRepository::new();
    repo.expect_insert().never();
    let service = HouseManager::new(Arc::new(repo));

    let blank_name = service
        .create_house(CreateHouse {
            name: "   ".to_string(),
            address: "12 Shore Road".to_string(),
        })
        .await;
    assert!(matches!(blank_name, Err(AppError::Validation(_))));

    let blank_address = service
        .create_house(CreateHouse {
            name: "Lake House".to_string(),
            address: String::new(),
        })
        .await;
    assert!(matches!(blank_address, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_update_missing_house_is_not_found() {
    let mut repo = MockHouseRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_update().never();

    let service = HouseManager::new(Arc::new(repo));
    let result = service
        .update_house(
            Uuid::new_v4(),
            UpdateHouse {
                name: "Lake House".to_string(),
                address: "12 Shore Road".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_get_house_with_rooms_attaches_house_name() {
    let stored = house("Lake House");
    let house_id = stored.id;
    let rooms = vec![
        Room::new("Kitchen".to_string(), house_id),
        Room::new("Office".to_string(), house_id),
    ];

    let mut repo = MockHouseRepository::new();
    repo.expect_find_with_rooms()
        .with(eq(house_id))
        .returning(move |_| Ok(Some((stored.clone(), rooms.clone()))));

    let service = HouseManager::new(Arc::new(repo));
    let result = service.get_house_with_rooms(house_id).await.unwrap();

    assert_eq!(result.house.id, house_id);
    assert_eq!(result.rooms.len(), 2);
    assert!(result
        .rooms
        .iter()
        .all(|r| r.house_name.as_deref() == Some("Lake House")));
}

// =============================================================================
// Rooms
// =============================================================================

#[tokio::test]
async fn test_create_room_in_missing_house_is_rejected() {
    let mut houses = MockHouseRepository::new();
    houses.expect_find_by_id().returning(|_| Ok(None));
    let mut rooms = MockRoomRepository::new();
    rooms.expect_insert().never();

    let service = room_manager(rooms, houses, MockDeviceRepository::new());
    let result = service
        .create_room(CreateRoom {
            name: "Kitchen".to_string(),
            house_id: Uuid::new_v4(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_create_room_rejects_duplicate_name() {
    let stored = house("Lake House");
    let house_id = stored.id;

    let mut houses = MockHouseRepository::new();
    houses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    let mut rooms = MockRoomRepository::new();
    rooms
        .expect_find_by_house_and_name()
        .returning(|house_id, _| Ok(Some(Room::new("Kitchen".to_string(), house_id))));
    rooms.expect_insert().never();

    let service = room_manager(rooms, houses, MockDeviceRepository::new());
    let result = service
        .create_room(CreateRoom {
            name: "KITCHEN".to_string(),
            house_id,
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg.contains("already exists")));
}

#[tokio::test]
async fn test_create_room_trims_name_before_lookup_and_insert() {
    let stored = house("Lake House");
    let house_id = stored.id;

    let mut houses = MockHouseRepository::new();
    houses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    let mut rooms = MockRoomRepository::new();
    rooms
        .expect_find_by_house_and_name()
        .withf(|_, name| name == "Kitchen")
        .times(1)
        .returning(|_, _| Ok(None));
    rooms
        .expect_insert()
        .withf(|room: &Room| room.name == "Kitchen")
        .times(1)
        .returning(Ok);

    let service = room_manager(rooms, houses, MockDeviceRepository::new());
    let result = service
        .create_room(CreateRoom {
            name: "  Kitchen ".to_string(),
            house_id,
        })
        .await
        .unwrap();

    assert_eq!(result.name, "Kitchen");
}

#[tokio::test]
async fn test_update_room_may_keep_its_own_name() {
    let stored = house("Lake House");
    let house_id = stored.id;
    let room = Room::new("Kitchen".to_string(), house_id);
    let room_id = room.id;

    let mut houses = MockHouseRepository::new();
    houses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    let mut rooms = MockRoomRepository::new();
    let existing = room.clone();
    rooms
        .expect_find_by_id()
        .with(eq(room_id))
        .returning(move |_| Ok(Some(existing.clone())));
    let same = room.clone();
    rooms
        .expect_find_by_house_and_name()
        .returning(move |_, _| Ok(Some(same.clone())));
    rooms.expect_update().times(1).returning(Ok);

    let service = room_manager(rooms, houses, MockDeviceRepository::new());
    let result = service
        .update_room(
            room_id,
            UpdateRoom {
                name: "kitchen".to_string(),
                house_id,
            },
        )
        .await
        .unwrap();

    assert_eq!(result.name, "kitchen");
    assert_eq!(result.house_name.as_deref(), Some("Lake House"));
}

#[tokio::test]
async fn test_delete_room_with_devices_conflicts() {
    let room = Room::new("Kitchen".to_string(), Uuid::new_v4());
    let room_id = room.id;

    let mut rooms = MockRoomRepository::new();
    rooms
        .expect_find_by_id()
        .returning(move |_| Ok(Some(room.clone())));
    rooms.expect_delete().never();
    let mut devices = MockDeviceRepository::new();
    devices
        .expect_count_by_room()
        .with(eq(room_id))
        .returning(|_| Ok(2));

    let service = room_manager(rooms, MockHouseRepository::new(), devices);
    let result = service.delete_room(room_id).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_delete_missing_room_returns_false() {
    let mut rooms = MockRoomRepository::new();
    rooms.expect_find_by_id().returning(|_| Ok(None));

    let service = room_manager(rooms, MockHouseRepository::new(), MockDeviceRepository::new());
    assert!(!service.delete_room(Uuid::new_v4()).await.unwrap());
}

// =============================================================================
// Devices
// =============================================================================

#[tokio::test]
async fn test_create_device_requires_room() {
    let mut devices = MockDeviceRepository::new();
    devices.expect_insert().never();
    let service = DeviceManager::new(Arc::new(devices), Arc::new(MockRoomRepository::new()));

    let result = service.create_device(create_device(None, None)).await;
    assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg == "Room ID is required"));
}

#[tokio::test]
async fn test_create_device_in_missing_room_is_rejected() {
    let mut rooms = MockRoomRepository::new();
    rooms.expect_find_by_id().returning(|_| Ok(None));
    let mut devices = MockDeviceRepository::new();
    devices.expect_insert().never();

    let service = DeviceManager::new(Arc::new(devices), Arc::new(rooms));
    let result = service
        .create_device(create_device(Some(Uuid::new_v4()), None))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_create_device_success_attaches_room() {
    let room = Room::new("Hall".to_string(), Uuid::new_v4());
    let room_id = room.id;

    let mut rooms = MockRoomRepository::new();
    rooms
        .expect_find_by_id()
        .returning(move |_| Ok(Some(room.clone())));
    let mut devices = MockDeviceRepository::new();
    devices.expect_find_by_serial_number().returning(|_| Ok(None));
    devices.expect_insert().times(1).returning(Ok);

    let service = DeviceManager::new(Arc::new(devices), Arc::new(rooms));
    let result = service
        .create_device(create_device(Some(room_id), Some("SN-1")))
        .await
        .unwrap();

    assert!(result.is_active);
    assert_eq!(result.room_id, Some(room_id));
    assert_eq!(result.room.unwrap().name, "Hall");
}

#[tokio::test]
async fn test_create_device_with_taken_serial_conflicts() {
    let room = Room::new("Hall".to_string(), Uuid::new_v4());
    let room_id = room.id;

    let mut rooms = MockRoomRepository::new();
    rooms
        .expect_find_by_id()
        .returning(move |_| Ok(Some(room.clone())));
    let mut devices = MockDeviceRepository::new();
    devices
        .expect_find_by_serial_number()
        .returning(move |serial| Ok(Some(device(room_id, Some(serial)))));
    devices.expect_insert().never();

    let service = DeviceManager::new(Arc::new(devices), Arc::new(rooms));
    let result = service
        .create_device(create_device(Some(room_id), Some("SN-1")))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_update_device_keeps_own_serial() {
    let room = Room::new("Hall".to_string(), Uuid::new_v4());
    let room_id = room.id;
    let stored = device(room_id, Some("SN-1"));
    let device_id = stored.id;

    let mut rooms = MockRoomRepository::new();
    rooms
        .expect_find_by_id()
        .returning(move |_| Ok(Some(room.clone())));
    let mut devices = MockDeviceRepository::new();
    let found = stored.clone();
    devices
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    devices
        .expect_find_by_serial_number()
        .returning(move |_| Ok(Some(stored.clone())));
    devices.expect_update().times(1).returning(Ok);

    let service = DeviceManager::new(Arc::new(devices), Arc::new(rooms));
    let result = service
        .update_device(
            device_id,
            UpdateDevice {
                name: "Renamed".to_string(),
                room_id: Some(room_id),
                device_type: DeviceType::SmartPlug,
                manufacturer: None,
                model: None,
                serial_number: Some("SN-1".to_string()),
                is_active: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(result.name, "Renamed");
    assert_eq!(result.device_type, DeviceType::SmartPlug);
    assert!(!result.is_active);
}

// =============================================================================
// Sensor data
// =============================================================================

#[tokio::test]
async fn test_range_requires_start_before_end() {
    let mut readings = MockSensorDataRepository::new();
    readings.expect_list_by_device_in_range().never();
    let service = SensorDataManager::new(Arc::new(readings), Arc::new(MockDeviceRepository::new()));

    let now = Utc::now();
    let result = service
        .list_by_device_in_range(Uuid::new_v4(), now, now - Duration::hours(1))
        .await;

    assert!(
        matches!(result, Err(AppError::Validation(ref msg)) if msg == "Start date must be earlier than end date")
    );
}

#[tokio::test]
async fn test_aggregate_over_window() {
    let device_id = Uuid::new_v4();
    let end = Utc::now();
    let start = end - Duration::hours(1);

    let mut readings = MockSensorDataRepository::new();
    readings
        .expect_list_by_device_in_range()
        .with(eq(device_id), eq(start), eq(end))
        .returning(|device_id, _, _| {
            Ok([18.0, 22.0]
                .into_iter()
                .map(|t| {
                    let mut data = SensorData::new(device_id, Utc::now());
                    data.temperature = Some(t);
                    data
                })
                .collect())
        });

    let service = SensorDataManager::new(Arc::new(readings), Arc::new(MockDeviceRepository::new()));
    let aggregate = service.aggregate(device_id, start, end).await.unwrap();

    assert_eq!(aggregate.count, 2);
    assert_eq!(aggregate.average_temperature, Some(20.0));
    assert_eq!(aggregate.average_humidity, None);
}

#[tokio::test]
async fn test_create_sensor_data_defaults_timestamp() {
    let device_id = Uuid::new_v4();

    let mut devices = MockDeviceRepository::new();
    devices
        .expect_find_by_id()
        .returning(|id| Ok(Some(device_with_id(id))));
    let mut readings = MockSensorDataRepository::new();
    readings.expect_insert().times(1).returning(Ok);

    let service = SensorDataManager::new(Arc::new(readings), Arc::new(devices));
    let before = Utc::now();
    let data = service
        .create_sensor_data(CreateSensorData {
            device_id,
            sensor_id: Some("sensor_001".to_string()),
            sensor_name: None,
            location: None,
            temperature: Some(21.0),
            humidity: None,
            timestamp: None,
            metadata: None,
        })
        .await
        .unwrap();

    assert_eq!(data.device_id, device_id);
    assert!(data.timestamp >= before);
}

#[tokio::test]
async fn test_create_sensor_data_for_missing_device_is_rejected() {
    let mut devices = MockDeviceRepository::new();
    devices.expect_find_by_id().returning(|_| Ok(None));
    let mut readings = MockSensorDataRepository::new();
    readings.expect_insert().never();

    let service = SensorDataManager::new(Arc::new(readings), Arc::new(devices));
    let result = service
        .create_sensor_data(CreateSensorData {
            device_id: Uuid::new_v4(),
            sensor_id: None,
            sensor_name: None,
            location: None,
            temperature: None,
            humidity: None,
            timestamp: None,
            metadata: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_create_from_mqtt_for_unknown_sensor_is_rejected() {
    let mut devices = MockDeviceRepository::new();
    devices
        .expect_find_by_sensor_id()
        .with(eq("sensor_404"))
        .returning(|_| Ok(None));

    let service = SensorDataManager::new(
        Arc::new(MockSensorDataRepository::new()),
        Arc::new(devices),
    );
    let result = service
        .create_from_mqtt(MqttSensorDataRequest {
            sensor_id: "sensor_404".to_string(),
            sensor_name: None,
            location: None,
            temperature: Some(20.0),
            humidity: None,
            timestamp: None,
        })
        .await;

    assert!(
        matches!(result, Err(AppError::Validation(ref msg)) if msg == "Device with sensor ID 'sensor_404' not found")
    );
}

#[tokio::test]
async fn test_latest_without_readings_is_not_found() {
    let mut readings = MockSensorDataRepository::new();
    readings.expect_latest_by_device().returning(|_| Ok(None));

    let service = SensorDataManager::new(Arc::new(readings), Arc::new(MockDeviceRepository::new()));
    let result = service.latest_by_device(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

fn device_with_id(id: Uuid) -> Device {
    let mut device = device(Uuid::new_v4(), None);
    device.id = id;
    device
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_stats() {
    let mut houses = MockHouseRepository::new();
    houses.expect_count().returning(|| Ok(2));
    let mut rooms = MockRoomRepository::new();
    rooms.expect_count().returning(|| Ok(5));
    let mut devices = MockDeviceRepository::new();
    devices.expect_count().returning(|| Ok(8));
    devices.expect_count_active().returning(|| Ok(6));

    let service = DashboardManager::new(Arc::new(houses), Arc::new(rooms), Arc::new(devices));
    let stats = service.stats().await.unwrap();

    assert_eq!(stats.total_houses, 2);
    assert_eq!(stats.total_rooms, 5);
    assert_eq!(stats.total_devices, 8);
    assert_eq!(stats.active_devices, 6);
    assert_eq!(stats.inactive_devices, 2);
    assert_eq!(stats.active_device_percentage, 75.0);
}
