//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::{HealthResponse, ServiceHealth};
use crate::handlers::sensor_data_handler::CleanupResponse;
use domain::{
    CreateDevice, CreateHouse, CreateRoom, CreateSensorData, DashboardStats, DeviceResponse,
    DeviceType, HouseResponse, HouseWithRooms, MqttSensorDataRequest, RoomResponse,
    RoomWithDevices, SensorDataAggregate, SensorDataResponse, UpdateDevice, UpdateHouse,
    UpdateRoom, UpdateSensorData,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    info(title = "IoT Simulator Subscriber API"),
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::house_handler::list_houses,
        crate::handlers::house_handler::get_house,
        crate::handlers::house_handler::get_house_rooms,
        crate::handlers::house_handler::create_house,
        crate::handlers::house_handler::update_house,
        crate::handlers::house_handler::delete_house,
        crate::handlers::room_handler::list_rooms,
        crate::handlers::room_handler::get_room,
        crate::handlers::room_handler::get_room_devices,
        crate::handlers::room_handler::create_room,
        crate::handlers::room_handler::update_room,
        crate::handlers::room_handler::delete_room,
        crate::handlers::device_handler::list_devices,
        crate::handlers::device_handler::get_device,
        crate::handlers::device_handler::create_device,
        crate::handlers::device_handler::update_device,
        crate::handlers::device_handler::delete_device,
        crate::handlers::sensor_data_handler::list_sensor_data,
        crate::handlers::sensor_data_handler::get_sensor_data,
        crate::handlers::sensor_data_handler::list_device_data,
        crate::handlers::sensor_data_handler::list_device_data_in_range,
        crate::handlers::sensor_data_handler::latest_device_data,
        crate::handlers::sensor_data_handler::aggregate_device_data,
        crate::handlers::sensor_data_handler::create_sensor_data,
        crate::handlers::sensor_data_handler::create_from_mqtt,
        crate::handlers::sensor_data_handler::update_sensor_data,
        crate::handlers::sensor_data_handler::delete_sensor_data,
        crate::handlers::sensor_data_handler::cleanup_sensor_data,
        crate::handlers::dashboard_handler::get_stats,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceHealth,
            HouseResponse,
            HouseWithRooms,
            CreateHouse,
            UpdateHouse,
            RoomResponse,
            RoomWithDevices,
            CreateRoom,
            UpdateRoom,
            DeviceType,
            DeviceResponse,
            CreateDevice,
            UpdateDevice,
            SensorDataResponse,
            SensorDataAggregate,
            CreateSensorData,
            UpdateSensorData,
            MqttSensorDataRequest,
            CleanupResponse,
            DashboardStats,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Houses", description = "House management"),
        (name = "Rooms", description = "Rooms inside houses"),
        (name = "Devices", description = "IoT devices installed in rooms"),
        (name = "Sensor Data", description = "Stored readings and their statistics"),
        (name = "Dashboard", description = "Fleet-wide counters"),
    )
)]
pub struct ApiDoc;
