//! Real-time push channel: group hub and its WebSocket endpoint.

mod hub;
mod ws;

pub use hub::{
    house_group, room_group, ClientCommand, ConnectionGroups, DeviceStatusUpdate, GroupAction,
    HubEvent, HubMessage, Notifier, SensorDataUpdate, SensorHub,
};
pub use ws::sensor_data_hub;

#[cfg(any(test, feature = "test-utils"))]
pub use hub::MockNotifier;
