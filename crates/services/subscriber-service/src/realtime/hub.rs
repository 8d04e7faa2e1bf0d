//! Group hub fanning ingest events out to WebSocket connections.
//!
//! Every connection holds a receiver of one broadcast channel and keeps
//! only the messages addressed to groups it joined. Slow connections lag
//! and lose messages; nothing upstream ever waits on them.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use domain::{EVENT_DEVICE_STATUS_UPDATE, EVENT_SENSOR_DATA_UPDATE};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Group of every connection watching a room.
pub fn room_group(room_id: impl std::fmt::Display) -> String {
    format!("Room-{}", room_id)
}

/// Group of every connection watching a house.
pub fn house_group(house_id: impl std::fmt::Display) -> String {
    format!("House-{}", house_id)
}

/// Pushed after a reading has been stored
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDataUpdate {
    pub device_id: Uuid,
    pub room_id: Option<Uuid>,
    pub house_id: Option<Uuid>,
    pub sensor_id: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub device_name: String,
    pub room_name: Option<String>,
}

/// Pushed when a reading arrives for an inactive device
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusUpdate {
    pub device_id: Uuid,
    pub room_id: Option<Uuid>,
    pub house_id: Option<Uuid>,
    pub sensor_id: String,
    pub device_name: String,
    pub room_name: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub timestamp: DateTime<Utc>,
}

/// Payload of a hub frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HubEvent {
    SensorData(SensorDataUpdate),
    DeviceStatus(DeviceStatusUpdate),
}

impl HubEvent {
    /// Event name clients dispatch on
    pub fn name(&self) -> &'static str {
        match self {
            HubEvent::SensorData(_) => EVENT_SENSOR_DATA_UPDATE,
            HubEvent::DeviceStatus(_) => EVENT_DEVICE_STATUS_UPDATE,
        }
    }
}

#[derive(Serialize)]
struct Frame<'a> {
    event: &'a str,
    group: &'a str,
    data: &'a HubEvent,
}

/// A serialized frame together with the group it is addressed to.
#[derive(Debug, Clone)]
pub struct HubMessage {
    pub group: String,
    pub frame: Arc<str>,
}

impl HubMessage {
    pub fn new(group: &str, event: &HubEvent) -> serde_json::Result<Self> {
        let frame = serde_json::to_string(&Frame {
            event: event.name(),
            group,
            data: event,
        })?;

        Ok(Self {
            group: group.to_string(),
            frame: frame.into(),
        })
    }
}

/// Sink for hub events, abstracted for the ingest path.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Notifier: Send + Sync {
    /// Deliver an event to every connection in `group`
    fn notify(&self, group: &str, event: &HubEvent);
}

/// Broadcast-channel backed hub shared by the listener and the endpoint.
#[derive(Clone)]
pub struct SensorHub {
    sender: broadcast::Sender<HubMessage>,
}

impl SensorHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receiver for a new connection
    pub fn subscribe(&self) -> broadcast::Receiver<HubMessage> {
        self.sender.subscribe()
    }

    /// Number of open connections
    pub fn connection_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Notifier for SensorHub {
    fn notify(&self, group: &str, event: &HubEvent) {
        let message = match HubMessage::new(group, event) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("Failed to encode {} for {}: {}", event.name(), group, e);
                return;
            }
        };

        match self.sender.send(message) {
            Ok(receivers) => {
                tracing::debug!("Sent {} to {} ({} connections)", event.name(), group, receivers)
            }
            Err(_) => tracing::debug!("No hub connections, dropped {} for {}", event.name(), group),
        }
    }
}

/// Group membership command sent by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupAction {
    JoinRoomGroup,
    LeaveRoomGroup,
    JoinHouseGroup,
    LeaveHouseGroup,
}

/// `{"action":"joinRoomGroup","id":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientCommand {
    pub action: GroupAction,
    pub id: String,
}

impl ClientCommand {
    /// Group the command refers to
    pub fn group(&self) -> String {
        let id = self.id.trim();
        match self.action {
            GroupAction::JoinRoomGroup | GroupAction::LeaveRoomGroup => room_group(id),
            GroupAction::JoinHouseGroup | GroupAction::LeaveHouseGroup => house_group(id),
        }
    }

    fn joins(&self) -> bool {
        matches!(
            self.action,
            GroupAction::JoinRoomGroup | GroupAction::JoinHouseGroup
        )
    }
}

/// Groups one connection has joined.
#[derive(Debug, Default)]
pub struct ConnectionGroups {
    groups: HashSet<String>,
}

impl ConnectionGroups {
    /// Apply a command; returns the affected group, or None for a blank id.
    pub fn apply(&mut self, command: &ClientCommand) -> Option<String> {
        if domain::is_blank(&command.id) {
            return None;
        }

        let group = command.group();
        if command.joins() {
            self.groups.insert(group.clone());
        } else {
            self.groups.remove(&group);
        }
        Some(group)
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Number of joined groups
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }
}
