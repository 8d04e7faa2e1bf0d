//! WebSocket endpoint of the sensor hub.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::hub::{ClientCommand, ConnectionGroups, HubMessage, SensorHub};
use crate::state::AppState;

/// Upgrade to a hub connection
pub async fn sensor_data_hub(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| serve_connection(socket, hub))
}

/// What a connection does with one item from the hub channel
#[derive(Debug, PartialEq)]
enum Delivery {
    /// Forward this frame to the client
    Send(String),
    /// Not addressed to this connection, or already lost to lag
    Skip,
    /// Hub is gone
    Close,
}

fn route_update(groups: &ConnectionGroups, update: Result<HubMessage, RecvError>) -> Delivery {
    match update {
        Ok(message) if groups.contains(&message.group) => Delivery::Send(message.frame.to_string()),
        Ok(_) => Delivery::Skip,
        Err(RecvError::Lagged(skipped)) => {
            warn!("Hub connection lagging, skipped {} messages", skipped);
            Delivery::Skip
        }
        Err(RecvError::Closed) => Delivery::Close,
    }
}

async fn serve_connection(socket: WebSocket, hub: SensorHub) {
    let (mut outgoing, mut incoming) = socket.split();
    let mut updates = hub.subscribe();
    let mut groups = ConnectionGroups::default();
    info!("Hub connection opened ({} open)", hub.connection_count());

    loop {
        tokio::select! {
            received = incoming.next() => match received {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => match groups.apply(&command) {
                        Some(group) => {
                            debug!("{:?} {} ({} groups joined)", command.action, group, groups.len())
                        }
                        None => debug!("Ignored {:?} without id", command.action),
                    },
                    Err(e) => debug!("Ignored hub command {}: {}", text, e),
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("Hub connection error: {}", e);
                    break;
                }
            },
            update = updates.recv() => match route_update(&groups, update) {
                Delivery::Send(frame) => {
                    if outgoing.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                Delivery::Skip => {}
                Delivery::Close => break,
            },
        }
    }

    info!("Hub connection closed");
}
