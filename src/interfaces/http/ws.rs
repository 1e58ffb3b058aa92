//! WebSocket handler for the event push stream
//!
//! Streams event occurrences delivered to the push-stream sink out to UI
//! clients in real time.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::notifications::EventOccurrence;

use super::router::ApiState;

/// Query parameters for filtering the stream
#[derive(Debug, Deserialize)]
pub struct EventStreamFilter {
    /// Event names to include (comma-separated, optional)
    pub events: Option<String>,
}

impl EventStreamFilter {
    pub fn matches(&self, occurrence: &EventOccurrence) -> bool {
        match &self.events {
            Some(names) => names
                .split(',')
                .map(|s| s.trim())
                .any(|name| name == occurrence.name),
            None => true,
        }
    }
}

/// WebSocket upgrade handler for `/events/stream`
pub async fn ws_events_handler(
    ws: WebSocketUpgrade,
    State(state): State<ApiState>,
    Query(filter): Query<EventStreamFilter>,
) -> impl IntoResponse {
    info!(events = ?filter.events, "New event stream connection");
    ws.on_upgrade(move |socket| handle_event_socket(socket, state, filter))
}

async fn handle_event_socket(socket: WebSocket, state: ApiState, filter: EventStreamFilter) {
    let (mut sender, mut receiver) = socket.split();
    let mut stream = state.push.subscribe();

    let welcome = serde_json::json!({
        "type": "connected",
        "message": "Connected to event stream",
        "filter": { "events": filter.events.clone() }
    });
    if let Err(e) = sender.send(Message::Text(welcome.to_string().into())).await {
        error!("Failed to send welcome message: {}", e);
        return;
    }

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Event stream client sent close");
                        break;
                    }
                    Some(Ok(_)) => {
                        debug!("Ignoring client message");
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                }
            }

            occurrence = stream.recv() => {
                match occurrence {
                    Ok(occurrence) => {
                        if !filter.matches(&occurrence) {
                            continue;
                        }
                        match serde_json::to_string(&occurrence) {
                            Ok(json) => {
                                if let Err(e) = sender.send(Message::Text(json.into())).await {
                                    error!("Failed to send occurrence: {}", e);
                                    break;
                                }
                            }
                            Err(e) => {
                                error!("Failed to serialize occurrence: {}", e);
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!(missed = count, "Event stream client lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        warn!("Push stream closed");
                        break;
                    }
                }
            }
        }
    }

    info!("Event stream client disconnected");
}
