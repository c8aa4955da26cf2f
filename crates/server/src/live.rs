// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live queue streaming for display boards.
//!
//! This module provides read-only, non-authoritative queue change
//! notifications via WebSocket connections. Events represent facts
//! about what changed, not directives or domain logic.
//!
//! # Architecture
//!
//! - Events are broadcast to all connected clients
//! - Events are informational only and never authoritative
//! - No commands are executed over WebSocket connections
//! - Display boards must still query the HTTP board endpoints for
//!   authoritative data

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live queue event types.
///
/// These events mirror successful engine operations and are purely
/// informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A ticket was issued.
    TicketIssued {
        /// The service.
        service_id: i64,
        /// The ticket's display number.
        display_number: String,
        /// Tickets now waiting.
        waiting_count: u64,
    },
    /// A ticket was called to a window.
    TicketCalled {
        /// The service.
        service_id: i64,
        /// The ticket's display number.
        display_number: String,
        /// The window's human-facing name.
        window: String,
    },
    /// A ticket was completed.
    TicketCompleted {
        /// The service.
        service_id: i64,
        /// The ticket's display number.
        display_number: String,
    },
    /// A ticket left the queue (skipped or removed).
    TicketParked {
        /// The service.
        service_id: i64,
        /// The ticket's display number.
        display_number: String,
        /// The new status ("skipped" or "cancelled").
        status: String,
    },
    /// A ticket returned to the waiting queue.
    TicketRecalled {
        /// The service.
        service_id: i64,
        /// The ticket's display number.
        display_number: String,
    },
    /// A service's queue was paused or resumed.
    QueueToggled {
        /// The service.
        service_id: i64,
        /// Whether the queue now accepts tickets.
        is_active: bool,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
}

/// Broadcaster for live queue events.
///
/// A lightweight wrapper around `tokio::sync::broadcast` that allows
/// multiple WebSocket clients to receive queue change notifications.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    /// The broadcast channel sender.
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is silently dropped.
    /// This is non-blocking and will not wait for clients to receive
    /// the event.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                // No receivers, which is fine
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to the event stream.
    ///
    /// Returns a receiver that will receive all future events.
    /// Events sent before subscription are not received.
    fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles WebSocket upgrade requests for live event streaming.
///
/// # Arguments
///
/// * `ws` - WebSocket upgrade request
/// * `broadcaster` - The live event broadcaster from application state
///
/// # Returns
///
/// An HTTP response that upgrades the connection to WebSocket
pub(crate) async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(app_state): AxumState<crate::AppState>,
) -> Response {
    let broadcaster: Arc<LiveEventBroadcaster> = app_state.broadcaster;
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Handles an individual WebSocket connection.
///
/// Sends a connection confirmation, then streams all live events until
/// the client disconnects or an error occurs.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Client connected to live queue stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    // Send connection confirmation
    let connected_event = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    // Task for sending events to the client
    let mut send_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        // Client disconnected
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize live event");
                }
            }
        }
    });

    // Task for receiving messages from the client (though we don't expect any)
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    // We don't process commands over WebSocket
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Ping/pong handled automatically by Axum
                }
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live queue stream");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_creation() {
        let broadcaster = LiveEventBroadcaster::new();
        assert_eq!(broadcaster.tx.receiver_count(), 0);
    }

    #[test]
    fn test_broadcast_no_receivers() {
        let broadcaster = LiveEventBroadcaster::new();
        // Should not panic when no receivers
        broadcaster.broadcast(&LiveEvent::QueueToggled {
            service_id: 1,
            is_active: false,
        });
    }

    #[test]
    fn test_broadcast_with_receiver() {
        let broadcaster = LiveEventBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast(&LiveEvent::TicketCompleted {
            service_id: 1,
            display_number: String::from("C001"),
        });

        match rx.try_recv() {
            Ok(LiveEvent::TicketCompleted { service_id: 1, .. }) => {}
            other => panic!("Expected TicketCompleted, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_receivers() {
        let broadcaster = LiveEventBroadcaster::new();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        broadcaster.broadcast(&LiveEvent::TicketCalled {
            service_id: 1,
            display_number: String::from("C002"),
            window: String::from("Window 1"),
        });

        // Both receivers should get the event
        assert!(matches!(rx1.try_recv(), Ok(LiveEvent::TicketCalled { .. })));
        assert!(matches!(rx2.try_recv(), Ok(LiveEvent::TicketCalled { .. })));
    }

    #[test]
    fn test_event_serialization() {
        let event = LiveEvent::TicketIssued {
            service_id: 2,
            display_number: String::from("P014"),
            waiting_count: 7,
        };

        let json = serde_json::to_string(&event).expect("Failed to serialize");
        let deserialized: LiveEvent = serde_json::from_str(&json).expect("Failed to deserialize");

        match deserialized {
            LiveEvent::TicketIssued {
                service_id,
                display_number,
                waiting_count,
            } => {
                assert_eq!(service_id, 2);
                assert_eq!(display_number, "P014");
                assert_eq!(waiting_count, 7);
            }
            _ => panic!("Wrong event type"),
        }
    }
}
