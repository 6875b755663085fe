// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live lifecycle events for auction room displays.
//!
//! Events are read-only notifications of lifecycle changes that have
//! already committed. They are never authoritative: clients that need
//! the current lot or price still ask the HTTP API.
//!
//! # Architecture
//!
//! - Events are broadcast to all connected clients
//! - No commands are accepted over the WebSocket
//! - A dropped connection loses nothing the client cannot re-read

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
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use veilingklok_api::ProductResponse;
use veilingklok_domain::{AccountId, Money, ProductId, format_timestamp};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// Lifecycle event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp.
        timestamp: String,
    },
    /// Today's first lots came on the clock.
    AuctionsStarted {
        /// The activated products.
        product_ids: Vec<ProductId>,
    },
    /// Every active lot was taken off the clock.
    AuctionsPaused {
        /// The paused products.
        product_ids: Vec<ProductId>,
    },
    /// Paused lots were returned to the schedule.
    AuctionsResumed {
        /// The rescheduled products.
        product_ids: Vec<ProductId>,
    },
    /// A location moved on to its next lot.
    LotAdvanced {
        /// The location code.
        location: String,
        /// The lot now on the clock.
        product_id: ProductId,
    },
    /// An idle location brought up its next lot.
    LotOpened {
        /// The location code.
        location: String,
        /// The lot now on the clock.
        product_id: ProductId,
    },
    /// A lot was sold.
    LotSold {
        /// The location code.
        location: String,
        /// The sold product.
        product_id: ProductId,
        /// The buying account.
        buyer_id: AccountId,
        /// The price the clock was stopped at.
        sale_price: Money,
    },
    /// A product was queued for an auction day.
    ProductScheduled {
        /// The scheduled product.
        product_id: ProductId,
        /// The location code.
        location: String,
        /// The auction date.
        date: String,
    },
}

impl LiveEvent {
    /// Builds the event for a completed sale.
    ///
    /// Returns `None` if `sold` does not carry a buyer and price.
    #[must_use]
    pub fn lot_sold(sold: &ProductResponse) -> Option<Self> {
        Some(Self::LotSold {
            location: sold.location.clone(),
            product_id: sold.product_id,
            buyer_id: sold.buyer_id?,
            sale_price: sold.sale_price?,
        })
    }
}

/// Collects product ids for list events.
#[must_use]
pub fn product_ids(products: &[ProductResponse]) -> Vec<ProductId> {
    products.iter().map(|p| p.product_id).collect()
}

/// Broadcaster for live lifecycle events.
///
/// A lightweight wrapper around `tokio::sync::broadcast` so that many
/// WebSocket clients receive the same notifications.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
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
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to events sent from now on.
    fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler for GET `/live`.
///
/// Upgrades to a WebSocket, confirms the connection and streams every
/// later lifecycle event until the client leaves.
#[allow(clippy::unused_async)]
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Waits for the next event, skipping past any the subscriber fell behind on.
///
/// Returns `None` once the broadcaster is gone.
async fn next_event(rx: &mut broadcast::Receiver<LiveEvent>) -> Option<LiveEvent> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Live event subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event = LiveEvent::Connected {
        timestamp: format_timestamp(OffsetDateTime::now_utc()),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = next_event(&mut rx).await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize live event");
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

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

    info!("Client disconnected from live event stream");
}
