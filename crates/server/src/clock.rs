// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-location auction clocks.
//!
//! The broadcaster holds the instant each location's clock last started and
//! publishes a tick for every location on a fixed interval. Ticks carry the
//! start timestamp and elapsed time, so clients derive the current price
//! themselves. The state lives in memory only and restarts with the process.
//!
//! # Locking
//!
//! `reset_location` and the tick loop share one `std::sync::Mutex`. The lock
//! is never held across an `.await`, and a poisoned lock is recovered since
//! the map is valid after any partial update.

use axum::{
    extract::{
        Query, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use veilingklok::LotClock;
use veilingklok_api::{elapsed_ms, parse_location};
use veilingklok_domain::{Location, format_timestamp};

use crate::HttpError;

/// Ticks buffered per subscriber. Four locations at the default interval
/// give a few seconds of slack before a slow client starts lagging.
const TICK_BUFFER_SIZE: usize = 256;

/// One location's clock position at a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTick {
    pub location: Location,
    /// When the current lot came on the clock.
    pub start_timestamp: String,
    pub elapsed_ms: u64,
}

/// Process-wide clock state and tick fan-out.
pub struct ClockBroadcaster {
    started: Mutex<HashMap<Location, OffsetDateTime>>,
    tx: broadcast::Sender<ClockTick>,
}

impl ClockBroadcaster {
    /// Creates a broadcaster with every location's clock started at `now`.
    #[must_use]
    pub fn new(now: OffsetDateTime) -> Self {
        let (tx, _rx) = broadcast::channel(TICK_BUFFER_SIZE);
        Self {
            started: Mutex::new(Location::ALL.into_iter().map(|loc| (loc, now)).collect()),
            tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Location, OffsetDateTime>> {
        self.started.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restarts the clock at `location` from `at`.
    pub fn reset_at(&self, location: Location, at: OffsetDateTime) {
        self.lock().insert(location, at);
        debug!(%location, "Clock reset");
    }

    /// Returns every location's clock position at `now`, in location order.
    #[must_use]
    pub fn snapshot(&self, now: OffsetDateTime) -> Vec<ClockTick> {
        let started = self.lock();
        Location::ALL
            .into_iter()
            .filter_map(|location| {
                started.get(&location).map(|&at| ClockTick {
                    location,
                    start_timestamp: format_timestamp(at),
                    elapsed_ms: elapsed_ms(at, now),
                })
            })
            .collect()
    }

    /// Publishes one tick per location. Returns the number of subscribers.
    pub fn tick(&self, now: OffsetDateTime) -> usize {
        let mut receivers: usize = 0;
        for tick in self.snapshot(now) {
            // No subscribers is normal between client connections
            if let Ok(count) = self.tx.send(tick) {
                receivers = count;
            }
        }
        receivers
    }

    fn subscribe(&self) -> broadcast::Receiver<ClockTick> {
        self.tx.subscribe()
    }
}

impl LotClock for ClockBroadcaster {
    fn reset_location(&self, location: Location) {
        self.reset_at(location, OffsetDateTime::now_utc());
    }

    fn started_at(&self, location: Location) -> Option<OffsetDateTime> {
        self.lock().get(&location).copied()
    }
}

/// Publishes ticks on `period` until the task is aborted.
pub async fn run_tick_loop(clock: Arc<ClockBroadcaster>, period: Duration) {
    info!(period_ms = period.as_millis(), "Starting clock tick loop");
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        clock.tick(OffsetDateTime::now_utc());
    }
}

/// Query parameters for the clock stream.
#[derive(Debug, Default, Deserialize)]
pub struct ClockQuery {
    /// Comma-separated location codes. All locations when absent.
    pub locations: Option<String>,
}

/// Parses a `?locations=A,B` filter.
///
/// # Errors
///
/// Returns an `HttpError` (400) for an unknown location code.
pub fn parse_location_filter(raw: Option<&str>) -> Result<Vec<Location>, HttpError> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(Location::ALL.to_vec());
    };

    let mut locations: Vec<Location> = Vec::new();
    for code in raw.split(',') {
        let location: Location = parse_location(code)?;
        if !locations.contains(&location) {
            locations.push(location);
        }
    }
    Ok(locations)
}

/// Handler for GET `/clock`.
///
/// Upgrades to a WebSocket that streams ticks for the requested locations.
///
/// # Errors
///
/// Returns 400 if the location filter names an unknown location.
#[allow(clippy::unused_async)]
pub async fn clock_ticks_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ClockQuery>,
    AxumState(clock): AxumState<Arc<ClockBroadcaster>>,
) -> Result<Response, HttpError> {
    let locations: Vec<Location> = parse_location_filter(query.locations.as_deref())?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, clock, locations)))
}

async fn handle_socket(socket: WebSocket, clock: Arc<ClockBroadcaster>, locations: Vec<Location>) {
    info!(?locations, "Client subscribed to clock ticks");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<ClockTick> = clock.subscribe();

    let mut send_task = tokio::spawn(async move {
        loop {
            let tick: ClockTick = match rx.recv().await {
                Ok(tick) => tick,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Clock subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            if !locations.contains(&tick.location) {
                continue;
            }
            match serde_json::to_string(&tick) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize clock tick");
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Ignoring message on clock stream");
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    debug!(?e, "Clock stream receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Client left clock stream");
}
