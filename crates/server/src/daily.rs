// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Daily auction start.
//!
//! When enabled, today's lots are brought onto the clock at startup and
//! again at every UTC midnight.

use std::time::Duration;
use time::OffsetDateTime;
use tracing::{error, info};
use veilingklok_api::{ApiError, ProductResponse, start_auctions};

use crate::AppState;
use crate::live::{LiveEvent, product_ids};

/// Runs the daily start until the task is aborted.
pub async fn run_daily_start(state: AppState) {
    loop {
        start_todays_auctions(&state).await;

        let wait: Duration = until_next_midnight(OffsetDateTime::now_utc());
        info!(wait_secs = wait.as_secs(), "Next daily auction start scheduled");
        tokio::time::sleep(wait).await;
    }
}

/// Starts today's auctions once, logging the outcome.
///
/// Returns the activated lots.
pub async fn start_todays_auctions(state: &AppState) -> Vec<ProductResponse> {
    let mut persistence = state.persistence.lock().await;
    let result = start_auctions(
        &mut persistence,
        state.clock.as_ref(),
        OffsetDateTime::now_utc(),
    );
    drop(persistence);

    match result {
        Ok(started) => {
            info!(count = started.len(), "Daily auction start");
            state.live.broadcast(&LiveEvent::AuctionsStarted {
                product_ids: product_ids(&started),
            });
            started
        }
        Err(ApiError::NotFound { message }) => {
            info!(%message, "Daily auction start found nothing to start");
            Vec::new()
        }
        Err(e) => {
            error!(error = %e, "Daily auction start failed");
            Vec::new()
        }
    }
}

/// Time from `now` until the next UTC midnight.
#[must_use]
pub fn until_next_midnight(now: OffsetDateTime) -> Duration {
    let utc: OffsetDateTime = now.to_offset(time::UtcOffset::UTC);
    utc.date()
        .next_day()
        .map(|tomorrow| tomorrow.midnight().assume_utc() - utc)
        .and_then(|remaining| Duration::try_from(remaining).ok())
        .unwrap_or(Duration::ZERO)
}
