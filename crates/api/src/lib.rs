// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Veilingklok auction.
//!
//! Converts wire-level requests into domain values, runs them against the
//! persistence layer and maps every failure onto the stable [`ApiError`]
//! contract. Transport (HTTP, WebSocket) lives in the server crate.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, INTERNAL_ERROR_MESSAGE, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    advance, create_account, current_lot, elapsed_ms, get_product, get_product_history,
    has_paused_auctions, list_products, open_lot, parse_location, pause_auctions, purchase,
    register_product, reset_clock, resume_auctions, schedule_product, start_auctions,
};
pub use request_response::{
    AccountResponse, ClockResetResponse, CreateAccountRequest, CreateProductRequest,
    CurrentLotResponse, HasPausedAuctionsResponse, ListProductsRequest, ProductResponse,
    PurchaseRequest, ScheduleProductRequest, StatusTransitionResponse,
};
