// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! Auction lifecycle engine.
//!
//! Owns product status transitions and per-location active-lot selection.
//! Operations are generic over a [`LotStore`]; callers wrap each operation
//! in a single store transaction and reset the [`LotClock`] afterwards.

mod error;
mod lot_selector;
mod purchase;
mod scheduler;
mod store;
mod transition;

#[cfg(test)]
mod tests;

pub use error::{CoreError, NO_ACTIVE_PRODUCT, NO_AUCTIONS_TODAY, NO_NEXT_PRODUCT};
pub use lot_selector::{advance, current_lot, open_lot};
pub use purchase::{purchase, resolve_buyer};
pub use scheduler::{
    has_paused_auctions, pause_auctions, resume_auctions, schedule_product, start_auctions,
};
pub use store::{LotClock, LotStore};
