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

mod clock;
mod error;
mod location;
mod money;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use clock::ClockPricing;
pub use error::DomainError;
pub use location::Location;
pub use money::Money;
pub use status::{ProductStatus, can_transition_codes};
pub use types::{
    Account, AccountId, AccountRole, NewProduct, Product, ProductId, Sale, StatusTransition,
};
pub use validation::{
    format_date, format_timestamp, parse_date, validate_account_name, validate_new_product,
};
