// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-location active lot selection.
//!
//! The lot on the clock at a location is replaced by the earliest scheduled
//! lot for that location that is due. A lot is due once its scheduled date
//! is today or earlier, so lots resumed from an earlier day stay eligible.
//! "Earliest" is the lowest product id, which is the order in which lots
//! were registered.

use crate::error::{CoreError, NO_ACTIVE_PRODUCT, NO_NEXT_PRODUCT};
use crate::store::LotStore;
use crate::transition::transition;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::{error, info};
use veilingklok_domain::{Location, Product, ProductStatus, format_timestamp};

/// Closes the current lot at `location` and brings up the next one.
///
/// The current lot was not sold (a sale moves it to `Sold`, leaving no
/// active lot), so it is parked as `Paused` and can be resumed later.
///
/// Both lookups happen before any write, so a missing successor leaves the
/// current lot on the clock. The caller resets the location's clock once
/// the surrounding transaction commits.
///
/// # Errors
///
/// - `NotFound` (`"No active product found"`) if no lot is on the clock
/// - `NotFound` (`"No next product available"`) if nothing here is due today
/// - `Conflict` if another request moved either lot first
pub fn advance<S: LotStore>(
    store: &mut S,
    location: Location,
    now: OffsetDateTime,
) -> Result<Product, CoreError> {
    let current: Product = current_lot(store, location)?
        .ok_or_else(|| CoreError::not_found(NO_ACTIVE_PRODUCT))?;
    let next: Product = next_lot(store, location, now)?;

    let at: String = format_timestamp(now);
    transition(store, &current, ProductStatus::Paused, "advance", &at)?;
    let activated: Product = transition(store, &next, ProductStatus::Active, "advance", &at)?;

    info!(
        %location,
        closed = current.product_id,
        opened = activated.product_id,
        "Advanced lot"
    );
    Ok(activated)
}

/// Brings up the next lot at a location that has none on the clock.
///
/// Used after a sale, which leaves the location idle.
///
/// # Errors
///
/// - `LocationBusy` if a lot is already on the clock
/// - `NotFound` (`"No next product available"`) if nothing here is due today
/// - `Conflict` if another request took the lot first
pub fn open_lot<S: LotStore>(
    store: &mut S,
    location: Location,
    now: OffsetDateTime,
) -> Result<Product, CoreError> {
    if current_lot(store, location)?.is_some() {
        return Err(CoreError::LocationBusy { location });
    }

    let next: Product = next_lot(store, location, now)?;
    let activated: Product = transition(
        store,
        &next,
        ProductStatus::Active,
        "open_lot",
        &format_timestamp(now),
    )?;

    info!(%location, opened = activated.product_id, "Opened lot");
    Ok(activated)
}

/// Returns the lot on the clock at `location`, if any.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn current_lot<S: LotStore>(
    store: &mut S,
    location: Location,
) -> Result<Option<Product>, CoreError> {
    let mut active: Vec<Product> = store.products_at(location, ProductStatus::Active)?;
    if active.len() > 1 {
        // The store's uniqueness guarantee has been bypassed
        error!(
            %location,
            count = active.len(),
            "More than one active lot at location"
        );
    }
    Ok(if active.is_empty() {
        None
    } else {
        Some(active.remove(0))
    })
}

fn next_lot<S: LotStore>(
    store: &mut S,
    location: Location,
    now: OffsetDateTime,
) -> Result<Product, CoreError> {
    let today: Date = now.to_offset(UtcOffset::UTC).date();
    store
        .products_due_at(location, ProductStatus::Scheduled, today)?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::not_found(NO_NEXT_PRODUCT))
}
