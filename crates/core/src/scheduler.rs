// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch status operations driven by the calendar.

use crate::error::{CoreError, NO_AUCTIONS_TODAY};
use crate::store::LotStore;
use crate::transition::transition;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};
use veilingklok_domain::{
    Location, Product, ProductId, ProductStatus, StatusTransition, format_timestamp,
};

/// Brings today's scheduled lots onto the clock.
///
/// `now` is converted to UTC and only its calendar date is compared with
/// each product's scheduled date.
///
/// A location holds at most one active lot, so for every location without
/// an active lot the lowest-id product scheduled for today becomes active.
/// Remaining matches stay scheduled until the location advances.
///
/// # Returns
///
/// The products that became active. The list is empty when every location
/// with a match already has a lot on the clock.
///
/// # Errors
///
/// - `NotFound` (`"No auctions scheduled for today"`) if nothing is scheduled for today
/// - `Conflict` if another request changed a candidate first
pub fn start_auctions<S: LotStore>(
    store: &mut S,
    now: OffsetDateTime,
) -> Result<Vec<Product>, CoreError> {
    let today: Date = now.to_offset(time::UtcOffset::UTC).date();
    let candidates: Vec<Product> = store.products_with_status_on(ProductStatus::Scheduled, today)?;

    if candidates.is_empty() {
        info!(%today, "No auctions scheduled for today");
        return Err(CoreError::not_found(NO_AUCTIONS_TODAY));
    }

    let at: String = format_timestamp(now);
    let mut activated: Vec<Product> = Vec::new();

    for location in Location::ALL {
        let Some(first) = candidates.iter().find(|p| p.location == location) else {
            continue;
        };

        if !store.products_at(location, ProductStatus::Active)?.is_empty() {
            debug!(%location, "Location already has an active lot, leaving queue scheduled");
            continue;
        }

        activated.push(transition(
            store,
            first,
            ProductStatus::Active,
            "start_auctions",
            &at,
        )?);
    }

    info!(
        %today,
        scheduled = candidates.len(),
        activated = activated.len(),
        "Started auctions"
    );
    Ok(activated)
}

/// Takes every active lot off the clock.
///
/// An empty result is a successful no-op.
///
/// # Errors
///
/// Returns `Conflict` if another request changed an active lot first.
pub fn pause_auctions<S: LotStore>(
    store: &mut S,
    now: OffsetDateTime,
) -> Result<Vec<Product>, CoreError> {
    move_all(
        store,
        ProductStatus::Active,
        ProductStatus::Paused,
        "pause_auctions",
        now,
    )
}

/// Returns every paused lot to the schedule.
///
/// Paused lots go back to `Scheduled`, never directly to `Active`; they
/// come back on the clock through `start_auctions`, `advance` or `open_lot`.
///
/// # Errors
///
/// Returns `Conflict` if another request changed a paused lot first.
pub fn resume_auctions<S: LotStore>(
    store: &mut S,
    now: OffsetDateTime,
) -> Result<Vec<Product>, CoreError> {
    move_all(
        store,
        ProductStatus::Paused,
        ProductStatus::Scheduled,
        "resume_auctions",
        now,
    )
}

/// Returns true if any lot is paused.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn has_paused_auctions<S: LotStore>(store: &mut S) -> Result<bool, CoreError> {
    store.any_with_status(ProductStatus::Paused)
}

/// Queues a registered product for auction on `date`.
///
/// `location` moves the product to another hall; `None` keeps its current one.
///
/// # Errors
///
/// - `NotFound` if the product does not exist
/// - `Conflict` if the product is not `Registered`, or another request
///   changed it first
pub fn schedule_product<S: LotStore>(
    store: &mut S,
    product_id: ProductId,
    date: Date,
    location: Option<Location>,
    now: OffsetDateTime,
) -> Result<Product, CoreError> {
    let product: Product = store
        .find_product(product_id)?
        .ok_or_else(|| CoreError::not_found(format!("Product {product_id} not found")))?;

    if !product.status.can_transition(ProductStatus::Scheduled) {
        return Err(CoreError::conflict(format!(
            "Product {product_id} is {} and cannot be scheduled",
            product.status.as_str()
        )));
    }

    let location: Location = location.unwrap_or(product.location);
    if !store.schedule(product_id, date, location)? {
        return Err(CoreError::conflict(format!(
            "Product {product_id} is no longer registered"
        )));
    }

    store.record_transition(&StatusTransition::new(
        product_id,
        Some(product.status),
        ProductStatus::Scheduled,
        "schedule_product",
        format_timestamp(now),
    ))?;

    info!(product_id, %location, %date, "Scheduled product");

    Ok(Product {
        status: ProductStatus::Scheduled,
        scheduled_date: Some(date),
        location,
        ..product
    })
}

fn move_all<S: LotStore>(
    store: &mut S,
    from: ProductStatus,
    to: ProductStatus,
    operation: &str,
    now: OffsetDateTime,
) -> Result<Vec<Product>, CoreError> {
    let at: String = format_timestamp(now);
    let mut moved: Vec<Product> = Vec::new();

    for product in store.products_with_status(from)? {
        moved.push(transition(store, &product, to, operation, &at)?);
    }

    info!(
        operation,
        count = moved.len(),
        from = from.as_str(),
        to = to.as_str(),
        "Batch status change complete"
    );
    Ok(moved)
}
