// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MemoryStore, RacingStore, TODAY, TOMORROW, now};
use time::macros::date;
use crate::{CoreError, NO_ACTIVE_PRODUCT, NO_NEXT_PRODUCT, advance, current_lot, open_lot};
use veilingklok_domain::{Location, ProductStatus};

fn location_b_queue() -> MemoryStore {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::B, ProductStatus::Active, Some(TODAY));
    store.add(2, Location::B, ProductStatus::Scheduled, Some(TODAY));
    store.add(3, Location::B, ProductStatus::Scheduled, Some(TODAY));
    store
}

#[test]
fn test_advance_activates_lowest_scheduled_id() {
    let mut store = location_b_queue();

    let next = advance(&mut store, Location::B, now()).unwrap();

    assert_eq!(next.product_id, 2);
    assert_eq!(next.status, ProductStatus::Active);
    assert_eq!(store.status_of(1), ProductStatus::Paused);
    assert_eq!(store.status_of(3), ProductStatus::Scheduled);
    assert_eq!(store.active_at(Location::B), vec![2]);
}

#[test]
fn test_advance_ignores_other_locations() {
    let mut store = location_b_queue();
    store.add(0, Location::A, ProductStatus::Scheduled, Some(TODAY));

    let next = advance(&mut store, Location::B, now()).unwrap();

    assert_eq!(next.product_id, 2);
    assert_eq!(store.status_of(0), ProductStatus::Scheduled);
}

#[test]
fn test_advance_without_active_lot() {
    let mut store = MemoryStore::with_accounts();
    store.add(2, Location::B, ProductStatus::Scheduled, Some(TODAY));

    let err = advance(&mut store, Location::B, now()).unwrap_err();

    assert_eq!(err.to_string(), NO_ACTIVE_PRODUCT);
    assert_eq!(store.status_of(2), ProductStatus::Scheduled);
}

#[test]
fn test_advance_without_successor_leaves_current_active() {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::B, ProductStatus::Active, Some(TODAY));

    let err = advance(&mut store, Location::B, now()).unwrap_err();

    assert_eq!(err, CoreError::not_found(NO_NEXT_PRODUCT));
    assert_eq!(err.to_string(), "No next product available");
    assert_eq!(store.status_of(1), ProductStatus::Active);
    assert!(store.history.is_empty());
}

#[test]
fn test_advance_skips_lot_scheduled_for_later_date() {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::B, ProductStatus::Active, Some(TODAY));
    store.add(2, Location::B, ProductStatus::Scheduled, Some(date!(2026 - 04 - 30)));
    store.add(3, Location::B, ProductStatus::Scheduled, Some(TODAY));

    let next = advance(&mut store, Location::B, now()).unwrap();

    assert_eq!(next.product_id, 3);
    assert_eq!(store.status_of(2), ProductStatus::Scheduled);
}

#[test]
fn test_advance_with_only_future_successor() {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::B, ProductStatus::Active, Some(TODAY));
    store.add(2, Location::B, ProductStatus::Scheduled, Some(TOMORROW));

    let err = advance(&mut store, Location::B, now()).unwrap_err();

    assert_eq!(err, CoreError::not_found(NO_NEXT_PRODUCT));
    assert_eq!(store.status_of(1), ProductStatus::Active);
    assert_eq!(store.status_of(2), ProductStatus::Scheduled);
}

#[test]
fn test_advance_takes_lot_left_over_from_earlier_day() {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::B, ProductStatus::Active, Some(TODAY));
    store.add(2, Location::B, ProductStatus::Scheduled, Some(date!(2026 - 02 - 27)));

    let next = advance(&mut store, Location::B, now()).unwrap();

    assert_eq!(next.product_id, 2);
}

#[test]
fn test_open_lot_skips_future_lot() {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::D, ProductStatus::Scheduled, Some(TOMORROW));

    let err = open_lot(&mut store, Location::D, now()).unwrap_err();

    assert_eq!(err, CoreError::not_found(NO_NEXT_PRODUCT));
    assert!(store.active_at(Location::D).is_empty());
}

#[test]
fn test_advance_records_both_moves() {
    let mut store = location_b_queue();

    advance(&mut store, Location::B, now()).unwrap();

    assert_eq!(store.history.len(), 2);
    assert!(store.history.iter().all(|t| t.operation == "advance"));
    assert_eq!(store.history[0].product_id, 1);
    assert_eq!(store.history[0].new_status, ProductStatus::Paused);
    assert_eq!(store.history[1].product_id, 2);
    assert_eq!(store.history[1].new_status, ProductStatus::Active);
}

#[test]
fn test_advance_reports_conflict_when_successor_taken() {
    let mut store = RacingStore {
        inner: location_b_queue(),
        contended: 2,
        interloper_status: ProductStatus::Paused,
    };

    let err = advance(&mut store, Location::B, now()).unwrap_err();

    assert!(matches!(err, CoreError::Conflict { .. }));
}

#[test]
fn test_open_lot_after_sale() {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::C, ProductStatus::Sold, Some(TODAY));
    store.add(2, Location::C, ProductStatus::Scheduled, Some(TODAY));

    let opened = open_lot(&mut store, Location::C, now()).unwrap();

    assert_eq!(opened.product_id, 2);
    assert_eq!(store.active_at(Location::C), vec![2]);
    assert_eq!(store.history[0].operation, "open_lot");
}

#[test]
fn test_open_lot_on_busy_location() {
    let mut store = location_b_queue();

    let err = open_lot(&mut store, Location::B, now()).unwrap_err();

    assert_eq!(
        err,
        CoreError::LocationBusy {
            location: Location::B
        }
    );
    assert_eq!(store.status_of(2), ProductStatus::Scheduled);
}

#[test]
fn test_open_lot_with_empty_queue() {
    let mut store = MemoryStore::with_accounts();

    let err = open_lot(&mut store, Location::D, now()).unwrap_err();

    assert_eq!(err, CoreError::not_found(NO_NEXT_PRODUCT));
}

#[test]
fn test_current_lot() {
    let mut store = location_b_queue();

    assert_eq!(
        current_lot(&mut store, Location::B)
            .unwrap()
            .map(|p| p.product_id),
        Some(1)
    );
    assert_eq!(current_lot(&mut store, Location::A).unwrap(), None);
}
