// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{TestClock, now, scheduled, setup};
use crate::{ApiError, current_lot, elapsed_ms, parse_location, reset_clock, start_auctions};
use std::time::Duration;
use time::macros::datetime;
use veilingklok::NO_ACTIVE_PRODUCT;
use veilingklok_domain::{ClockPricing, Location, Money};

fn pricing() -> ClockPricing {
    ClockPricing::new(Duration::from_secs(30))
}

#[test]
fn test_current_lot_price_follows_elapsed_time() {
    let (mut persistence, supplier, _) = setup();
    let lot = scheduled(&mut persistence, supplier, "A");
    let clock = TestClock::default();
    start_auctions(&mut persistence, &clock, now()).unwrap();
    clock.started_before_now(Location::A, 15_000);

    let current = current_lot(&mut persistence, &clock, &pricing(), Location::A, now()).unwrap();

    assert_eq!(current.product.product_id, lot.product_id);
    assert_eq!(current.elapsed_ms, 15_000);
    assert_eq!(current.remaining_ms, 15_000);
    assert_eq!(current.current_price, Money::from_cents(700).unwrap());
}

#[test]
fn test_current_lot_price_stops_at_minimum() {
    let (mut persistence, supplier, _) = setup();
    scheduled(&mut persistence, supplier, "A");
    let clock = TestClock::default();
    start_auctions(&mut persistence, &clock, now()).unwrap();
    clock.started_before_now(Location::A, 45_000);

    let current = current_lot(&mut persistence, &clock, &pricing(), Location::A, now()).unwrap();

    assert_eq!(current.remaining_ms, 0);
    assert_eq!(current.current_price, Money::from_cents(400).unwrap());
}

#[test]
fn test_current_lot_without_started_clock_shows_starting_price() {
    let (mut persistence, supplier, _) = setup();
    scheduled(&mut persistence, supplier, "B");
    let starter = TestClock::default();
    start_auctions(&mut persistence, &starter, now()).unwrap();
    let fresh = TestClock::default();

    let current = current_lot(&mut persistence, &fresh, &pricing(), Location::B, now()).unwrap();

    assert_eq!(current.clock_started_at, None);
    assert_eq!(current.elapsed_ms, 0);
    assert_eq!(current.current_price, Money::from_cents(1000).unwrap());
}

#[test]
fn test_current_lot_at_idle_location_is_not_found() {
    let (mut persistence, _, _) = setup();
    let clock = TestClock::default();

    let err = current_lot(&mut persistence, &clock, &pricing(), Location::C, now()).unwrap_err();

    assert_eq!(
        err,
        ApiError::NotFound {
            message: String::from(NO_ACTIVE_PRODUCT)
        }
    );
}

#[test]
fn test_reset_clock_reports_new_start() {
    let clock = TestClock::default();

    let response = reset_clock(&clock, Location::C, now());

    assert_eq!(response.location, "C");
    assert_eq!(response.started_at, "2026-03-02 06:00:00.000000");
    assert_eq!(clock.resets(), vec![Location::C]);
}

#[test]
fn test_elapsed_ms_is_never_negative() {
    let started = datetime!(2026-03-02 06:00:10 UTC);

    assert_eq!(elapsed_ms(started, datetime!(2026-03-02 06:00:00 UTC)), 0);
    assert_eq!(elapsed_ms(started, datetime!(2026-03-02 06:00:12.5 UTC)), 2_500);
}

#[test]
fn test_parse_location_accepts_lowercase() {
    assert_eq!(parse_location("b").unwrap(), Location::B);
    assert!(matches!(
        parse_location("E"),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "location"
    ));
}
