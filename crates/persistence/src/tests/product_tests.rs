// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{TODAY, euros, new_product, now, scheduled_product, setup};
use crate::PersistenceError;
use veilingklok_domain::{Location, ProductStatus};

#[test]
fn test_register_product_round_trips_fields() {
    let (mut persistence, supplier, _) = setup();

    let product = persistence
        .register_product(&new_product(&supplier, Location::B), now())
        .unwrap();

    assert_eq!(product.status, ProductStatus::Registered);
    assert_eq!(product.location, Location::B);
    assert_eq!(product.minimum_price, euros(500));
    assert_eq!(product.starting_price, euros(1500));
    assert_eq!(product.quantity, 120);
    assert_eq!(product.sale_price, None);
    assert_eq!(product.scheduled_date, None);
    assert_eq!(product.created_at, "2026-03-02 06:00:00.000000");

    let loaded = persistence.get_product(product.product_id).unwrap();
    assert_eq!(loaded, Some(product));
}

#[test]
fn test_register_product_records_initial_history() {
    let (mut persistence, supplier, _) = setup();

    let product = persistence
        .register_product(&new_product(&supplier, Location::A), now())
        .unwrap();
    let history = persistence.get_status_history(product.product_id).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].previous_status, None);
    assert_eq!(history[0].new_status, ProductStatus::Registered);
    assert_eq!(history[0].operation, "register_product");
}

#[test]
fn test_register_product_with_unknown_supplier_violates_foreign_key() {
    let (mut persistence, supplier, _) = setup();
    let mut product = new_product(&supplier, Location::A);
    product.supplier_id = 4242;

    let err = persistence.register_product(&product, now()).unwrap_err();

    assert!(matches!(err, PersistenceError::ConstraintViolation(_)));
}

#[test]
fn test_list_products_filters() {
    let (mut persistence, supplier, _) = setup();
    scheduled_product(&mut persistence, &supplier, Location::A);
    scheduled_product(&mut persistence, &supplier, Location::B);
    persistence
        .register_product(&new_product(&supplier, Location::A), now())
        .unwrap();

    assert_eq!(persistence.list_products(None, None).unwrap().len(), 3);
    assert_eq!(
        persistence
            .list_products(Some(ProductStatus::Scheduled), None)
            .unwrap()
            .len(),
        2
    );
    let at_a_scheduled = persistence
        .list_products(Some(ProductStatus::Scheduled), Some(Location::A))
        .unwrap();
    assert_eq!(at_a_scheduled.len(), 1);
    assert_eq!(at_a_scheduled[0].scheduled_date, Some(TODAY));
}

#[test]
fn test_list_products_is_ordered_by_id() {
    let (mut persistence, supplier, _) = setup();
    for location in [Location::D, Location::A, Location::C] {
        persistence
            .register_product(&new_product(&supplier, location), now())
            .unwrap();
    }

    let ids: Vec<i64> = persistence
        .list_products(None, None)
        .unwrap()
        .iter()
        .map(|p| p.product_id)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}
