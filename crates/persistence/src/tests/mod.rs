// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod product_tests;

use crate::Persistence;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};
use veilingklok_domain::{Account, AccountRole, Location, Money, NewProduct, Product};

pub const TODAY: Date = date!(2026 - 03 - 02);

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 06:00:00 UTC)
}

pub fn euros(cents: i64) -> Money {
    Money::from_cents(cents).unwrap()
}

/// A fresh database with one supplier and one buyer.
pub fn setup() -> (Persistence, Account, Account) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let supplier = persistence
        .create_account("Kwekerij de Vries", AccountRole::Supplier, now())
        .unwrap();
    let buyer = persistence
        .create_account("Bloemenhandel Jansen", AccountRole::Buyer, now())
        .unwrap();
    (persistence, supplier, buyer)
}

pub fn new_product(supplier: &Account, location: Location) -> NewProduct {
    NewProduct {
        name: String::from("Rozen Avalanche"),
        description: String::from("Witte rozen, lengte 60 cm"),
        quantity: 120,
        minimum_price: euros(500),
        starting_price: euros(1500),
        location,
        supplier_id: supplier.account_id,
    }
}

/// Registers and schedules a product for `TODAY`.
pub fn scheduled_product(
    persistence: &mut Persistence,
    supplier: &Account,
    location: Location,
) -> Product {
    let product = persistence
        .register_product(&new_product(supplier, location), now())
        .unwrap();
    persistence
        .schedule_product(product.product_id, TODAY, None, now())
        .unwrap()
}
