// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::collections::HashMap;
use std::sync::Mutex;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use veilingklok::LotClock;
use veilingklok_domain::{AccountId, Location};
use veilingklok_persistence::Persistence;

use crate::{
    AccountResponse, CreateAccountRequest, CreateProductRequest, ProductResponse,
    ScheduleProductRequest, create_account, register_product, schedule_product,
};

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 06:00:00 UTC)
}

pub const TODAY: &str = "2026-03-02";

/// A clock that records every reset and starts lots at a fixed instant.
#[derive(Default)]
pub struct TestClock {
    started: Mutex<HashMap<Location, OffsetDateTime>>,
    resets: Mutex<Vec<Location>>,
}

impl TestClock {
    pub fn resets(&self) -> Vec<Location> {
        self.resets.lock().unwrap().clone()
    }

    /// Pretends the clock at `location` started `millis` before [`now`].
    pub fn started_before_now(&self, location: Location, millis: i64) {
        self.started
            .lock()
            .unwrap()
            .insert(location, now() - Duration::milliseconds(millis));
    }
}

impl LotClock for TestClock {
    fn reset_location(&self, location: Location) {
        self.started.lock().unwrap().insert(location, now());
        self.resets.lock().unwrap().push(location);
    }

    fn started_at(&self, location: Location) -> Option<OffsetDateTime> {
        self.started.lock().unwrap().get(&location).copied()
    }
}

pub fn account(persistence: &mut Persistence, name: &str, role: &str) -> AccountId {
    let response: AccountResponse = create_account(
        persistence,
        &CreateAccountRequest {
            name: String::from(name),
            role: String::from(role),
        },
        now(),
    )
    .unwrap();
    response.account_id
}

/// A fresh database with one supplier and one buyer.
pub fn setup() -> (Persistence, AccountId, AccountId) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let supplier = account(&mut persistence, "Kwekerij de Vries", "supplier");
    let buyer = account(&mut persistence, "Bloemenhandel Jansen", "buyer");
    (persistence, supplier, buyer)
}

pub fn product_request(supplier_id: AccountId, location: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: String::from("Tulpen Strong Gold"),
        description: String::from("Gele tulpen, 40 cm"),
        quantity: 200,
        minimum_price: 4.0,
        starting_price: 10.0,
        location: String::from(location),
        supplier_id,
    }
}

/// Registers a product and schedules it for today.
pub fn scheduled(
    persistence: &mut Persistence,
    supplier_id: AccountId,
    location: &str,
) -> ProductResponse {
    let product =
        register_product(persistence, &product_request(supplier_id, location), now()).unwrap();
    schedule_product(
        persistence,
        product.product_id,
        &ScheduleProductRequest {
            date: String::from(TODAY),
            location: None,
        },
        now(),
    )
    .unwrap()
}
