// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MemoryStore, TODAY, now};
use crate::{CoreError, advance};
use std::sync::{Arc, Mutex};
use std::thread;
use veilingklok_domain::{Location, ProductStatus};

#[test]
fn test_concurrent_advance_with_one_successor() {
    let mut store = MemoryStore::with_accounts();
    store.add(1, Location::B, ProductStatus::Active, Some(TODAY));
    store.add(2, Location::B, ProductStatus::Scheduled, Some(TODAY));
    let store = Arc::new(Mutex::new(store));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut guard = store.lock().unwrap();
                advance(&mut *guard, Location::B, now())
            })
        })
        .collect();

    let results: Vec<Result<_, CoreError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(CoreError::NotFound { .. } | CoreError::Conflict { .. })
    )));

    let store = store.lock().unwrap();
    assert_eq!(store.active_at(Location::B), vec![2]);
}

#[test]
fn test_single_active_lot_holds_across_operation_sequence() {
    let mut store = MemoryStore::with_accounts();
    for id in 1..=6 {
        let location = if id % 2 == 0 { Location::A } else { Location::B };
        store.add(id, location, ProductStatus::Scheduled, Some(TODAY));
    }

    crate::start_auctions(&mut store, now()).unwrap();
    for location in [Location::A, Location::B] {
        assert_eq!(store.active_at(location).len(), 1);
    }

    advance(&mut store, Location::A, now()).unwrap();
    crate::pause_auctions(&mut store, now()).unwrap();
    crate::resume_auctions(&mut store, now()).unwrap();
    crate::start_auctions(&mut store, now()).unwrap();

    for location in Location::ALL {
        assert!(store.active_at(location).len() <= 1);
    }
}
