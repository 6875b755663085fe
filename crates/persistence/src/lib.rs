// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Veilingklok auction.
//!
//! Diesel over `SQLite`. Every mutating lifecycle operation runs inside a
//! `BEGIN IMMEDIATE` transaction, so the write lock is taken before the
//! first read and two requests cannot interleave their check-then-write
//! steps. The partial unique index on active lots is a storage-level
//! backstop for the same invariant.
//!
//! ## Testing
//!
//! Tests use isolated shared-cache in-memory databases created by
//! [`Persistence::new_in_memory`].

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::info;
use veilingklok::CoreError;
use veilingklok_domain::{
    Account, AccountId, AccountRole, Location, Money, NewProduct, Product, ProductId,
    ProductStatus, StatusTransition, format_timestamp,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use backend::sqlite::MIGRATIONS;
pub use error::PersistenceError;
pub use store::SqliteLotStore;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for accounts, products and the lifecycle engine.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Runs `op` against the store inside an immediate transaction.
    ///
    /// Any error rolls the whole operation back.
    fn in_transaction<T, F>(&mut self, op: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut SqliteLotStore<'_>) -> Result<T, CoreError>,
    {
        self.conn.immediate_transaction(|conn| {
            let mut store: SqliteLotStore<'_> = SqliteLotStore::new(conn);
            op(&mut store).map_err(PersistenceError::from)
        })
    }

    fn read<T, F>(&mut self, op: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut SqliteLotStore<'_>) -> Result<T, CoreError>,
    {
        let mut store: SqliteLotStore<'_> = SqliteLotStore::new(&mut self.conn);
        op(&mut store).map_err(PersistenceError::from)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Registers an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_account(
        &mut self,
        name: &str,
        role: AccountRole,
        now: OffsetDateTime,
    ) -> Result<Account, PersistenceError> {
        let created_at: String = format_timestamp(now);
        let account_id: AccountId = self.conn.immediate_transaction(|conn| {
            mutations::accounts::insert_account(conn, name, role, &created_at)
        })?;

        info!(account_id, role = role.as_str(), "Registered account");
        Ok(Account {
            account_id,
            name: name.to_string(),
            role,
        })
    }

    /// Looks up an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<Account>, PersistenceError> {
        queries::accounts::find_account(&mut self.conn, account_id)
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Registers a product in `Registered` status and records its first
    /// history entry.
    ///
    /// The caller validates the product and its supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn register_product(
        &mut self,
        product: &NewProduct,
        now: OffsetDateTime,
    ) -> Result<Product, PersistenceError> {
        let created_at: String = format_timestamp(now);
        let registered: Product = self.conn.immediate_transaction(|conn| {
            let product_id: ProductId =
                mutations::products::insert_product(conn, product, &created_at)?;
            mutations::history::insert_status_transition(
                conn,
                &StatusTransition::new(
                    product_id,
                    None,
                    ProductStatus::Registered,
                    "register_product",
                    created_at.clone(),
                ),
            )?;
            queries::products::find_product(conn, product_id)?.ok_or_else(|| {
                PersistenceError::NotFound(format!("Product {product_id} vanished after insert"))
            })
        })?;

        info!(
            product_id = registered.product_id,
            location = %registered.location,
            supplier_id = registered.supplier_id,
            "Registered product"
        );
        Ok(registered)
    }

    /// Looks up a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_product(
        &mut self,
        product_id: ProductId,
    ) -> Result<Option<Product>, PersistenceError> {
        queries::products::find_product(&mut self.conn, product_id)
    }

    /// Lists products, optionally filtered by status and location.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_products(
        &mut self,
        status: Option<ProductStatus>,
        location: Option<Location>,
    ) -> Result<Vec<Product>, PersistenceError> {
        queries::products::list_products(&mut self.conn, status, location)
    }

    /// Returns a product's status changes, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_status_history(
        &mut self,
        product_id: ProductId,
    ) -> Result<Vec<StatusTransition>, PersistenceError> {
        queries::history::status_history(&mut self.conn, product_id)
    }

    // ========================================================================
    // Lifecycle operations
    // ========================================================================

    /// Runs [`veilingklok::schedule_product`] in a transaction.
    ///
    /// # Errors
    ///
    /// Returns `Lifecycle` with the engine's error, or a database error.
    pub fn schedule_product(
        &mut self,
        product_id: ProductId,
        date: Date,
        location: Option<Location>,
        now: OffsetDateTime,
    ) -> Result<Product, PersistenceError> {
        self.in_transaction(|store| {
            veilingklok::schedule_product(store, product_id, date, location, now)
        })
    }

    /// Runs [`veilingklok::start_auctions`] in a transaction.
    ///
    /// # Errors
    ///
    /// Returns `Lifecycle` with the engine's error, or a database error.
    pub fn start_auctions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<Product>, PersistenceError> {
        self.in_transaction(|store| veilingklok::start_auctions(store, now))
    }

    /// Runs [`veilingklok::pause_auctions`] in a transaction.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn pause_auctions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<Product>, PersistenceError> {
        self.in_transaction(|store| veilingklok::pause_auctions(store, now))
    }

    /// Runs [`veilingklok::resume_auctions`] in a transaction.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn resume_auctions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<Product>, PersistenceError> {
        self.in_transaction(|store| veilingklok::resume_auctions(store, now))
    }

    /// Returns true if any lot is paused.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn has_paused_auctions(&mut self) -> Result<bool, PersistenceError> {
        self.read(|store| veilingklok::has_paused_auctions(&mut *store))
    }

    /// Runs [`veilingklok::advance`] in a transaction.
    ///
    /// # Errors
    ///
    /// Returns `Lifecycle` with the engine's error, or a database error.
    pub fn advance(
        &mut self,
        location: Location,
        now: OffsetDateTime,
    ) -> Result<Product, PersistenceError> {
        self.in_transaction(|store| veilingklok::advance(store, location, now))
    }

    /// Runs [`veilingklok::open_lot`] in a transaction.
    ///
    /// # Errors
    ///
    /// Returns `Lifecycle` with the engine's error, or a database error.
    pub fn open_lot(
        &mut self,
        location: Location,
        now: OffsetDateTime,
    ) -> Result<Product, PersistenceError> {
        self.in_transaction(|store| veilingklok::open_lot(store, location, now))
    }

    /// Returns the lot on the clock at `location`, if any.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn current_lot(&mut self, location: Location) -> Result<Option<Product>, PersistenceError> {
        self.read(|store| veilingklok::current_lot(store, location))
    }

    /// Runs [`veilingklok::purchase`] in a transaction.
    ///
    /// # Errors
    ///
    /// Returns `Lifecycle` with the engine's error, or a database error.
    pub fn purchase(
        &mut self,
        product_id: ProductId,
        buyer: Option<AccountId>,
        sale_price: Money,
        now: OffsetDateTime,
    ) -> Result<Product, PersistenceError> {
        self.in_transaction(|store| {
            veilingklok::purchase(store, product_id, buyer, sale_price, now)
        })
    }
}
