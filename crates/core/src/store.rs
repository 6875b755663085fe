// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator contracts for the lifecycle engine.
//!
//! The engine never owns product data. It reads and writes through a
//! [`LotStore`], and it notifies a [`LotClock`] when a location brings a new
//! lot onto the clock.

use crate::error::CoreError;
use time::{Date, OffsetDateTime};
use veilingklok_domain::{
    Account, AccountId, Location, Product, ProductId, ProductStatus, Sale, StatusTransition,
};

/// Persistent product storage as seen by the lifecycle engine.
///
/// Every status-changing method is a conditional write: it applies only if
/// the row still holds the expected prior status and reports whether a row
/// was changed. Callers treat `false` as a lost race, never as success.
///
/// Implementations are expected to run each engine operation inside a single
/// transaction so that multi-step operations such as `advance` commit or
/// roll back as a unit.
pub trait LotStore {
    /// Point lookup by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_product(&mut self, product_id: ProductId) -> Result<Option<Product>, CoreError>;

    /// Point lookup of an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_account(&mut self, account_id: AccountId) -> Result<Option<Account>, CoreError>;

    /// Products at `location` with `status`, ordered by ascending id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn products_at(
        &mut self,
        location: Location,
        status: ProductStatus,
    ) -> Result<Vec<Product>, CoreError>;

    /// Products at `location` with `status` whose scheduled date is on or
    /// before `date`, ordered by ascending id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn products_due_at(
        &mut self,
        location: Location,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError>;

    /// Products with `status`, ordered by ascending id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn products_with_status(&mut self, status: ProductStatus) -> Result<Vec<Product>, CoreError>;

    /// Products with `status` whose scheduled date is `date`, ordered by ascending id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn products_with_status_on(
        &mut self,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError>;

    /// Returns true if any product holds `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn any_with_status(&mut self, status: ProductStatus) -> Result<bool, CoreError>;

    /// Sets `new` on the product if it still holds `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. A write rejected by
    /// the single-active-lot constraint is reported as `CoreError::Conflict`.
    fn compare_and_set_status(
        &mut self,
        product_id: ProductId,
        expected: ProductStatus,
        new: ProductStatus,
    ) -> Result<bool, CoreError>;

    /// Moves a `Registered` product to `Scheduled` for `date` at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn schedule(
        &mut self,
        product_id: ProductId,
        date: Date,
        location: Location,
    ) -> Result<bool, CoreError>;

    /// Writes buyer, sale price and `Sold` together if the product is still `Active`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn record_sale(&mut self, product_id: ProductId, sale: Sale) -> Result<bool, CoreError>;

    /// Appends a status change to the product's history.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn record_transition(&mut self, transition: &StatusTransition) -> Result<(), CoreError>;
}

/// The per-location auction clock as seen by the lifecycle engine.
///
/// Clock state is display timing only. Losing it never affects product
/// status.
pub trait LotClock {
    /// Restarts the countdown for `location` at the current instant.
    fn reset_location(&self, location: Location);

    /// Returns when the current lot at `location` came on the clock.
    fn started_at(&self, location: Location) -> Option<OffsetDateTime>;
}
