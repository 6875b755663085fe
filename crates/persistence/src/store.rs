// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{mutations, queries};
use diesel::SqliteConnection;
use time::Date;
use veilingklok::{CoreError, LotStore};
use veilingklok_domain::{
    Account, AccountId, Location, Product, ProductId, ProductStatus, Sale, StatusTransition,
};

/// [`LotStore`] over a borrowed connection.
///
/// Constructed inside a transaction by [`crate::Persistence`], so every call
/// an engine operation makes lands in the same unit of work.
pub struct SqliteLotStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteLotStore<'a> {
    pub const fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl LotStore for SqliteLotStore<'_> {
    fn find_product(&mut self, product_id: ProductId) -> Result<Option<Product>, CoreError> {
        Ok(queries::products::find_product(self.conn, product_id)?)
    }

    fn find_account(&mut self, account_id: AccountId) -> Result<Option<Account>, CoreError> {
        Ok(queries::accounts::find_account(self.conn, account_id)?)
    }

    fn products_at(
        &mut self,
        location: Location,
        status: ProductStatus,
    ) -> Result<Vec<Product>, CoreError> {
        Ok(queries::products::products_at(self.conn, location, status)?)
    }

    fn products_due_at(
        &mut self,
        location: Location,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError> {
        Ok(queries::products::products_due_at(
            self.conn, location, status, date,
        )?)
    }

    fn products_with_status(&mut self, status: ProductStatus) -> Result<Vec<Product>, CoreError> {
        Ok(queries::products::products_with_status(self.conn, status)?)
    }

    fn products_with_status_on(
        &mut self,
        status: ProductStatus,
        date: Date,
    ) -> Result<Vec<Product>, CoreError> {
        Ok(queries::products::products_with_status_on(
            self.conn, status, date,
        )?)
    }

    fn any_with_status(&mut self, status: ProductStatus) -> Result<bool, CoreError> {
        Ok(queries::products::any_with_status(self.conn, status)?)
    }

    fn compare_and_set_status(
        &mut self,
        product_id: ProductId,
        expected: ProductStatus,
        new: ProductStatus,
    ) -> Result<bool, CoreError> {
        Ok(mutations::products::set_status_if(
            self.conn, product_id, expected, new,
        )?)
    }

    fn schedule(
        &mut self,
        product_id: ProductId,
        date: Date,
        location: Location,
    ) -> Result<bool, CoreError> {
        Ok(mutations::products::schedule_if_registered(
            self.conn, product_id, date, location,
        )?)
    }

    fn record_sale(&mut self, product_id: ProductId, sale: Sale) -> Result<bool, CoreError> {
        Ok(mutations::products::sell_if_active(
            self.conn, product_id, sale,
        )?)
    }

    fn record_transition(&mut self, transition: &StatusTransition) -> Result<(), CoreError> {
        Ok(mutations::history::insert_status_transition(
            self.conn, transition,
        )?)
    }
}
