// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their mapping to domain values.
//!
//! Money is stored as integer cents, dates as `YYYY-MM-DD` text, locations
//! as their single-letter code and statuses as their integer code.

use crate::diesel_schema::{accounts, product_status_history, products};
use crate::error::PersistenceError;
use diesel::prelude::*;
use veilingklok_domain::{
    Account, AccountRole, Location, Money, NewProduct, Product, ProductStatus, StatusTransition,
    parse_date,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountRow {
    pub account_id: i64,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccountRow<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub created_at: &'a str,
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: AccountRole = row.role.parse().map_err(|e| {
            PersistenceError::CorruptRow(format!("account {}: {e}", row.account_id))
        })?;
        Ok(Self {
            account_id: row.account_id,
            name: row.name,
            role,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductRow {
    pub product_id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub minimum_price_cents: i64,
    pub starting_price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub location: String,
    pub scheduled_date: Option<String>,
    pub status: i32,
    pub supplier_id: i64,
    pub buyer_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub quantity: i32,
    pub minimum_price_cents: i64,
    pub starting_price_cents: i64,
    pub location: &'a str,
    pub status: i32,
    pub supplier_id: i64,
    pub created_at: &'a str,
}

impl<'a> NewProductRow<'a> {
    /// Builds the row for a freshly registered product.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity does not fit the column.
    pub fn registered(
        product: &'a NewProduct,
        created_at: &'a str,
    ) -> Result<Self, PersistenceError> {
        let quantity: i32 = i32::try_from(product.quantity).map_err(|_| {
            PersistenceError::ConstraintViolation(format!(
                "quantity {} is out of range",
                product.quantity
            ))
        })?;
        Ok(Self {
            name: &product.name,
            description: &product.description,
            quantity,
            minimum_price_cents: product.minimum_price.cents(),
            starting_price_cents: product.starting_price.cents(),
            location: product.location.code(),
            status: ProductStatus::Registered.code(),
            supplier_id: product.supplier_id,
            created_at,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = PersistenceError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id: i64 = row.product_id;
        let corrupt = |what: String| PersistenceError::CorruptRow(format!("product {id}: {what}"));

        let money = |cents: i64| Money::from_cents(cents).map_err(|e| corrupt(e.to_string()));

        Ok(Self {
            product_id: id,
            name: row.name,
            description: row.description,
            quantity: u32::try_from(row.quantity)
                .map_err(|_| corrupt(format!("quantity {}", row.quantity)))?,
            minimum_price: money(row.minimum_price_cents)?,
            starting_price: money(row.starting_price_cents)?,
            sale_price: row.sale_price_cents.map(money).transpose()?,
            location: Location::parse(&row.location).map_err(|e| corrupt(e.to_string()))?,
            scheduled_date: row
                .scheduled_date
                .as_deref()
                .map(parse_date)
                .transpose()
                .map_err(|e| corrupt(e.to_string()))?,
            status: ProductStatus::from_code(row.status).map_err(|e| corrupt(e.to_string()))?,
            supplier_id: row.supplier_id,
            buyer_id: row.buyer_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = product_status_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatusHistoryRow {
    pub product_id: i64,
    pub previous_status: Option<i32>,
    pub new_status: i32,
    pub operation: String,
    pub transitioned_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_status_history)]
pub struct NewStatusHistoryRow<'a> {
    pub product_id: i64,
    pub previous_status: Option<i32>,
    pub new_status: i32,
    pub operation: &'a str,
    pub transitioned_at: &'a str,
}

impl<'a> From<&'a StatusTransition> for NewStatusHistoryRow<'a> {
    fn from(transition: &'a StatusTransition) -> Self {
        Self {
            product_id: transition.product_id,
            previous_status: transition.previous_status.map(ProductStatus::code),
            new_status: transition.new_status.code(),
            operation: &transition.operation,
            transitioned_at: &transition.transitioned_at,
        }
    }
}

impl TryFrom<StatusHistoryRow> for StatusTransition {
    type Error = PersistenceError;

    fn try_from(row: StatusHistoryRow) -> Result<Self, Self::Error> {
        let status = |code: i32| {
            ProductStatus::from_code(code).map_err(|e| {
                PersistenceError::CorruptRow(format!("history of product {}: {e}", row.product_id))
            })
        };
        Ok(Self {
            product_id: row.product_id,
            previous_status: row.previous_status.map(status).transpose()?,
            new_status: status(row.new_status)?,
            operation: row.operation,
            transitioned_at: row.transitioned_at,
        })
    }
}
