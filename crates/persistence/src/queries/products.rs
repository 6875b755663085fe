// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Product lookups.
//!
//! Every list is ordered by ascending product id, which is the order lots
//! come onto the clock.

use crate::data_models::ProductRow;
use crate::diesel_schema::products;
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;
use veilingklok_domain::{Location, Product, ProductId, ProductStatus, format_date};

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, PersistenceError> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Looks up a product by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
pub fn find_product(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> Result<Option<Product>, PersistenceError> {
    products::table
        .filter(products::product_id.eq(product_id))
        .select(ProductRow::as_select())
        .first::<ProductRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_product: {e}")))?
        .map(Product::try_from)
        .transpose()
}

/// Products at `location` holding `status`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn products_at(
    conn: &mut SqliteConnection,
    location: Location,
    status: ProductStatus,
) -> Result<Vec<Product>, PersistenceError> {
    let rows: Vec<ProductRow> = products::table
        .filter(products::location.eq(location.code()))
        .filter(products::status.eq(status.code()))
        .order(products::product_id.asc())
        .select(ProductRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("products_at: {e}")))?;
    into_products(rows)
}

/// Products at `location` holding `status` that are due by `date`.
///
/// Dates are stored as `YYYY-MM-DD`, so text order is date order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn products_due_at(
    conn: &mut SqliteConnection,
    location: Location,
    status: ProductStatus,
    date: Date,
) -> Result<Vec<Product>, PersistenceError> {
    let rows: Vec<ProductRow> = products::table
        .filter(products::location.eq(location.code()))
        .filter(products::status.eq(status.code()))
        .filter(products::scheduled_date.le(format_date(date)))
        .order(products::product_id.asc())
        .select(ProductRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("products_due_at: {e}")))?;
    into_products(rows)
}

/// Products holding `status`, at any location.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn products_with_status(
    conn: &mut SqliteConnection,
    status: ProductStatus,
) -> Result<Vec<Product>, PersistenceError> {
    let rows: Vec<ProductRow> = products::table
        .filter(products::status.eq(status.code()))
        .order(products::product_id.asc())
        .select(ProductRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("products_with_status: {e}")))?;
    into_products(rows)
}

/// Products holding `status` that are scheduled for `date`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn products_with_status_on(
    conn: &mut SqliteConnection,
    status: ProductStatus,
    date: Date,
) -> Result<Vec<Product>, PersistenceError> {
    let rows: Vec<ProductRow> = products::table
        .filter(products::status.eq(status.code()))
        .filter(products::scheduled_date.eq(format_date(date)))
        .order(products::product_id.asc())
        .select(ProductRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("products_with_status_on: {e}")))?;
    into_products(rows)
}

/// Returns true if any product holds `status`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn any_with_status(
    conn: &mut SqliteConnection,
    status: ProductStatus,
) -> Result<bool, PersistenceError> {
    diesel::select(diesel::dsl::exists(
        products::table.filter(products::status.eq(status.code())),
    ))
    .get_result::<bool>(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("any_with_status: {e}")))
}

/// Lists products, optionally narrowed by status and location.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_products(
    conn: &mut SqliteConnection,
    status: Option<ProductStatus>,
    location: Option<Location>,
) -> Result<Vec<Product>, PersistenceError> {
    let mut query = products::table
        .select(ProductRow::as_select())
        .order(products::product_id.asc())
        .into_boxed::<diesel::sqlite::Sqlite>();

    if let Some(status) = status {
        query = query.filter(products::status.eq(status.code()));
    }
    if let Some(location) = location {
        query = query.filter(products::location.eq(location.code()));
    }

    let rows: Vec<ProductRow> = query
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_products: {e}")))?;
    into_products(rows)
}
