// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewProductRow;
use crate::diesel_schema::products;
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;
use veilingklok_domain::{Location, NewProduct, ProductId, ProductStatus, Sale, format_date};

/// Inserts a product in `Registered` status and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_product(
    conn: &mut SqliteConnection,
    product: &NewProduct,
    created_at: &str,
) -> Result<ProductId, PersistenceError> {
    diesel::insert_into(products::table)
        .values(&NewProductRow::registered(product, created_at)?)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Sets `new` on the product if it still holds `expected`.
///
/// # Errors
///
/// Returns `ConstraintViolation` if the write would put a second lot on the
/// clock at the product's location.
pub fn set_status_if(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    expected: ProductStatus,
    new: ProductStatus,
) -> Result<bool, PersistenceError> {
    let affected: usize = diesel::update(
        products::table
            .filter(products::product_id.eq(product_id))
            .filter(products::status.eq(expected.code())),
    )
    .set(products::status.eq(new.code()))
    .execute(conn)?;
    Ok(affected == 1)
}

/// Schedules a `Registered` product.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn schedule_if_registered(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    date: Date,
    location: Location,
) -> Result<bool, PersistenceError> {
    let affected: usize = diesel::update(
        products::table
            .filter(products::product_id.eq(product_id))
            .filter(products::status.eq(ProductStatus::Registered.code())),
    )
    .set((
        products::status.eq(ProductStatus::Scheduled.code()),
        products::scheduled_date.eq(Some(format_date(date))),
        products::location.eq(location.code()),
    ))
    .execute(conn)?;
    Ok(affected == 1)
}

/// Marks an `Active` product sold to `sale.buyer_id`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn sell_if_active(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    sale: Sale,
) -> Result<bool, PersistenceError> {
    let affected: usize = diesel::update(
        products::table
            .filter(products::product_id.eq(product_id))
            .filter(products::status.eq(ProductStatus::Active.code())),
    )
    .set((
        products::status.eq(ProductStatus::Sold.code()),
        products::buyer_id.eq(Some(sale.buyer_id)),
        products::sale_price_cents.eq(Some(sale.sale_price.cents())),
    ))
    .execute(conn)?;
    Ok(affected == 1)
}
