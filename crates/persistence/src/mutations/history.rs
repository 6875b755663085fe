// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data_models::NewStatusHistoryRow;
use crate::diesel_schema::product_status_history;
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use veilingklok_domain::StatusTransition;

/// Appends a status change to the product's history.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_status_transition(
    conn: &mut SqliteConnection,
    transition: &StatusTransition,
) -> Result<(), PersistenceError> {
    diesel::insert_into(product_status_history::table)
        .values(&NewStatusHistoryRow::from(transition))
        .execute(conn)?;
    Ok(())
}
