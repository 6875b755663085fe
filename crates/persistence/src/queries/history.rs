// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data_models::StatusHistoryRow;
use crate::diesel_schema::product_status_history;
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use veilingklok_domain::{ProductId, StatusTransition};

/// Returns a product's status changes, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn status_history(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> Result<Vec<StatusTransition>, PersistenceError> {
    product_status_history::table
        .filter(product_status_history::product_id.eq(product_id))
        .order(product_status_history::history_id.asc())
        .select(StatusHistoryRow::as_select())
        .load::<StatusHistoryRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("status_history: {e}")))?
        .into_iter()
        .map(StatusTransition::try_from)
        .collect()
}
