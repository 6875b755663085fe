// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewAccountRow;
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use veilingklok_domain::{AccountId, AccountRole};

/// Inserts an account and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_account(
    conn: &mut SqliteConnection,
    name: &str,
    role: AccountRole,
    created_at: &str,
) -> Result<AccountId, PersistenceError> {
    diesel::insert_into(accounts::table)
        .values(&NewAccountRow {
            name,
            role: role.as_str(),
            created_at,
        })
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
