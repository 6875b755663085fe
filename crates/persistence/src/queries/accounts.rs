// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data_models::AccountRow;
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use veilingklok_domain::{Account, AccountId};

/// Looks up an account by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is unknown.
pub fn find_account(
    conn: &mut SqliteConnection,
    account_id: AccountId,
) -> Result<Option<Account>, PersistenceError> {
    accounts::table
        .filter(accounts::account_id.eq(account_id))
        .select(AccountRow::as_select())
        .first::<AccountRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_account: {e}")))?
        .map(Account::try_from)
        .transpose()
}
