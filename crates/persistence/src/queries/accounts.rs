// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account queries.
//!
//! Login names are stored uppercase; lookups normalize before
//! comparing so logins are case-insensitive.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::AccountData;
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;

/// Fetches an account by login name (case-insensitive).
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if no account matches.
pub fn get_account_by_login(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<AccountData, PersistenceError> {
    let normalized: String = login_name.trim().to_uppercase();
    accounts::table
        .filter(accounts::login_name.eq(&normalized))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::AccountNotFound(normalized))
}

/// Fetches an account by ID.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if no account matches.
pub fn get_account_by_id(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<AccountData, PersistenceError> {
    accounts::table
        .filter(accounts::account_id.eq(account_id))
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::AccountNotFound(account_id.to_string()))
}

/// Lists every account, ordered by login name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_accounts(conn: &mut SqliteConnection) -> Result<Vec<AccountData>, PersistenceError> {
    Ok(accounts::table
        .order(accounts::login_name.asc())
        .load(conn)?)
}

/// Verifies a password against the stored bcrypt hash.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if the account does not
/// exist, or `PersistenceError::Other` if the hash comparison fails.
/// A wrong password is reported as `AccountNotFound` so callers cannot
/// distinguish bad credentials from missing accounts.
pub fn verify_password(
    conn: &mut SqliteConnection,
    login_name: &str,
    password: &str,
) -> Result<AccountData, PersistenceError> {
    let account: AccountData = get_account_by_login(conn, login_name)?;
    let valid: bool = bcrypt::verify(password, &account.password_hash)
        .map_err(|e| PersistenceError::Other(e.to_string()))?;
    if valid {
        Ok(account)
    } else {
        Err(PersistenceError::AccountNotFound(String::from(login_name)))
    }
}
