// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::NewAccount;
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Creates an account with a bcrypt-hashed password.
///
/// The login name is normalized to uppercase so logins compare
/// case-insensitively.
///
/// # Errors
///
/// Returns an error if hashing or the insert fails (including a
/// duplicate login name).
pub fn create_account(
    conn: &mut SqliteConnection,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(e.to_string()))?;

    let row: NewAccount = NewAccount {
        login_name: login_name.trim().to_uppercase(),
        display_name: String::from(display_name),
        password_hash,
        role: String::from(role),
        is_disabled: 0,
        created_at: String::from(created_at),
    };
    diesel::insert_into(accounts::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Enables or disables an account.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if no account matches.
pub fn set_account_disabled(
    conn: &mut SqliteConnection,
    account_id: i64,
    disabled: bool,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(accounts::table.filter(accounts::account_id.eq(account_id)))
            .set(accounts::is_disabled.eq(i32::from(disabled)))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::AccountNotFound(account_id.to_string()));
    }
    Ok(())
}

/// Records a successful login time.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if no account matches.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    account_id: i64,
    at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(accounts::table.filter(accounts::account_id.eq(account_id)))
            .set(accounts::last_login_at.eq(Some(String::from(at))))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::AccountNotFound(account_id.to_string()));
    }
    Ok(())
}

/// Replaces an account's password with a fresh bcrypt hash.
///
/// # Errors
///
/// Returns an error if hashing fails or no account matches.
pub fn update_password(
    conn: &mut SqliteConnection,
    account_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(e.to_string()))?;
    let updated: usize =
        diesel::update(accounts::table.filter(accounts::account_id.eq(account_id)))
            .set(accounts::password_hash.eq(password_hash))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::AccountNotFound(account_id.to_string()));
    }
    Ok(())
}
