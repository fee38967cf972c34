// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::NewSession;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Creates a session row and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    account_id: i64,
    created_at: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let row: NewSession = NewSession {
        session_token: String::from(session_token),
        account_id,
        created_at: String::from(created_at),
        expires_at: String::from(expires_at),
    };
    diesel::insert_into(sessions::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Records session activity.
///
/// # Errors
///
/// Returns `PersistenceError::SessionNotFound` if no session matches.
pub fn touch_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(sessions::table.filter(sessions::session_token.eq(session_token)))
            .set(sessions::last_active_at.eq(Some(String::from(at))))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::SessionNotFound(String::from(
            session_token,
        )));
    }
    Ok(())
}

/// Deletes a session (logout).
///
/// Deleting an unknown token is not an error; logout is idempotent.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
        .execute(conn)?;
    Ok(())
}

/// Deletes every session belonging to an account.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_sessions_for_account(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(sessions::table.filter(sessions::account_id.eq(account_id)))
            .execute(conn)?,
    )
}
