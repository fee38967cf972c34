// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::SessionData;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;

/// Fetches a session by its token.
///
/// Expiry is not checked here; the authentication service compares the
/// stored expiry against its own clock.
///
/// # Errors
///
/// Returns `PersistenceError::SessionNotFound` if no session matches.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<SessionData, PersistenceError> {
    sessions::table
        .filter(sessions::session_token.eq(session_token))
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::SessionNotFound(String::from(session_token)))
}
