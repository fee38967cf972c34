// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Fetches a single audit event by ID.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no row matches.
pub fn get_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEventRow, PersistenceError> {
    audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::EventNotFound(event_id))
}

/// Lists the audit trail for one request, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_events_for_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Vec<AuditEventRow>, PersistenceError> {
    Ok(audit_events::table
        .filter(audit_events::request_id.eq(request_id))
        .order(audit_events::event_id.asc())
        .load(conn)?)
}
