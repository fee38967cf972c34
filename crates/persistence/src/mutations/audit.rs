// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event mutations.
//!
//! Audit events are append-only; there is deliberately no update or
//! delete here.

use diesel::SqliteConnection;
use diesel::prelude::*;
use trp_audit::AuditEvent;

use crate::data_models::NewAuditEvent;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Persists an audit event and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    recorded_at: &str,
) -> Result<i64, PersistenceError> {
    let row: NewAuditEvent = NewAuditEvent {
        request_id: event.request_id,
        actor_json: serde_json::to_string(&event.actor)?,
        cause_json: serde_json::to_string(&event.cause)?,
        action_json: serde_json::to_string(&event.action)?,
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        recorded_at: String::from(recorded_at),
    };
    diesel::insert_into(audit_events::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
