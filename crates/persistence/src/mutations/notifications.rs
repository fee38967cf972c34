// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::NewNotification;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a notification and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    row: &NewNotification,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(notifications::table)
        .values(row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Marks one notification as read.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no notification matches.
pub fn mark_read(
    conn: &mut SqliteConnection,
    notification_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        notifications::table.filter(notifications::notification_id.eq(notification_id)),
    )
    .set(notifications::is_read.eq(1))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "notification {notification_id}"
        )));
    }
    Ok(())
}

/// Marks all of a role's notifications as read; returns how many changed.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_all_read(
    conn: &mut SqliteConnection,
    recipient_role: &str,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        notifications::table
            .filter(notifications::recipient_role.eq(recipient_role))
            .filter(notifications::is_read.eq(0)),
    )
    .set(notifications::is_read.eq(1))
    .execute(conn)?)
}

/// Deletes notifications created before the cutoff; returns how many.
///
/// The cutoff comparison relies on RFC 3339 text sorting
/// lexicographically in time order.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_older_than(
    conn: &mut SqliteConnection,
    cutoff: &str,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(notifications::table.filter(notifications::created_at.lt(cutoff)))
            .execute(conn)?,
    )
}
