// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::NotificationData;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Lists a role's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_for_role(
    conn: &mut SqliteConnection,
    recipient_role: &str,
) -> Result<Vec<NotificationData>, PersistenceError> {
    Ok(notifications::table
        .filter(notifications::recipient_role.eq(recipient_role))
        .order(notifications::notification_id.desc())
        .load(conn)?)
}

/// Counts a role's unread notifications.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn unread_count(
    conn: &mut SqliteConnection,
    recipient_role: &str,
) -> Result<i64, PersistenceError> {
    Ok(notifications::table
        .filter(notifications::recipient_role.eq(recipient_role))
        .filter(notifications::is_read.eq(0))
        .count()
        .get_result(conn)?)
}
