// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit request mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use trp_domain::VisitRequest;

use crate::data_models::NewVisitRequestRow;
use crate::diesel_schema::visit_requests;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a new request and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_request(
    conn: &mut SqliteConnection,
    request: &VisitRequest,
) -> Result<i64, PersistenceError> {
    let row: NewVisitRequestRow = NewVisitRequestRow::from_domain(request)?;
    diesel::insert_into(visit_requests::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Updates a persisted request in full.
///
/// Every mutable column is written; the workflow engine produced the
/// whole new request state, so a partial update would only invite
/// drift between engine and store.
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` if the request has no ID
/// or no stored row matches it.
pub fn update_request(
    conn: &mut SqliteConnection,
    request: &VisitRequest,
) -> Result<(), PersistenceError> {
    let request_id: i64 = request
        .request_id
        .ok_or(PersistenceError::RequestNotFound(0))?;
    let row: NewVisitRequestRow = NewVisitRequestRow::from_domain(request)?;

    let updated: usize =
        diesel::update(visit_requests::table.filter(visit_requests::request_id.eq(request_id)))
            .set((
                visit_requests::duration_days.eq(row.duration_days),
                visit_requests::advance.eq(row.advance),
                visit_requests::status.eq(row.status),
                visit_requests::admin_status.eq(row.admin_status),
                visit_requests::payment_status.eq(row.payment_status),
                visit_requests::approved_by.eq(row.approved_by),
                visit_requests::approved_by_admin.eq(row.approved_by_admin),
                visit_requests::rejected_by.eq(row.rejected_by),
                visit_requests::admin_rejection_reason.eq(row.admin_rejection_reason),
                visit_requests::manager_comment.eq(row.manager_comment),
                visit_requests::admin_comment.eq(row.admin_comment),
                visit_requests::paid_at.eq(row.paid_at),
                visit_requests::paid_by.eq(row.paid_by),
                visit_requests::manager_edit_json.eq(row.manager_edit_json),
            ))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::RequestNotFound(request_id));
    }
    Ok(())
}

/// Deletes a request.
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` if no row matches.
pub fn delete_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(visit_requests::table.filter(visit_requests::request_id.eq(request_id)))
            .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::RequestNotFound(request_id));
    }
    Ok(())
}
