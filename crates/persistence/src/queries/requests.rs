// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit request queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use trp_domain::VisitRequest;

use crate::data_models::VisitRequestRow;
use crate::diesel_schema::visit_requests;
use crate::error::PersistenceError;

/// Fetches a single request by ID.
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` if no row matches, or a
/// conversion error if the stored row is malformed.
pub fn get_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<VisitRequest, PersistenceError> {
    let row: VisitRequestRow = visit_requests::table
        .filter(visit_requests::request_id.eq(request_id))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::RequestNotFound(request_id))?;
    row.into_domain()
}

/// Lists every request, newest submission first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_requests(conn: &mut SqliteConnection) -> Result<Vec<VisitRequest>, PersistenceError> {
    let rows: Vec<VisitRequestRow> = visit_requests::table
        .order(visit_requests::submitted_at.desc())
        .load(conn)?;
    rows.into_iter().map(VisitRequestRow::into_domain).collect()
}

/// Lists one employee's requests, newest submission first.
///
/// The name comparison is exact; callers normalize display names at the
/// boundary.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_requests_for_employee(
    conn: &mut SqliteConnection,
    employee_name: &str,
) -> Result<Vec<VisitRequest>, PersistenceError> {
    let rows: Vec<VisitRequestRow> = visit_requests::table
        .filter(visit_requests::employee_name.eq(employee_name))
        .order(visit_requests::submitted_at.desc())
        .load(conn)?;
    rows.into_iter().map(VisitRequestRow::into_domain).collect()
}
