// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Same-day duplicate submission guard.
//!
//! An employee may not submit the same request twice in one calendar
//! day. Two submissions count as the same when every user-entered field
//! matches: text fields case-insensitively after trimming, numbers
//! exactly, and the journey date exactly (two absent dates match).
//!
//! The guard consults two sources: the employee's stored requests that
//! are still active, and an in-memory record of their most recent
//! submission. The cache covers the window where a just-accepted
//! submission may not yet be visible in a listing query.

use time::Date;

use crate::error::DomainError;
use crate::status::ApprovalStatus;
use crate::types::VisitRequest;

/// Placeholder advance recorded when the employee requests no specific
/// amount. One currency unit, so downstream sums stay harmless.
pub const DEFAULT_ADVANCE: f64 = 1.0;

/// The fields of an employee's most recent accepted submission, kept
/// in memory to backstop the stored-request scan.
#[derive(Debug, Clone, PartialEq)]
pub struct LastSubmission {
    /// Destination site or city.
    pub site_city: String,
    /// Project charged against.
    pub project: String,
    /// Stated purpose.
    pub reason: String,
    /// Duration in days.
    pub duration_days: u32,
    /// Advance amount.
    pub advance: f64,
    /// Planned journey date, if given.
    pub date_of_journey: Option<Date>,
    /// Calendar day the submission was accepted.
    pub submitted_on: Date,
}

impl LastSubmission {
    /// Captures the duplicate-relevant fields of an accepted request.
    #[must_use]
    pub fn capture(request: &VisitRequest, submitted_on: Date) -> Self {
        Self {
            site_city: request.site_city.clone(),
            project: request.project.clone(),
            reason: request.reason.clone(),
            duration_days: request.duration_days,
            advance: request.advance,
            date_of_journey: request.date_of_journey,
            submitted_on,
        }
    }
}

/// Returns true if a request still occupies the employee's day for
/// duplicate purposes. The tracks are independent: a request is active
/// while either its manager status or its admin status is pending or
/// approved. Only a request rejected or held on both tracks frees the
/// day for a resubmission.
#[must_use]
pub const fn is_active(request: &VisitRequest) -> bool {
    matches!(
        request.status,
        ApprovalStatus::Pending | ApprovalStatus::Approved
    ) || matches!(
        request.admin_status,
        ApprovalStatus::Pending | ApprovalStatus::Approved
    )
}

fn text_matches(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn advance_matches(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

fn fields_match(
    candidate: &VisitRequest,
    site_city: &str,
    project: &str,
    reason: &str,
    duration_days: u32,
    advance: f64,
    date_of_journey: Option<Date>,
) -> bool {
    text_matches(&candidate.site_city, site_city)
        && text_matches(&candidate.project, project)
        && text_matches(&candidate.reason, reason)
        && candidate.duration_days == duration_days
        && advance_matches(candidate.advance, advance)
        && candidate.date_of_journey == date_of_journey
}

/// Checks a candidate submission against the duplicate guard.
///
/// `existing` is the employee's stored requests; only those submitted
/// `today` and still active are compared. `cached` is the employee's
/// most recent accepted submission, if one is known.
///
/// # Errors
///
/// Returns `DomainError::DuplicateRequest` when the candidate matches
/// an active same-day submission.
pub fn check_duplicate(
    candidate: &VisitRequest,
    existing: &[VisitRequest],
    cached: Option<&LastSubmission>,
    today: Date,
) -> Result<(), DomainError> {
    let duplicate_error = || DomainError::DuplicateRequest {
        employee_name: candidate.employee_name.clone(),
        project: candidate.project.clone(),
    };

    if let Some(last) = cached
        && last.submitted_on == today
        && fields_match(
            candidate,
            &last.site_city,
            &last.project,
            &last.reason,
            last.duration_days,
            last.advance,
            last.date_of_journey,
        )
    {
        return Err(duplicate_error());
    }

    for request in existing {
        if request.submitted_at.date() != today || !is_active(request) {
            continue;
        }
        if fields_match(
            candidate,
            &request.site_city,
            &request.project,
            &request.reason,
            request.duration_days,
            request.advance,
            request.date_of_journey,
        ) {
            return Err(duplicate_error());
        }
    }

    Ok(())
}
