// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation for incoming submissions.

use time::Date;

use crate::error::DomainError;
use crate::types::VisitRequest;

/// Validates the user-entered fields of a request before acceptance.
///
/// Text fields must carry non-whitespace content, the duration must be
/// at least one day, the advance must be a finite non-negative amount,
/// and a journey date, when given, must not be in the past relative to
/// `today`.
///
/// # Errors
///
/// Returns the first `DomainError` encountered, in field order.
pub fn validate_request_fields(request: &VisitRequest, today: Date) -> Result<(), DomainError> {
    let required: [(&'static str, &str); 4] = [
        ("employee_name", &request.employee_name),
        ("site_city", &request.site_city),
        ("project", &request.project),
        ("reason", &request.reason),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyField { field });
        }
    }

    if request.duration_days == 0 {
        return Err(DomainError::InvalidDuration {
            days: request.duration_days,
        });
    }

    if !request.advance.is_finite() {
        return Err(DomainError::InvalidAdvance {
            reason: String::from("amount is not a finite number"),
        });
    }
    if request.advance < 0.0 {
        return Err(DomainError::InvalidAdvance {
            reason: String::from("amount must not be negative"),
        });
    }

    if let Some(journey) = request.date_of_journey
        && journey < today
    {
        return Err(DomainError::JourneyDateInPast {
            date: journey.to_string(),
        });
    }

    Ok(())
}
