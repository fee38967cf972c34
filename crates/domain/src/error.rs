// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain rule violations.

/// Errors raised when a domain rule is violated.
///
/// Every variant carries enough context to explain the violation to a
/// caller without access to the inputs that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field was empty or whitespace.
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The requested duration is outside the allowed range.
    InvalidDuration {
        /// The rejected duration in days.
        days: u32,
    },
    /// The advance amount is negative or not a finite number.
    InvalidAdvance {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The planned journey date is in the past.
    JourneyDateInPast {
        /// The rejected journey date, ISO-8601 formatted.
        date: String,
    },
    /// A status string did not name a known status.
    InvalidStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// An action string did not name a known decision verb.
    InvalidAction {
        /// The unrecognized action string.
        action: String,
    },
    /// A role string did not name a known role.
    InvalidRole {
        /// The unrecognized role string.
        role: String,
    },
    /// A transition not permitted by the approval state machine.
    InvalidStatusTransition {
        /// Status before the attempted transition.
        from: String,
        /// Status the transition attempted to reach.
        to: String,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// The actor is not allowed to perform this action on the request in
    /// its current state.
    ActionNotAllowed {
        /// The attempted action.
        action: String,
        /// Why the action is not allowed right now.
        reason: String,
    },
    /// A matching active request was already submitted today.
    DuplicateRequest {
        /// Employee who submitted both requests.
        employee_name: String,
        /// Project both requests are charged against.
        project: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => {
                write!(f, "field '{field}' must not be empty")
            }
            Self::InvalidDuration { days } => {
                write!(f, "duration of {days} days is not valid; must be at least 1")
            }
            Self::InvalidAdvance { reason } => {
                write!(f, "invalid advance amount: {reason}")
            }
            Self::JourneyDateInPast { date } => {
                write!(f, "journey date {date} is in the past")
            }
            Self::InvalidStatus { status } => {
                write!(f, "'{status}' is not a recognized status")
            }
            Self::InvalidAction { action } => {
                write!(f, "'{action}' is not a recognized action")
            }
            Self::InvalidRole { role } => {
                write!(f, "'{role}' is not a recognized role")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "cannot move from '{from}' to '{to}': {reason}")
            }
            Self::ActionNotAllowed { action, reason } => {
                write!(f, "action '{action}' is not allowed: {reason}")
            }
            Self::DuplicateRequest {
                employee_name,
                project,
            } => {
                write!(
                    f,
                    "{employee_name} already submitted an identical request for \
                     project '{project}' today"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_transition_error() {
        let error = DomainError::InvalidStatusTransition {
            from: String::from("approved"),
            to: String::from("pending"),
            reason: String::from("decision is final and cannot be changed"),
        };
        assert_eq!(
            error.to_string(),
            "cannot move from 'approved' to 'pending': decision is final and cannot be changed"
        );
    }

    #[test]
    fn test_display_duplicate_error_names_employee_and_project() {
        let error = DomainError::DuplicateRequest {
            employee_name: String::from("Asha Rao"),
            project: String::from("Metro Line 4"),
        };
        let text = error.to_string();
        assert!(text.contains("Asha Rao"));
        assert!(text.contains("Metro Line 4"));
    }
}
