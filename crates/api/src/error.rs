// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API boundary.
//!
//! Domain and core errors are translated into API errors here so that
//! transport layers only ever see one error vocabulary.

use std::error::Error;
use std::fmt;

use crate::password_policy::PasswordPolicyError;
use trp::CoreError;
use trp_domain::DomainError;
use trp_persistence::PersistenceError;

/// Errors raised while authenticating or authorizing an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credentials or session token could not be verified.
    AuthenticationFailed { reason: String },
    /// The actor is authenticated but lacks the role for the action.
    Unauthorized {
        action: String,
        required_role: String,
    },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "not authorized to {action}: requires role {required_role}")
            }
        }
    }
}

impl Error for AuthError {}

/// The error surface exposed to callers of the API layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Login or session validation failed.
    AuthenticationFailed { reason: String },
    /// The actor's role does not permit the requested action.
    Unauthorized {
        action: String,
        required_role: String,
    },
    /// A workflow rule rejected the operation.
    DomainRuleViolation { rule: String, message: String },
    /// A field in the submitted data is invalid.
    InvalidInput { field: String, message: String },
    /// The referenced resource does not exist.
    ResourceNotFound {
        resource_type: String,
        message: String,
    },
    /// A password failed the account password policy.
    PasswordPolicyViolation { message: String },
    /// An unexpected failure in storage or serialization.
    Internal { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "not authorized to {action}: requires role {required_role}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "workflow rule {rule} violated: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "invalid input for {field}: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "password policy violation: {message}")
            }
            Self::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(value: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: value.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::RequestNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("visit request"),
                message: format!("no request with id {id}"),
            },
            PersistenceError::AccountNotFound(login) => Self::ResourceNotFound {
                resource_type: String::from("account"),
                message: format!("no account named {login}"),
            },
            PersistenceError::SessionNotFound(_) | PersistenceError::SessionExpired(_) => {
                Self::AuthenticationFailed {
                    reason: value.to_string(),
                }
            }
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into the API error vocabulary.
///
/// Field level failures become `InvalidInput`; rule level failures become
/// `DomainRuleViolation` with a stable rule name callers can branch on.
#[must_use]
pub fn translate_domain_error(error: DomainError) -> ApiError {
    match error {
        DomainError::EmptyField { field } => ApiError::InvalidInput {
            field: String::from(field),
            message: String::from("value must not be empty"),
        },
        DomainError::InvalidDuration { days } => ApiError::InvalidInput {
            field: String::from("duration_days"),
            message: format!("{days} is not a valid visit duration"),
        },
        DomainError::InvalidAdvance { reason } => ApiError::InvalidInput {
            field: String::from("advance"),
            message: reason,
        },
        DomainError::JourneyDateInPast { date } => ApiError::InvalidInput {
            field: String::from("date_of_journey"),
            message: format!("{date} is in the past"),
        },
        DomainError::InvalidStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("{status} is not a recognized status"),
        },
        DomainError::InvalidAction { action } => ApiError::InvalidInput {
            field: String::from("action"),
            message: format!("{action} is not a recognized action"),
        },
        DomainError::InvalidRole { role } => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("{role} is not a recognized role"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_transition"),
                message: format!("cannot move from {from} to {to}: {reason}"),
            }
        }
        DomainError::ActionNotAllowed { action, reason } => ApiError::DomainRuleViolation {
            rule: String::from("action_not_allowed"),
            message: format!("{action} is not allowed: {reason}"),
        },
        DomainError::DuplicateRequest {
            employee_name,
            project,
        } => ApiError::DomainRuleViolation {
            rule: String::from("duplicate_request"),
            message: format!(
                "{employee_name} already submitted a request for {project} today"
            ),
        },
    }
}

/// Translates a core workflow error into the API error vocabulary.
#[must_use]
pub fn translate_core_error(error: CoreError) -> ApiError {
    match error {
        CoreError::DomainViolation(inner) => translate_domain_error(inner),
    }
}
