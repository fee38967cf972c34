// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core entity types for the Travel Request Portal.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::DomainError;
use crate::status::{ApprovalStatus, PaymentStatus};

/// The role through which a request listing is viewed.
///
/// The same request set is bucketed differently depending on who is
/// looking: the accounts desk sees a paid bucket, reviewers do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleView {
    /// The submitting employee.
    Employee,
    /// The reporting manager (first approval track).
    Manager,
    /// The administrator (second approval track).
    Admin,
    /// The accounts desk (payment disbursal).
    Accounts,
}

impl RoleView {
    /// Returns the string representation used in the database and on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Accounts => "accounts",
        }
    }

    /// Parses a role from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRole` if the string does not name a
    /// known role.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            "accounts" => Ok(Self::Accounts),
            _ => Err(DomainError::InvalidRole {
                role: String::from(s),
            }),
        }
    }
}

impl std::str::FromStr for RoleView {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for RoleView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which approval track an in-flight edit is issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAuthority {
    /// Edit performed by the reporting manager.
    Manager,
    /// Edit performed by the administrator.
    Admin,
}

impl EditAuthority {
    /// Returns the string representation used in audit records.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for EditAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single numeric field change recorded during a manager edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Value before the edit.
    pub from: f64,
    /// Value after the edit.
    pub to: f64,
}

impl FieldChange {
    /// Creates a new field change record.
    #[must_use]
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }
}

/// An audit trail entry for an in-flight edit performed by a manager.
///
/// Only the advance amount and the duration may be edited, so the change
/// set is a pair of optional before/after records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerEdit {
    /// Display name of the manager who made the edit.
    pub edited_by: String,
    /// When the edit was made.
    #[serde(with = "time::serde::rfc3339")]
    pub edited_at: OffsetDateTime,
    /// Change to the advance amount, if it was edited.
    pub advance_change: Option<FieldChange>,
    /// Change to the duration in days, if it was edited.
    pub duration_change: Option<FieldChange>,
}

impl ManagerEdit {
    /// Creates a new manager edit record.
    #[must_use]
    pub const fn new(
        edited_by: String,
        edited_at: OffsetDateTime,
        advance_change: Option<FieldChange>,
        duration_change: Option<FieldChange>,
    ) -> Self {
        Self {
            edited_by,
            edited_at,
            advance_change,
            duration_change,
        }
    }
}

/// A travel advance request submitted by an employee.
///
/// The request moves through two independent approval tracks (`status`
/// for the manager, `admin_status` for the administrator) and a one-way
/// payment latch (`payment_status`). The `request_id` is `None` until
/// the request has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRequest {
    /// Database identifier. `None` for a request not yet persisted.
    pub request_id: Option<i64>,
    /// Display name of the submitting employee.
    pub employee_name: String,
    /// Destination site or city of the visit.
    pub site_city: String,
    /// Project the visit is charged against.
    pub project: String,
    /// Stated purpose of the visit.
    pub reason: String,
    /// Planned duration in days. Always at least one.
    pub duration_days: u32,
    /// Requested advance amount. Defaults to a one-unit placeholder when
    /// the employee requests no specific amount.
    pub advance: f64,
    /// Planned start of travel, if the employee provided one.
    pub date_of_journey: Option<Date>,
    /// When the request was submitted.
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    /// Manager approval track.
    pub status: ApprovalStatus,
    /// Administrator approval track.
    pub admin_status: ApprovalStatus,
    /// Payment latch.
    pub payment_status: PaymentStatus,
    /// Manager who last decided on the manager track.
    pub approved_by: Option<String>,
    /// Administrator who last decided on the admin track.
    pub approved_by_admin: Option<String>,
    /// Whoever rejected the request, on either track.
    pub rejected_by: Option<String>,
    /// Reason supplied by the administrator on rejection.
    pub admin_rejection_reason: Option<String>,
    /// Free-form comment from the manager.
    pub manager_comment: Option<String>,
    /// Free-form comment from the administrator.
    pub admin_comment: Option<String>,
    /// When the advance was disbursed.
    #[serde(with = "time::serde::rfc3339::option")]
    pub paid_at: Option<OffsetDateTime>,
    /// Accounts operator who disbursed the advance.
    pub paid_by: Option<String>,
    /// Audit record of the most recent manager edit, if any.
    pub manager_edit: Option<ManagerEdit>,
}

impl VisitRequest {
    /// Creates a fresh, unpersisted request with both tracks pending.
    #[must_use]
    pub const fn new(
        employee_name: String,
        site_city: String,
        project: String,
        reason: String,
        duration_days: u32,
        advance: f64,
        date_of_journey: Option<Date>,
        submitted_at: OffsetDateTime,
    ) -> Self {
        Self {
            request_id: None,
            employee_name,
            site_city,
            project,
            reason,
            duration_days,
            advance,
            date_of_journey,
            submitted_at,
            status: ApprovalStatus::Pending,
            admin_status: ApprovalStatus::Pending,
            payment_status: PaymentStatus::Pending,
            approved_by: None,
            approved_by_admin: None,
            rejected_by: None,
            admin_rejection_reason: None,
            manager_comment: None,
            admin_comment: None,
            paid_at: None,
            paid_by: None,
            manager_edit: None,
        }
    }

    /// Returns a copy of this request with the given database identifier.
    #[must_use]
    pub fn with_id(mut self, request_id: i64) -> Self {
        self.request_id = Some(request_id);
        self
    }
}
