// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use trp_domain::{ApprovalAction, EditAuthority};

/// A command expressing an intent to change a visit request.
///
/// Commands are pure data. They carry everything the transition needs
/// except the request itself, which the caller supplies to `apply`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The reporting manager decides on the manager track.
    SetManagerStatus {
        /// The decision verb.
        action: ApprovalAction,
        /// Display name of the deciding manager.
        actor_name: String,
        /// Optional comment recorded on the request.
        comment: Option<String>,
    },
    /// The administrator decides on the admin track.
    SetAdminStatus {
        /// The decision verb.
        action: ApprovalAction,
        /// Display name of the deciding administrator.
        actor_name: String,
        /// Reason for the decision; required when rejecting.
        rejection_reason: Option<String>,
        /// Optional comment recorded on the request.
        comment: Option<String>,
    },
    /// A reviewer edits the advance amount or duration in flight.
    EditRequest {
        /// Which approval track the editor acts under.
        authority: EditAuthority,
        /// Display name of the editor.
        editor_name: String,
        /// New advance amount, if edited.
        advance: Option<f64>,
        /// New duration in days, if edited.
        duration_days: Option<u32>,
        /// Optional comment recorded on the request.
        comment: Option<String>,
        /// When the edit happened.
        edited_at: OffsetDateTime,
    },
    /// The accounts desk disburses the advance.
    MarkPaid {
        /// Display name of the disbursing operator.
        paid_by: String,
        /// When the advance was disbursed.
        paid_at: OffsetDateTime,
    },
    /// The submitting employee withdraws the request.
    DeleteRequest {
        /// Display name of the withdrawing employee, for ownership check.
        employee_name: String,
    },
}

impl Command {
    /// Returns the action name recorded in the audit trail.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::SetManagerStatus { .. } => "SetManagerStatus",
            Self::SetAdminStatus { .. } => "SetAdminStatus",
            Self::EditRequest { .. } => "EditRequest",
            Self::MarkPaid { .. } => "MarkPaid",
            Self::DeleteRequest { .. } => "DeleteRequest",
        }
    }
}
