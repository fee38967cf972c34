// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Eligibility predicates for role actions on a request.
//!
//! These are the single source of truth for who may act on a request in
//! a given state. Handlers consult them before attempting a transition,
//! and the capability layer uses them to advise clients which buttons to
//! show.

use crate::status::{ApprovalAction, ApprovalStatus};
use crate::types::VisitRequest;

/// Returns true if the manager may still decide or edit this request.
///
/// The manager's window closes the moment the administrator acts: once
/// the admin track leaves pending, the manager track is frozen, whatever
/// state it is in. Within the window, a terminal manager decision also
/// closes the track.
#[must_use]
pub const fn can_manager_act(request: &VisitRequest) -> bool {
    matches!(request.admin_status, ApprovalStatus::Pending) && request.status.is_open()
}

/// Returns true if the administrator may still decide on this request.
///
/// The administrator may act whenever their own track is open. The
/// manager's decision does not gate the admin: an admin approval can
/// override a manager rejection.
#[must_use]
pub const fn can_admin_act(request: &VisitRequest) -> bool {
    request.admin_status.is_open()
}

/// Returns true if the submitting employee may withdraw this request.
///
/// Withdrawal is allowed only while the administrator has not acted.
/// A manager decision alone does not lock the request in.
#[must_use]
pub const fn can_employee_delete(request: &VisitRequest) -> bool {
    matches!(request.admin_status, ApprovalStatus::Pending)
}

/// Returns true if the manager may edit the advance or duration.
///
/// Edits share the manager's decision window.
#[must_use]
pub const fn can_manager_edit(request: &VisitRequest) -> bool {
    can_manager_act(request)
}

/// Returns true if the administrator may edit the advance or duration.
///
/// Edits share the administrator's decision window.
#[must_use]
pub const fn can_admin_edit(request: &VisitRequest) -> bool {
    can_admin_act(request)
}

/// Returns true if the accounts desk may disburse the advance.
///
/// Payment requires a final admin approval and may happen only once.
#[must_use]
pub const fn can_mark_paid(request: &VisitRequest) -> bool {
    matches!(request.admin_status, ApprovalStatus::Approved)
        && !request.payment_status.is_paid()
}

/// Returns the decision verbs currently open to the manager.
#[must_use]
pub const fn manager_actions(request: &VisitRequest) -> &'static [ApprovalAction] {
    if can_manager_act(request) {
        request.status.available_actions()
    } else {
        &[]
    }
}

/// Returns the decision verbs currently open to the administrator.
#[must_use]
pub const fn admin_actions(request: &VisitRequest) -> &'static [ApprovalAction] {
    if can_admin_act(request) {
        request.admin_status.available_actions()
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn request() -> VisitRequest {
        VisitRequest::new(
            String::from("Asha Rao"),
            String::from("Pune"),
            String::from("Metro Line 4"),
            String::from("Vendor inspection"),
            3,
            5000.0,
            None,
            datetime!(2026-03-02 09:00 UTC),
        )
    }

    #[test]
    fn test_fresh_request_is_open_to_everyone() {
        let req = request();
        assert!(can_manager_act(&req));
        assert!(can_admin_act(&req));
        assert!(can_employee_delete(&req));
        assert!(can_manager_edit(&req));
        assert!(can_admin_edit(&req));
        assert!(!can_mark_paid(&req));
    }

    #[test]
    fn test_admin_decision_freezes_manager_and_employee() {
        let mut req = request();
        req.admin_status = ApprovalStatus::Approved;
        assert!(!can_manager_act(&req));
        assert!(!can_manager_edit(&req));
        assert!(!can_employee_delete(&req));
        assert!(!can_admin_act(&req));
        assert!(can_mark_paid(&req));
    }

    #[test]
    fn test_admin_hold_keeps_admin_window_open() {
        let mut req = request();
        req.admin_status = ApprovalStatus::OnHold;
        assert!(can_admin_act(&req));
        assert!(!can_manager_act(&req));
        assert!(!can_employee_delete(&req));
        assert_eq!(
            admin_actions(&req),
            &[ApprovalAction::Approve, ApprovalAction::Reject]
        );
    }

    #[test]
    fn test_manager_rejection_does_not_gate_admin() {
        let mut req = request();
        req.status = ApprovalStatus::Rejected;
        assert!(!can_manager_act(&req));
        assert!(can_admin_act(&req));
        assert_eq!(admin_actions(&req).len(), 3);
    }

    #[test]
    fn test_paid_request_cannot_be_paid_again() {
        let mut req = request();
        req.admin_status = ApprovalStatus::Approved;
        req.payment_status = crate::PaymentStatus::Paid;
        assert!(!can_mark_paid(&req));
    }

    #[test]
    fn test_manager_actions_narrow_after_own_hold() {
        let mut req = request();
        req.status = ApprovalStatus::OnHold;
        assert_eq!(
            manager_actions(&req),
            &[ApprovalAction::Approve, ApprovalAction::Reject]
        );
    }
}
