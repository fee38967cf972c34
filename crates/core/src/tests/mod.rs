// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::{date, datetime};
use trp_audit::{Actor, Cause};
use trp_domain::{
    ApprovalAction, ApprovalStatus, DomainError, EditAuthority, PaymentStatus, RoleView,
    VisitRequest,
};

use crate::{Command, CoreError, apply, apply_submit};

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
    .with_id(7)
}

fn actor() -> Actor {
    Actor::for_role(String::from("mgr.kulkarni"), RoleView::Manager)
}

fn cause() -> Cause {
    Cause::new(String::from("test"), String::from("unit test"))
}

#[test]
fn test_submit_accepts_valid_request_with_audit_event() {
    let result = apply_submit(
        request(),
        Actor::for_role(String::from("asha.rao"), RoleView::Employee),
        cause(),
        date!(2026 - 03 - 02),
    )
    .unwrap();

    let accepted = result.new_request.unwrap();
    assert_eq!(accepted.status, ApprovalStatus::Pending);
    assert_eq!(accepted.admin_status, ApprovalStatus::Pending);
    assert_eq!(result.audit_event.action.name, "SubmitRequest");
    assert_eq!(result.audit_event.request_id, Some(7));
}

#[test]
fn test_submit_rejects_invalid_fields() {
    let mut req = request();
    req.duration_days = 0;
    let result = apply_submit(req, actor(), cause(), date!(2026 - 03 - 02));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidDuration { .. }))
    ));
}

#[test]
fn test_manager_approval_records_decider() {
    let command = Command::SetManagerStatus {
        action: ApprovalAction::Approve,
        actor_name: String::from("R. Kulkarni"),
        comment: Some(String::from("Travel justified")),
    };
    let result = apply(&request(), command, actor(), cause()).unwrap();
    let updated = result.new_request.unwrap();

    assert_eq!(updated.status, ApprovalStatus::Approved);
    assert_eq!(updated.approved_by.as_deref(), Some("R. Kulkarni"));
    assert_eq!(updated.manager_comment.as_deref(), Some("Travel justified"));
    assert_eq!(updated.admin_status, ApprovalStatus::Pending);
}

#[test]
fn test_manager_cannot_act_after_admin_decision() {
    let mut req = request();
    req.admin_status = ApprovalStatus::Approved;

    let command = Command::SetManagerStatus {
        action: ApprovalAction::Reject,
        actor_name: String::from("R. Kulkarni"),
        comment: None,
    };
    let result = apply(&req, command, actor(), cause());
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ActionNotAllowed { .. }))
    ));
}

#[test]
fn test_admin_rejection_requires_and_records_reason() {
    let command = Command::SetAdminStatus {
        action: ApprovalAction::Reject,
        actor_name: String::from("S. Verma"),
        rejection_reason: Some(String::from("Budget exhausted for Q1")),
        comment: None,
    };
    let result = apply(&request(), command, actor(), cause()).unwrap();
    let updated = result.new_request.unwrap();

    assert_eq!(updated.admin_status, ApprovalStatus::Rejected);
    assert_eq!(updated.rejected_by.as_deref(), Some("S. Verma"));
    assert_eq!(
        updated.admin_rejection_reason.as_deref(),
        Some("Budget exhausted for Q1")
    );
}

#[test]
fn test_admin_may_approve_over_manager_rejection() {
    let mut req = request();
    req.status = ApprovalStatus::Rejected;

    let command = Command::SetAdminStatus {
        action: ApprovalAction::Approve,
        actor_name: String::from("S. Verma"),
        rejection_reason: None,
        comment: None,
    };
    let result = apply(&req, command, actor(), cause()).unwrap();
    let updated = result.new_request.unwrap();
    assert_eq!(updated.admin_status, ApprovalStatus::Approved);
    assert_eq!(updated.status, ApprovalStatus::Rejected);
}

#[test]
fn test_held_admin_track_cannot_be_held_again() {
    let mut req = request();
    req.admin_status = ApprovalStatus::OnHold;

    let command = Command::SetAdminStatus {
        action: ApprovalAction::Hold,
        actor_name: String::from("S. Verma"),
        rejection_reason: None,
        comment: None,
    };
    let result = apply(&req, command, actor(), cause());
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}

#[test]
fn test_manager_edit_records_change_set() {
    let command = Command::EditRequest {
        authority: EditAuthority::Manager,
        editor_name: String::from("R. Kulkarni"),
        advance: Some(3000.0),
        duration_days: Some(2),
        comment: None,
        edited_at: datetime!(2026-03-02 11:00 UTC),
    };
    let result = apply(&request(), command, actor(), cause()).unwrap();
    let updated = result.new_request.unwrap();

    assert!((updated.advance - 3000.0).abs() < f64::EPSILON);
    assert_eq!(updated.duration_days, 2);
    let edit = updated.manager_edit.unwrap();
    assert_eq!(edit.edited_by, "R. Kulkarni");
    let advance_change = edit.advance_change.unwrap();
    assert!((advance_change.from - 5000.0).abs() < f64::EPSILON);
    assert!((advance_change.to - 3000.0).abs() < f64::EPSILON);
    assert!(edit.duration_change.is_some());
}

#[test]
fn test_noop_edit_leaves_no_change_record() {
    let command = Command::EditRequest {
        authority: EditAuthority::Manager,
        editor_name: String::from("R. Kulkarni"),
        advance: Some(5000.0),
        duration_days: Some(3),
        comment: None,
        edited_at: datetime!(2026-03-02 11:00 UTC),
    };
    let result = apply(&request(), command, actor(), cause()).unwrap();
    assert!(result.new_request.unwrap().manager_edit.is_none());
}

#[test]
fn test_admin_edit_blocked_after_final_decision() {
    let mut req = request();
    req.admin_status = ApprovalStatus::Rejected;

    let command = Command::EditRequest {
        authority: EditAuthority::Admin,
        editor_name: String::from("S. Verma"),
        advance: Some(100.0),
        duration_days: None,
        comment: None,
        edited_at: datetime!(2026-03-02 11:00 UTC),
    };
    assert!(apply(&req, command, actor(), cause()).is_err());
}

#[test]
fn test_mark_paid_requires_admin_approval() {
    let command = Command::MarkPaid {
        paid_by: String::from("A. Iyer"),
        paid_at: datetime!(2026-03-03 10:00 UTC),
    };
    let result = apply(&request(), command, actor(), cause());
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ActionNotAllowed { .. }))
    ));
}

#[test]
fn test_mark_paid_latches_once() {
    let mut req = request();
    req.admin_status = ApprovalStatus::Approved;

    let command = Command::MarkPaid {
        paid_by: String::from("A. Iyer"),
        paid_at: datetime!(2026-03-03 10:00 UTC),
    };
    let result = apply(&req, command.clone(), actor(), cause()).unwrap();
    let paid = result.new_request.unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.paid_by.as_deref(), Some("A. Iyer"));
    assert!(paid.paid_at.is_some());

    let second = apply(&paid, command, actor(), cause());
    assert!(second.is_err());
}

#[test]
fn test_delete_allowed_only_before_admin_acts() {
    let command = Command::DeleteRequest {
        employee_name: String::from("Asha Rao"),
    };
    let result = apply(&request(), command.clone(), actor(), cause()).unwrap();
    assert!(result.new_request.is_none());
    assert_eq!(result.audit_event.after.data, "absent");

    let mut locked = request();
    locked.admin_status = ApprovalStatus::OnHold;
    assert!(apply(&locked, command, actor(), cause()).is_err());
}

#[test]
fn test_delete_enforces_ownership() {
    let command = Command::DeleteRequest {
        employee_name: String::from("Someone Else"),
    };
    let result = apply(&request(), command, actor(), cause());
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ActionNotAllowed { .. }))
    ));
}

#[test]
fn test_every_transition_emits_one_audit_event() {
    let command = Command::SetManagerStatus {
        action: ApprovalAction::Hold,
        actor_name: String::from("R. Kulkarni"),
        comment: None,
    };
    let result = apply(&request(), command, actor(), cause()).unwrap();
    assert_ne!(
        result.audit_event.before.data,
        result.audit_event.after.data
    );
    assert_eq!(result.audit_event.actor.actor_type, "manager");
}
