// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end workflow tests through the API handler layer.

use time::Duration;

use crate::tests::helpers::{
    T0, accounts_actor, admin_actor, employee_actor, manager_actor, submission,
    submit_test_request, test_cause, test_persistence,
};
use crate::{
    AdminActionRequest, ApiError, DuplicateCache, EditRequestBody, ManagerActionRequest,
    admin_action, delete_request, edit_request, get_request, list_requests, mark_paid,
    submit_request,
};

#[test]
fn submitted_request_lands_in_every_pending_queue() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    for actor in [
        employee_actor(),
        manager_actor(),
        admin_actor(),
        accounts_actor(),
    ] {
        let grouped = list_requests(&mut persistence, &actor).unwrap();
        assert_eq!(grouped.pending.len(), 1, "role {}", actor.role);
        assert_eq!(grouped.pending[0].request_id, request_id);
    }
}

#[test]
fn duplicate_same_day_submission_is_rejected() {
    let mut persistence = test_persistence();
    let mut cache = DuplicateCache::new();
    let actor = employee_actor();

    submit_request(
        &mut persistence,
        submission("Boiler Upgrade"),
        &actor,
        &mut cache,
        test_cause(),
        T0,
    )
    .unwrap();

    let error = submit_request(
        &mut persistence,
        submission("Boiler Upgrade"),
        &actor,
        &mut cache,
        test_cause(),
        T0 + Duration::hours(2),
    )
    .unwrap_err();
    assert!(matches!(
        error,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "duplicate_request"
    ));
}

#[test]
fn duplicate_guard_survives_withdrawal_via_cache() {
    let mut persistence = test_persistence();
    let mut cache = DuplicateCache::new();
    let actor = employee_actor();

    let first = submit_request(
        &mut persistence,
        submission("Boiler Upgrade"),
        &actor,
        &mut cache,
        test_cause(),
        T0,
    )
    .unwrap();
    delete_request(
        &mut persistence,
        first.request_id,
        &actor,
        test_cause(),
        T0 + Duration::hours(1),
    )
    .unwrap();

    // The row is gone; only the cache can catch the resubmission.
    let error = submit_request(
        &mut persistence,
        submission("Boiler Upgrade"),
        &actor,
        &mut cache,
        test_cause(),
        T0 + Duration::hours(2),
    )
    .unwrap_err();
    assert!(matches!(error, ApiError::DomainRuleViolation { .. }));
}

#[test]
fn next_day_resubmission_is_allowed() {
    let mut persistence = test_persistence();
    let mut cache = DuplicateCache::new();
    let actor = employee_actor();

    submit_request(
        &mut persistence,
        submission("Boiler Upgrade"),
        &actor,
        &mut cache,
        test_cause(),
        T0,
    )
    .unwrap();
    let second = submit_request(
        &mut persistence,
        submission("Boiler Upgrade"),
        &actor,
        &mut cache,
        test_cause(),
        T0 + Duration::days(1),
    );
    assert!(second.is_ok());
}

#[test]
fn manager_rejection_leaves_admin_queue_open() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    crate::manager_action(
        &mut persistence,
        request_id,
        ManagerActionRequest {
            action: String::from("reject"),
            comment: Some(String::from("budget exhausted")),
        },
        &manager_actor(),
        test_cause(),
        T0,
    )
    .unwrap();

    let manager_view = list_requests(&mut persistence, &manager_actor()).unwrap();
    assert_eq!(manager_view.rejected.len(), 1);

    let admin_view = list_requests(&mut persistence, &admin_actor()).unwrap();
    assert_eq!(admin_view.pending.len(), 1);
    assert!(admin_view.pending[0].capabilities.can_decide);
}

#[test]
fn admin_approval_over_manager_rejection_preserves_both_decisions() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    crate::manager_action(
        &mut persistence,
        request_id,
        ManagerActionRequest {
            action: String::from("reject"),
            comment: None,
        },
        &manager_actor(),
        test_cause(),
        T0,
    )
    .unwrap();
    admin_action(
        &mut persistence,
        request_id,
        AdminActionRequest {
            action: String::from("approve"),
            rejection_reason: None,
            comment: Some(String::from("approved on appeal")),
            confirmed: true,
        },
        &admin_actor(),
        test_cause(),
        T0,
    )
    .unwrap();

    let info = get_request(&mut persistence, request_id, &manager_actor()).unwrap();
    assert_eq!(info.status, "rejected");
    assert_eq!(info.admin_status, "approved");
    assert_eq!(info.bucket, "approved");
    assert_eq!(info.rejected_by.as_deref(), Some("SUNIL"));
    assert_eq!(info.approved_by_admin.as_deref(), Some("ASHA"));
}

#[test]
fn admin_action_requires_confirmation() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    let error = admin_action(
        &mut persistence,
        request_id,
        AdminActionRequest {
            action: String::from("approve"),
            rejection_reason: None,
            comment: None,
            confirmed: false,
        },
        &admin_actor(),
        test_cause(),
        T0,
    )
    .unwrap_err();
    assert!(matches!(
        error,
        ApiError::InvalidInput { ref field, .. } if field == "confirmed"
    ));
}

#[test]
fn admin_rejection_requires_a_reason() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    let error = admin_action(
        &mut persistence,
        request_id,
        AdminActionRequest {
            action: String::from("reject"),
            rejection_reason: Some(String::from("   ")),
            comment: None,
            confirmed: true,
        },
        &admin_actor(),
        test_cause(),
        T0,
    )
    .unwrap_err();
    assert!(matches!(
        error,
        ApiError::InvalidInput { ref field, .. } if field == "rejection_reason"
    ));
}

#[test]
fn payment_happens_exactly_once_after_admin_approval() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    // Not yet admin approved.
    let early = mark_paid(
        &mut persistence,
        request_id,
        &accounts_actor(),
        test_cause(),
        T0,
    );
    assert!(early.is_err());

    admin_action(
        &mut persistence,
        request_id,
        AdminActionRequest {
            action: String::from("approve"),
            rejection_reason: None,
            comment: None,
            confirmed: true,
        },
        &admin_actor(),
        test_cause(),
        T0,
    )
    .unwrap();

    let paid = mark_paid(
        &mut persistence,
        request_id,
        &accounts_actor(),
        test_cause(),
        T0 + Duration::days(1),
    )
    .unwrap();
    assert_eq!(paid.payment_status, "paid");

    let again = mark_paid(
        &mut persistence,
        request_id,
        &accounts_actor(),
        test_cause(),
        T0 + Duration::days(2),
    );
    assert!(again.is_err());

    let accounts_view = list_requests(&mut persistence, &accounts_actor()).unwrap();
    assert_eq!(accounts_view.paid.len(), 1);
    // Other roles keep the request in the approved bucket.
    let employee_view = list_requests(&mut persistence, &employee_actor()).unwrap();
    assert_eq!(employee_view.approved.len(), 1);
}

#[test]
fn manager_edit_is_recorded_with_the_change_set() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    edit_request(
        &mut persistence,
        request_id,
        EditRequestBody {
            advance: Some(2000.0),
            duration_days: Some(5),
            comment: Some(String::from("extended scope")),
        },
        &manager_actor(),
        test_cause(),
        T0 + Duration::hours(1),
    )
    .unwrap();

    let info = get_request(&mut persistence, request_id, &manager_actor()).unwrap();
    assert!((info.advance - 2000.0).abs() < f64::EPSILON);
    assert_eq!(info.duration_days, 5);
    let edit = info.manager_edit.expect("edit should be recorded");
    assert_eq!(edit.edited_by, "SUNIL");
    assert!(edit.advance_change.is_some());
    assert!(edit.duration_change.is_some());
}

#[test]
fn withdrawal_window_closes_after_admin_decision() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    admin_action(
        &mut persistence,
        request_id,
        AdminActionRequest {
            action: String::from("hold"),
            rejection_reason: None,
            comment: None,
            confirmed: true,
        },
        &admin_actor(),
        test_cause(),
        T0,
    )
    .unwrap();

    let error = delete_request(
        &mut persistence,
        request_id,
        &employee_actor(),
        test_cause(),
        T0,
    )
    .unwrap_err();
    assert!(matches!(error, ApiError::DomainRuleViolation { .. }));
}

#[test]
fn employees_cannot_read_each_others_requests() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    let other = crate::AuthenticatedActor {
        account_id: 9,
        login_name: String::from("MEERA"),
        display_name: String::from("Meera Iyer"),
        role: crate::Role::Employee,
    };
    let error = get_request(&mut persistence, request_id, &other).unwrap_err();
    assert!(matches!(error, ApiError::Unauthorized { .. }));
}

#[test]
fn decisions_fan_out_notifications() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    // Submission already notified the manager queue.
    let manager_inbox =
        crate::list_notifications(&mut persistence, &manager_actor(), T0).unwrap();
    assert_eq!(manager_inbox.len(), 1);

    crate::manager_action(
        &mut persistence,
        request_id,
        ManagerActionRequest {
            action: String::from("approve"),
            comment: None,
        },
        &manager_actor(),
        test_cause(),
        T0,
    )
    .unwrap();

    let admin_unread = crate::unread_notifications(&mut persistence, &admin_actor()).unwrap();
    assert_eq!(admin_unread.unread, 1);
    let employee_unread =
        crate::unread_notifications(&mut persistence, &employee_actor()).unwrap();
    assert_eq!(employee_unread.unread, 1);

    let changed = crate::mark_all_notifications_read(&mut persistence, &admin_actor()).unwrap();
    assert_eq!(changed, 1);
    let admin_unread = crate::unread_notifications(&mut persistence, &admin_actor()).unwrap();
    assert_eq!(admin_unread.unread, 0);
}
