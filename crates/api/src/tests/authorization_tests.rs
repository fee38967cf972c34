// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-based authorization tests for the API boundary.

use crate::tests::helpers::{
    T0, accounts_actor, admin_actor, employee_actor, manager_actor, submission,
    submit_test_request, test_cause, test_persistence,
};
use crate::{
    AdminActionRequest, ApiError, AuthorizationService, DuplicateCache, ManagerActionRequest,
    admin_action, manager_action, mark_paid, submit_request,
};
use trp_domain::EditAuthority;

#[test]
fn only_employees_submit() {
    let mut persistence = test_persistence();
    let mut cache = DuplicateCache::new();

    for actor in [manager_actor(), admin_actor(), accounts_actor()] {
        let error = submit_request(
            &mut persistence,
            submission("Boiler Upgrade"),
            &actor,
            &mut cache,
            test_cause(),
            T0,
        )
        .unwrap_err();
        assert!(
            matches!(error, ApiError::Unauthorized { .. }),
            "role {} should not submit",
            actor.role
        );
    }
}

#[test]
fn only_managers_record_manager_decisions() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    for actor in [employee_actor(), admin_actor(), accounts_actor()] {
        let error = manager_action(
            &mut persistence,
            request_id,
            ManagerActionRequest {
                action: String::from("approve"),
                comment: None,
            },
            &actor,
            test_cause(),
            T0,
        )
        .unwrap_err();
        assert!(matches!(error, ApiError::Unauthorized { .. }));
    }
}

#[test]
fn only_admins_record_admin_decisions() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    let error = admin_action(
        &mut persistence,
        request_id,
        AdminActionRequest {
            action: String::from("approve"),
            rejection_reason: None,
            comment: None,
            confirmed: true,
        },
        &manager_actor(),
        test_cause(),
        T0,
    )
    .unwrap_err();
    assert!(matches!(error, ApiError::Unauthorized { .. }));
}

#[test]
fn only_accounts_marks_paid() {
    let mut persistence = test_persistence();
    let request_id = submit_test_request(&mut persistence, "Boiler Upgrade");

    for actor in [employee_actor(), manager_actor(), admin_actor()] {
        let error = mark_paid(&mut persistence, request_id, &actor, test_cause(), T0).unwrap_err();
        assert!(matches!(error, ApiError::Unauthorized { .. }));
    }
}

#[test]
fn edit_authority_follows_role() {
    assert!(AuthorizationService::authorize_edit(&manager_actor(), EditAuthority::Manager).is_ok());
    assert!(AuthorizationService::authorize_edit(&admin_actor(), EditAuthority::Admin).is_ok());
    assert!(
        AuthorizationService::authorize_edit(&manager_actor(), EditAuthority::Admin).is_err()
    );
    assert!(
        AuthorizationService::authorize_edit(&employee_actor(), EditAuthority::Manager).is_err()
    );
}

#[test]
fn account_management_is_admin_only() {
    assert!(AuthorizationService::authorize_manage_accounts(&admin_actor()).is_ok());
    for actor in [employee_actor(), manager_actor(), accounts_actor()] {
        assert!(AuthorizationService::authorize_manage_accounts(&actor).is_err());
    }
}

#[test]
fn export_is_for_accounts_and_admins() {
    assert!(AuthorizationService::authorize_export(&accounts_actor()).is_ok());
    assert!(AuthorizationService::authorize_export(&admin_actor()).is_ok());
    assert!(AuthorizationService::authorize_export(&employee_actor()).is_err());
    assert!(AuthorizationService::authorize_export(&manager_actor()).is_err());
}
