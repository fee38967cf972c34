// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    ApprovalStatus, Bucket, PaymentStatus, RoleView, VisitRequest, bucket_for_role, group_requests,
};

fn request_at(submitted_at: OffsetDateTime) -> VisitRequest {
    VisitRequest::new(
        String::from("Asha Rao"),
        String::from("Pune"),
        String::from("Metro Line 4"),
        String::from("Vendor inspection"),
        3,
        5000.0,
        None,
        submitted_at,
    )
}

fn request_with(
    status: ApprovalStatus,
    admin_status: ApprovalStatus,
    payment_status: PaymentStatus,
) -> VisitRequest {
    let mut req = request_at(datetime!(2026-03-02 09:00 UTC));
    req.status = status;
    req.admin_status = admin_status;
    req.payment_status = payment_status;
    req
}

#[test]
fn test_admin_decision_outranks_manager() {
    let req = request_with(
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
        PaymentStatus::Pending,
    );
    assert_eq!(bucket_for_role(&req, RoleView::Manager), Bucket::Rejected);
    assert_eq!(bucket_for_role(&req, RoleView::Employee), Bucket::Rejected);
    assert_eq!(bucket_for_role(&req, RoleView::Accounts), Bucket::Rejected);
}

#[test]
fn test_manager_track_shows_through_while_admin_pending() {
    let req = request_with(
        ApprovalStatus::OnHold,
        ApprovalStatus::Pending,
        PaymentStatus::Pending,
    );
    assert_eq!(bucket_for_role(&req, RoleView::Manager), Bucket::OnHold);
    assert_eq!(bucket_for_role(&req, RoleView::Admin), Bucket::Pending);
}

#[test]
fn test_paid_bucket_only_for_accounts() {
    let req = request_with(
        ApprovalStatus::Approved,
        ApprovalStatus::Approved,
        PaymentStatus::Paid,
    );
    assert_eq!(bucket_for_role(&req, RoleView::Accounts), Bucket::Paid);
    assert_eq!(bucket_for_role(&req, RoleView::Manager), Bucket::Approved);
    assert_eq!(bucket_for_role(&req, RoleView::Employee), Bucket::Approved);
    assert_eq!(bucket_for_role(&req, RoleView::Admin), Bucket::Approved);
}

#[test]
fn test_bucket_is_deterministic() {
    let req = request_with(
        ApprovalStatus::Rejected,
        ApprovalStatus::OnHold,
        PaymentStatus::Pending,
    );
    let first = bucket_for_role(&req, RoleView::Accounts);
    let second = bucket_for_role(&req, RoleView::Accounts);
    assert_eq!(first, second);
    assert_eq!(first, Bucket::OnHold);
}

#[test]
fn test_grouping_sorts_newest_first_within_buckets() {
    let older = request_at(datetime!(2026-03-01 08:00 UTC));
    let newer = request_at(datetime!(2026-03-02 08:00 UTC));
    let grouped = group_requests(&[older.clone(), newer.clone()], RoleView::Manager);
    assert_eq!(grouped.pending.len(), 2);
    assert_eq!(grouped.pending[0].submitted_at, newer.submitted_at);
    assert_eq!(grouped.pending[1].submitted_at, older.submitted_at);
}

#[test]
fn test_grouping_is_idempotent() {
    let requests = vec![
        request_with(
            ApprovalStatus::Pending,
            ApprovalStatus::Pending,
            PaymentStatus::Pending,
        ),
        request_with(
            ApprovalStatus::Approved,
            ApprovalStatus::Approved,
            PaymentStatus::Paid,
        ),
        request_with(
            ApprovalStatus::Rejected,
            ApprovalStatus::Pending,
            PaymentStatus::Pending,
        ),
    ];
    let first = group_requests(&requests, RoleView::Accounts);
    let second = group_requests(&requests, RoleView::Accounts);
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(first.paid.len(), 1);
    assert_eq!(first.rejected.len(), 1);
    assert_eq!(first.pending.len(), 1);
}

#[test]
fn test_ties_keep_input_order() {
    let same_instant = datetime!(2026-03-02 09:00 UTC);
    let mut first = request_at(same_instant);
    first.project = String::from("Project A");
    let mut second = request_at(same_instant);
    second.project = String::from("Project B");
    let grouped = group_requests(&[first, second], RoleView::Manager);
    assert_eq!(grouped.pending[0].project, "Project A");
    assert_eq!(grouped.pending[1].project, "Project B");
}
