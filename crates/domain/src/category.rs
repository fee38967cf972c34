// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request bucketing for role-specific listings.
//!
//! Each role sees the same request set sliced into buckets. The bucket a
//! request lands in is derived from the two approval tracks and the
//! payment latch, with a strict precedence: payment first (for the
//! accounts desk), then the administrator's decision, then the manager's.

use serde::{Deserialize, Serialize};

use crate::status::ApprovalStatus;
use crate::types::{RoleView, VisitRequest};

/// The display bucket a request is filed under in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Awaiting a decision.
    Pending,
    /// Deferred, awaiting a final decision.
    OnHold,
    /// Approved and, where relevant, awaiting payment.
    Approved,
    /// Rejected.
    Rejected,
    /// Advance disbursed. Only surfaced to the accounts desk.
    Paid,
}

impl Bucket {
    /// Returns the string representation used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnHold => "on_hold",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps an approval track status straight to a bucket.
const fn track_bucket(status: ApprovalStatus) -> Bucket {
    match status {
        ApprovalStatus::Pending => Bucket::Pending,
        ApprovalStatus::OnHold => Bucket::OnHold,
        ApprovalStatus::Approved => Bucket::Approved,
        ApprovalStatus::Rejected => Bucket::Rejected,
    }
}

/// Derives the combined display bucket for a request.
///
/// The administrator's decision outranks the manager's: once the admin
/// track has left pending, that decision is what the request displays
/// as. Before then the manager's track shows through. When `include_paid`
/// is set, a disbursed advance outranks everything.
const fn combined_bucket(request: &VisitRequest, include_paid: bool) -> Bucket {
    if include_paid && request.payment_status.is_paid() {
        return Bucket::Paid;
    }
    match request.admin_status {
        ApprovalStatus::Pending => track_bucket(request.status),
        decided => track_bucket(decided),
    }
}

/// Returns the bucket a request is filed under for the given role view.
///
/// The administrator reviews their own track in isolation, so their view
/// buckets purely by `admin_status`. The accounts desk sees paid
/// requests pulled out into their own bucket. Everyone else sees the
/// combined view without a paid bucket.
#[must_use]
pub const fn bucket_for_role(request: &VisitRequest, role: RoleView) -> Bucket {
    match role {
        RoleView::Admin => track_bucket(request.admin_status),
        RoleView::Accounts => combined_bucket(request, true),
        RoleView::Employee | RoleView::Manager => combined_bucket(request, false),
    }
}

/// Requests grouped into display buckets, each bucket newest-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedRequests {
    /// Requests awaiting a decision.
    pub pending: Vec<VisitRequest>,
    /// Requests on hold.
    pub on_hold: Vec<VisitRequest>,
    /// Approved requests.
    pub approved: Vec<VisitRequest>,
    /// Rejected requests.
    pub rejected: Vec<VisitRequest>,
    /// Paid requests. Empty for every role except the accounts desk.
    pub paid: Vec<VisitRequest>,
}

impl GroupedRequests {
    /// Total number of requests across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
            + self.on_hold.len()
            + self.approved.len()
            + self.rejected.len()
            + self.paid.len()
    }

    /// Returns true if every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups requests into buckets for the given role view.
///
/// Within each bucket requests are ordered by submission time, newest
/// first. Requests submitted at the same instant keep their input order.
#[must_use]
pub fn group_requests(requests: &[VisitRequest], role: RoleView) -> GroupedRequests {
    let mut ordered: Vec<VisitRequest> = requests.to_vec();
    ordered.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let mut grouped = GroupedRequests::default();
    for request in ordered {
        let bucket = bucket_for_role(&request, role);
        match bucket {
            Bucket::Pending => grouped.pending.push(request),
            Bucket::OnHold => grouped.on_hold.push(request),
            Bucket::Approved => grouped.approved.push(request),
            Bucket::Rejected => grouped.rejected.push(request),
            Bucket::Paid => grouped.paid.push(request),
        }
    }
    grouped
}
