// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use trp_audit::{AuditEvent, StateSnapshot};
use trp_domain::VisitRequest;

/// The result of applying a command to a request.
///
/// `new_request` is `None` when the command removed the request
/// (withdrawal). Every transition, including removal, carries exactly
/// one audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The request after the transition, or `None` if it was removed.
    pub new_request: Option<VisitRequest>,
    /// The audit event describing the transition.
    pub audit_event: AuditEvent,
}

/// Renders the decision-relevant state of a request as a snapshot.
///
/// The snapshot is deliberately compact: the three status axes plus the
/// editable numeric fields, which is everything a transition can touch.
#[must_use]
pub fn request_snapshot(request: &VisitRequest) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={} admin_status={} payment_status={} advance={} duration_days={}",
        request.status,
        request.admin_status,
        request.payment_status,
        request.advance,
        request.duration_days
    ))
}

/// Snapshot used on either side of a request's existence boundary.
#[must_use]
pub fn absent_snapshot() -> StateSnapshot {
    StateSnapshot::new(String::from("absent"))
}
