// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for the Travel Request Portal.
//!
//! This crate defines the vocabulary of the system: visit requests, the
//! two approval tracks (manager and administrator), payment state, role
//! views, and the pure rules that govern what each role may do to a
//! request at any point in its life.
//!
//! Everything in this crate is side-effect free. Functions take values,
//! return values, and never touch a clock, a database, or a network.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod category;
mod duplicate;
mod eligibility;
mod error;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use category::{Bucket, GroupedRequests, bucket_for_role, group_requests};
pub use duplicate::{DEFAULT_ADVANCE, LastSubmission, check_duplicate, is_active};
pub use eligibility::{
    admin_actions, can_admin_act, can_admin_edit, can_employee_delete, can_manager_act,
    can_manager_edit, can_mark_paid, manager_actions,
};
pub use error::DomainError;
pub use status::{ApprovalAction, ApprovalStatus, PaymentStatus};
pub use types::{EditAuthority, FieldChange, ManagerEdit, RoleView, VisitRequest};
pub use validation::validate_request_fields;
