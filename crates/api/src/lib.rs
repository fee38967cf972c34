// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the travel request portal.
//!
//! This crate sits between the transport layer and the workflow core. It
//! authenticates actors, authorizes each action by role, translates wire
//! data into domain types, and turns workflow outcomes back into response
//! objects with a single error vocabulary.

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

mod auth;
mod capabilities;
mod csv_export;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedActor, AuthenticationService, AuthorizationService, DEFAULT_SESSION_EXPIRATION,
    Role,
};
pub use capabilities::RequestCapabilities;
pub use csv_export::export_paid_register;
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    DuplicateCache, admin_action, create_account, delete_request, edit_request, get_request,
    list_my_requests, list_notifications, list_requests, login, logout, manager_action,
    mark_all_notifications_read, mark_notification_read, mark_paid, submit_request,
    unread_notifications, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ActionResponse, AdminActionRequest, CreateAccountRequest, CreateAccountResponse,
    DeleteResponse, EditRequestBody, GroupedRequestsResponse, LoginRequest, LoginResponse,
    ManagerActionRequest, MarkPaidResponse, NotificationInfo, RequestInfo, SubmitVisitRequest,
    SubmitVisitResponse, UnreadCountResponse, WhoAmIResponse,
};
