// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use time::Date;

use crate::auth::AuthenticatedActor;
use crate::capabilities::RequestCapabilities;
use trp_domain::{ManagerEdit, VisitRequest, bucket_for_role};

/// API request to authenticate an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// The login name, matched case-insensitively.
    pub login_name: String,
    /// The plaintext password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The freshly issued session token.
    pub session_token: String,
    /// The canonical login name.
    pub login_name: String,
    /// The display name to show in the UI.
    pub display_name: String,
    /// The account's role.
    pub role: String,
    /// A success message.
    pub message: String,
}

/// API response describing the actor behind a session token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    pub login_name: String,
    pub display_name: String,
    pub role: String,
}

/// API request to create a new portal account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub login_name: String,
    pub display_name: String,
    pub password: String,
    /// Must match `password` exactly.
    pub confirmation: String,
    /// One of employee, manager, admin, accounts.
    pub role: String,
}

/// API response for a successful account creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateAccountResponse {
    pub account_id: i64,
    pub login_name: String,
    pub role: String,
    pub message: String,
}

/// API request to submit a new visit request.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitVisitRequest {
    pub site_city: String,
    pub project: String,
    pub reason: String,
    pub duration_days: u32,
    /// Requested advance amount; defaults to the advance sentinel when absent.
    pub advance: Option<f64>,
    pub date_of_journey: Option<Date>,
}

/// API response for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitVisitResponse {
    pub request_id: i64,
    pub message: String,
}

/// One visit request as rendered for a specific actor.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestInfo {
    pub request_id: i64,
    pub employee_name: String,
    pub site_city: String,
    pub project: String,
    pub reason: String,
    pub duration_days: u32,
    pub advance: f64,
    pub date_of_journey: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: time::OffsetDateTime,
    pub status: String,
    pub admin_status: String,
    pub payment_status: String,
    /// The display bucket for the viewing role.
    pub bucket: String,
    pub approved_by: Option<String>,
    pub approved_by_admin: Option<String>,
    pub rejected_by: Option<String>,
    pub admin_rejection_reason: Option<String>,
    pub manager_comment: Option<String>,
    pub admin_comment: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub paid_at: Option<time::OffsetDateTime>,
    pub paid_by: Option<String>,
    pub manager_edit: Option<ManagerEdit>,
    pub capabilities: RequestCapabilities,
}

impl RequestInfo {
    /// Builds the rendered form of a request for one actor.
    #[must_use]
    pub fn from_request(request: &VisitRequest, actor: &AuthenticatedActor) -> Self {
        let capabilities = RequestCapabilities::for_actor(request, actor);
        Self {
            request_id: request.request_id.unwrap_or_default(),
            employee_name: request.employee_name.clone(),
            site_city: request.site_city.clone(),
            project: request.project.clone(),
            reason: request.reason.clone(),
            duration_days: request.duration_days,
            advance: request.advance,
            date_of_journey: request.date_of_journey,
            submitted_at: request.submitted_at,
            status: String::from(request.status.as_str()),
            admin_status: String::from(request.admin_status.as_str()),
            payment_status: String::from(request.payment_status.as_str()),
            bucket: String::from(bucket_for_role(request, actor.role.view()).as_str()),
            approved_by: request.approved_by.clone(),
            approved_by_admin: request.approved_by_admin.clone(),
            rejected_by: request.rejected_by.clone(),
            admin_rejection_reason: request.admin_rejection_reason.clone(),
            manager_comment: request.manager_comment.clone(),
            admin_comment: request.admin_comment.clone(),
            paid_at: request.paid_at,
            paid_by: request.paid_by.clone(),
            manager_edit: request.manager_edit.clone(),
            capabilities,
        }
    }
}

/// API response listing requests grouped into display buckets.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupedRequestsResponse {
    pub pending: Vec<RequestInfo>,
    pub on_hold: Vec<RequestInfo>,
    pub approved: Vec<RequestInfo>,
    pub rejected: Vec<RequestInfo>,
    pub paid: Vec<RequestInfo>,
}

impl GroupedRequestsResponse {
    /// Total number of requests across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
            + self.on_hold.len()
            + self.approved.len()
            + self.rejected.len()
            + self.paid.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// API request for a manager decision on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerActionRequest {
    /// One of approve, hold, reject.
    pub action: String,
    pub comment: Option<String>,
}

/// API request for an admin decision on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminActionRequest {
    /// One of approve, hold, reject.
    pub action: String,
    /// Required when the action is reject.
    pub rejection_reason: Option<String>,
    pub comment: Option<String>,
    /// Admin decisions are final; the caller must acknowledge that.
    pub confirmed: bool,
}

/// API response for a recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActionResponse {
    pub request_id: i64,
    pub status: String,
    pub admin_status: String,
    pub message: String,
}

/// API request to adjust advance or duration before a final decision.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequestBody {
    pub advance: Option<f64>,
    pub duration_days: Option<u32>,
    pub comment: Option<String>,
}

/// API response for a settled payment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MarkPaidResponse {
    pub request_id: i64,
    pub payment_status: String,
    pub message: String,
}

/// API response for a withdrawn request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteResponse {
    pub request_id: i64,
    pub message: String,
}

/// One notification as rendered for the recipient role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationInfo {
    pub notification_id: i64,
    pub message: String,
    pub notification_type: String,
    pub request_id: Option<i64>,
    pub from_user: Option<String>,
    pub from_role: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

/// API response with the number of unread notifications for a role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}
