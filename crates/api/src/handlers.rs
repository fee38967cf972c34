// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every mutation goes through the same shape: authorize the actor, build a
//! workflow command, apply it against the stored request, persist the
//! transition together with its audit event, then fan out notifications.

use std::collections::HashMap;

use time::{Duration, OffsetDateTime};

use trp::{Command, TransitionResult, apply, apply_submit};
use trp_audit::Cause;
use trp_domain::{
    ApprovalAction, ApprovalStatus, DEFAULT_ADVANCE, EditAuthority, GroupedRequests,
    LastSubmission, VisitRequest, check_duplicate, group_requests,
};
use trp_persistence::{NotificationData, SqlitePersistence};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ActionResponse, AdminActionRequest, CreateAccountRequest, CreateAccountResponse,
    DeleteResponse, EditRequestBody, GroupedRequestsResponse, LoginRequest, LoginResponse,
    ManagerActionRequest, MarkPaidResponse, NotificationInfo, RequestInfo, SubmitVisitRequest,
    SubmitVisitResponse, UnreadCountResponse, WhoAmIResponse,
};

/// Notifications older than this are purged when a role opens its inbox.
const NOTIFICATION_RETENTION: Duration = Duration::days(30);

/// Per-employee cache of the last accepted submission.
///
/// Backs the same-day duplicate guard when the stored rows are not
/// conclusive, for example right after a withdrawal. Keys are uppercase
/// login names.
#[derive(Debug, Default)]
pub struct DuplicateCache {
    entries: HashMap<String, LastSubmission>,
}

impl DuplicateCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, login_name: &str) -> Option<&LastSubmission> {
        self.entries.get(&login_name.to_uppercase())
    }

    pub fn remember(&mut self, login_name: &str, submission: LastSubmission) {
        self.entries.insert(login_name.to_uppercase(), submission);
    }
}

/// Authenticates an account and opens a session.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for bad credentials or a
/// disabled account.
pub fn login(
    persistence: &mut SqlitePersistence,
    request: LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let service: AuthenticationService = AuthenticationService::default();
    let (actor, token) = service.login(persistence, &request.login_name, &request.password, now)?;

    Ok(LoginResponse {
        session_token: token,
        login_name: actor.login_name.clone(),
        display_name: actor.display_name,
        role: String::from(actor.role.as_str()),
        message: format!("Welcome, {}", actor.login_name),
    })
}

/// Ends the session behind a token.
///
/// # Errors
///
/// Returns an error only if the session delete itself fails.
pub fn logout(persistence: &mut SqlitePersistence, session_token: &str) -> Result<(), ApiError> {
    let service: AuthenticationService = AuthenticationService::default();
    service.logout(persistence, session_token)?;
    Ok(())
}

/// Describes the actor behind a validated session.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor) -> WhoAmIResponse {
    WhoAmIResponse {
        login_name: actor.login_name.clone(),
        display_name: actor.display_name.clone(),
        role: String::from(actor.role.as_str()),
    }
}

/// Creates a portal account after policy checks.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the password fails
/// policy, the role is unknown, or the login name is taken.
pub fn create_account(
    persistence: &mut SqlitePersistence,
    request: CreateAccountRequest,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<CreateAccountResponse, ApiError> {
    AuthorizationService::authorize_manage_accounts(authenticated_actor)?;

    let role: Role = Role::parse_str(&request.role).map_err(translate_domain_error)?;
    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.password,
        &request.confirmation,
        &request.login_name,
        &request.display_name,
    )?;

    let account_id: i64 = persistence.create_account(
        &request.login_name,
        &request.display_name,
        &request.password,
        role.as_str(),
        now,
    )?;

    tracing::info!(
        login_name = %request.login_name,
        role = %role,
        created_by = %authenticated_actor.login_name,
        "account created"
    );

    Ok(CreateAccountResponse {
        account_id,
        login_name: request.login_name.to_uppercase(),
        role: String::from(role.as_str()),
        message: format!("Account created for {}", request.login_name.to_uppercase()),
    })
}

/// Submits a new visit request for the acting employee.
///
/// Runs field validation and the same-calendar-day duplicate guard before
/// anything is stored, then records the submission, updates the duplicate
/// cache, and notifies the manager queue.
///
/// # Errors
///
/// Returns an error if the actor is not an employee, a field is invalid,
/// or an equivalent active request was already submitted today.
pub fn submit_request(
    persistence: &mut SqlitePersistence,
    request: SubmitVisitRequest,
    authenticated_actor: &AuthenticatedActor,
    duplicate_cache: &mut DuplicateCache,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<SubmitVisitResponse, ApiError> {
    AuthorizationService::authorize_submit(authenticated_actor)?;

    let candidate: VisitRequest = VisitRequest::new(
        authenticated_actor.login_name.clone(),
        request.site_city,
        request.project,
        request.reason,
        request.duration_days,
        request.advance.unwrap_or(DEFAULT_ADVANCE),
        request.date_of_journey,
        now,
    );

    let existing: Vec<VisitRequest> =
        persistence.list_requests_for_employee(&candidate.employee_name)?;
    check_duplicate(
        &candidate,
        &existing,
        duplicate_cache.get(&authenticated_actor.login_name),
        now.date(),
    )
    .map_err(translate_domain_error)?;

    let transition: TransitionResult = apply_submit(
        candidate.clone(),
        authenticated_actor.to_audit_actor(),
        cause,
        now.date(),
    )
    .map_err(translate_core_error)?;

    let persisted = persistence.persist_transition(&transition, now)?;
    let request_id: i64 = persisted.request_id.ok_or_else(|| ApiError::Internal {
        message: String::from("submission produced no stored request"),
    })?;

    duplicate_cache.remember(
        &authenticated_actor.login_name,
        LastSubmission::capture(&candidate, now.date()),
    );

    persistence.notify(
        Role::Manager.as_str(),
        &format!(
            "{} submitted a visit request for {}",
            candidate.employee_name, candidate.project
        ),
        "request_submitted",
        Some(request_id),
        Some(&authenticated_actor.login_name),
        Some(authenticated_actor.role.as_str()),
        now,
    )?;

    tracing::info!(request_id, employee = %candidate.employee_name, "visit request submitted");

    Ok(SubmitVisitResponse {
        request_id,
        message: format!("Visit request {request_id} submitted"),
    })
}

/// Lists requests grouped into display buckets for the acting role.
///
/// Employees see only their own submissions; reviewing roles see all.
///
/// # Errors
///
/// Returns an error if the listing query fails.
pub fn list_requests(
    persistence: &mut SqlitePersistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<GroupedRequestsResponse, ApiError> {
    let requests: Vec<VisitRequest> = match authenticated_actor.role {
        Role::Employee => {
            persistence.list_requests_for_employee(&authenticated_actor.login_name)?
        }
        Role::Manager | Role::Admin | Role::Accounts => persistence.list_requests()?,
    };

    Ok(grouped_response(&requests, authenticated_actor))
}

/// Lists only the acting user's own submissions, grouped into buckets.
///
/// Unlike [`list_requests`] this never widens to other employees' data,
/// whatever the role.
///
/// # Errors
///
/// Returns an error if the listing query fails.
pub fn list_my_requests(
    persistence: &mut SqlitePersistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<GroupedRequestsResponse, ApiError> {
    let requests: Vec<VisitRequest> =
        persistence.list_requests_for_employee(&authenticated_actor.login_name)?;
    Ok(grouped_response(&requests, authenticated_actor))
}

fn grouped_response(
    requests: &[VisitRequest],
    authenticated_actor: &AuthenticatedActor,
) -> GroupedRequestsResponse {
    let grouped: GroupedRequests = group_requests(requests, authenticated_actor.role.view());
    let render = |bucket: Vec<VisitRequest>| -> Vec<RequestInfo> {
        bucket
            .iter()
            .map(|request| RequestInfo::from_request(request, authenticated_actor))
            .collect()
    };

    GroupedRequestsResponse {
        pending: render(grouped.pending),
        on_hold: render(grouped.on_hold),
        approved: render(grouped.approved),
        rejected: render(grouped.rejected),
        paid: render(grouped.paid),
    }
}

/// Fetches one request rendered for the acting role.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for an unknown ID, or
/// `Unauthorized` if an employee asks for someone else's request.
pub fn get_request(
    persistence: &mut SqlitePersistence,
    request_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RequestInfo, ApiError> {
    let request: VisitRequest = persistence.get_request(request_id)?;

    if authenticated_actor.role == Role::Employee
        && !request
            .employee_name
            .trim()
            .eq_ignore_ascii_case(authenticated_actor.login_name.trim())
    {
        return Err(ApiError::Unauthorized {
            action: String::from("view another employee's request"),
            required_role: String::from("manager, admin, or accounts"),
        });
    }

    Ok(RequestInfo::from_request(&request, authenticated_actor))
}

/// Records a manager decision on a request.
///
/// # Errors
///
/// Returns an error if the actor is not a manager, the verb is unknown,
/// or the manager window is closed for this request.
pub fn manager_action(
    persistence: &mut SqlitePersistence,
    request_id: i64,
    request: ManagerActionRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ActionResponse, ApiError> {
    AuthorizationService::authorize_manager_action(authenticated_actor)?;

    let action: ApprovalAction =
        ApprovalAction::parse_str(&request.action).map_err(translate_domain_error)?;
    let stored: VisitRequest = persistence.get_request(request_id)?;

    let command: Command = Command::SetManagerStatus {
        action,
        actor_name: authenticated_actor.login_name.clone(),
        comment: request.comment,
    };
    let transition: TransitionResult = apply(
        &stored,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    persistence.persist_transition(&transition, now)?;

    let updated: VisitRequest = transition.new_request.ok_or_else(|| ApiError::Internal {
        message: String::from("decision produced no updated request"),
    })?;

    notify_decision(
        persistence,
        &updated,
        authenticated_actor,
        action,
        "manager",
        now,
    )?;
    if action == ApprovalAction::Approve {
        persistence.notify(
            Role::Admin.as_str(),
            &format!(
                "Request {request_id} from {} awaits your decision",
                updated.employee_name
            ),
            "awaiting_admin",
            Some(request_id),
            Some(&authenticated_actor.login_name),
            Some(authenticated_actor.role.as_str()),
            now,
        )?;
    }

    Ok(ActionResponse {
        request_id,
        status: String::from(updated.status.as_str()),
        admin_status: String::from(updated.admin_status.as_str()),
        message: format!("Manager decision recorded for request {request_id}"),
    })
}

/// Records an admin decision on a request.
///
/// Admin decisions are final once approved or rejected, so the caller
/// must set `confirmed`, and a rejection must carry a reason.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the confirmation or
/// rejection reason is missing, or the admin track is already closed.
pub fn admin_action(
    persistence: &mut SqlitePersistence,
    request_id: i64,
    request: AdminActionRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ActionResponse, ApiError> {
    AuthorizationService::authorize_admin_action(authenticated_actor)?;

    if !request.confirmed {
        return Err(ApiError::InvalidInput {
            field: String::from("confirmed"),
            message: String::from("admin decisions are final and must be confirmed"),
        });
    }

    let action: ApprovalAction =
        ApprovalAction::parse_str(&request.action).map_err(translate_domain_error)?;
    let rejection_reason: Option<String> = match (action, request.rejection_reason) {
        (ApprovalAction::Reject, None) => {
            return Err(ApiError::InvalidInput {
                field: String::from("rejection_reason"),
                message: String::from("a rejection must carry a reason"),
            });
        }
        (ApprovalAction::Reject, Some(reason)) if reason.trim().is_empty() => {
            return Err(ApiError::InvalidInput {
                field: String::from("rejection_reason"),
                message: String::from("a rejection must carry a reason"),
            });
        }
        (_, reason) => reason,
    };

    let stored: VisitRequest = persistence.get_request(request_id)?;
    let overriding_manager: bool =
        action == ApprovalAction::Approve && stored.status == ApprovalStatus::Rejected;

    let command: Command = Command::SetAdminStatus {
        action,
        actor_name: authenticated_actor.login_name.clone(),
        rejection_reason,
        comment: request.comment,
    };
    let transition: TransitionResult = apply(
        &stored,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    persistence.persist_transition(&transition, now)?;

    let updated: VisitRequest = transition.new_request.ok_or_else(|| ApiError::Internal {
        message: String::from("decision produced no updated request"),
    })?;

    if overriding_manager {
        tracing::warn!(
            request_id,
            admin = %authenticated_actor.login_name,
            "admin approval overrides a manager rejection"
        );
    }

    notify_decision(
        persistence,
        &updated,
        authenticated_actor,
        action,
        "admin",
        now,
    )?;
    if action == ApprovalAction::Approve {
        persistence.notify(
            Role::Accounts.as_str(),
            &format!(
                "Request {request_id} from {} is approved for payment",
                updated.employee_name
            ),
            "awaiting_payment",
            Some(request_id),
            Some(&authenticated_actor.login_name),
            Some(authenticated_actor.role.as_str()),
            now,
        )?;
    }

    Ok(ActionResponse {
        request_id,
        status: String::from(updated.status.as_str()),
        admin_status: String::from(updated.admin_status.as_str()),
        message: format!("Admin decision recorded for request {request_id}"),
    })
}

/// Adjusts a request's advance or duration before a final decision.
///
/// The edit authority follows the actor's role; managers edit only while
/// their window is open, admins until their own decision is final.
///
/// # Errors
///
/// Returns an error if the role carries no edit authority, a figure is
/// invalid, or the relevant window is closed.
pub fn edit_request(
    persistence: &mut SqlitePersistence,
    request_id: i64,
    body: EditRequestBody,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ActionResponse, ApiError> {
    let authority: EditAuthority = match authenticated_actor.role {
        Role::Manager => EditAuthority::Manager,
        Role::Admin => EditAuthority::Admin,
        _ => {
            return Err(ApiError::Unauthorized {
                action: String::from("edit request figures"),
                required_role: String::from("manager or admin"),
            });
        }
    };
    AuthorizationService::authorize_edit(authenticated_actor, authority)?;

    let stored: VisitRequest = persistence.get_request(request_id)?;
    let command: Command = Command::EditRequest {
        authority,
        editor_name: authenticated_actor.login_name.clone(),
        advance: body.advance,
        duration_days: body.duration_days,
        comment: body.comment,
        edited_at: now,
    };
    let transition: TransitionResult = apply(
        &stored,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    persistence.persist_transition(&transition, now)?;

    let updated: VisitRequest = transition.new_request.ok_or_else(|| ApiError::Internal {
        message: String::from("edit produced no updated request"),
    })?;

    Ok(ActionResponse {
        request_id,
        status: String::from(updated.status.as_str()),
        admin_status: String::from(updated.admin_status.as_str()),
        message: format!("Request {request_id} updated"),
    })
}

/// Settles payment for an admin-approved request.
///
/// # Errors
///
/// Returns an error if the actor is not the accounts desk, the request
/// lacks a final admin approval, or it was already paid.
pub fn mark_paid(
    persistence: &mut SqlitePersistence,
    request_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<MarkPaidResponse, ApiError> {
    AuthorizationService::authorize_mark_paid(authenticated_actor)?;

    let stored: VisitRequest = persistence.get_request(request_id)?;
    let command: Command = Command::MarkPaid {
        paid_by: authenticated_actor.login_name.clone(),
        paid_at: now,
    };
    let transition: TransitionResult = apply(
        &stored,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    persistence.persist_transition(&transition, now)?;

    let updated: VisitRequest = transition.new_request.ok_or_else(|| ApiError::Internal {
        message: String::from("payment produced no updated request"),
    })?;

    persistence.notify(
        Role::Employee.as_str(),
        &format!(
            "The advance for request {request_id} has been paid to {}",
            updated.employee_name
        ),
        "payment_settled",
        Some(request_id),
        Some(&authenticated_actor.login_name),
        Some(authenticated_actor.role.as_str()),
        now,
    )?;

    tracing::info!(request_id, paid_by = %authenticated_actor.login_name, "payment settled");

    Ok(MarkPaidResponse {
        request_id,
        payment_status: String::from(updated.payment_status.as_str()),
        message: format!("Request {request_id} marked as paid"),
    })
}

/// Withdraws a request while the admin track is still pending.
///
/// # Errors
///
/// Returns an error if the actor is not the submitting employee or the
/// withdrawal window has closed.
pub fn delete_request(
    persistence: &mut SqlitePersistence,
    request_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<DeleteResponse, ApiError> {
    AuthorizationService::authorize_delete(authenticated_actor)?;

    let stored: VisitRequest = persistence.get_request(request_id)?;
    let command: Command = Command::DeleteRequest {
        employee_name: authenticated_actor.login_name.clone(),
    };
    let transition: TransitionResult = apply(
        &stored,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    persistence.persist_transition(&transition, now)?;

    tracing::info!(request_id, employee = %authenticated_actor.login_name, "request withdrawn");

    Ok(DeleteResponse {
        request_id,
        message: format!("Request {request_id} withdrawn"),
    })
}

/// Lists the acting role's notifications, purging expired ones first.
///
/// # Errors
///
/// Returns an error if the purge or the listing query fails.
pub fn list_notifications(
    persistence: &mut SqlitePersistence,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<Vec<NotificationInfo>, ApiError> {
    let purged: usize = persistence.purge_notifications_before(now - NOTIFICATION_RETENTION)?;
    if purged > 0 {
        tracing::debug!(purged, "expired notifications removed");
    }

    let rows: Vec<NotificationData> =
        persistence.notifications_for_role(authenticated_actor.role.as_str())?;
    Ok(rows.into_iter().map(notification_info).collect())
}

/// Counts the acting role's unread notifications.
///
/// # Errors
///
/// Returns an error if the count query fails.
pub fn unread_notifications(
    persistence: &mut SqlitePersistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UnreadCountResponse, ApiError> {
    let unread: i64 = persistence.unread_notification_count(authenticated_actor.role.as_str())?;
    Ok(UnreadCountResponse { unread })
}

/// Marks one of the acting role's notifications as read.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the notification does not
/// exist or belongs to another role.
pub fn mark_notification_read(
    persistence: &mut SqlitePersistence,
    notification_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let rows: Vec<NotificationData> =
        persistence.notifications_for_role(authenticated_actor.role.as_str())?;
    if !rows.iter().any(|row| row.notification_id == notification_id) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("notification"),
            message: format!("no notification {notification_id} for this role"),
        });
    }
    persistence.mark_notification_read(notification_id)?;
    Ok(())
}

/// Marks all of the acting role's notifications as read.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_all_notifications_read(
    persistence: &mut SqlitePersistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<usize, ApiError> {
    let changed: usize =
        persistence.mark_all_notifications_read(authenticated_actor.role.as_str())?;
    Ok(changed)
}

fn notify_decision(
    persistence: &mut SqlitePersistence,
    updated: &VisitRequest,
    authenticated_actor: &AuthenticatedActor,
    action: ApprovalAction,
    track: &str,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    let request_id: Option<i64> = updated.request_id;
    let verb: &str = match action {
        ApprovalAction::Approve => "approved",
        ApprovalAction::Hold => "put on hold",
        ApprovalAction::Reject => "rejected",
    };
    persistence.notify(
        Role::Employee.as_str(),
        &format!(
            "Your request for {} was {verb} by the {track}",
            updated.project
        ),
        &format!("{track}_decision"),
        request_id,
        Some(&authenticated_actor.login_name),
        Some(authenticated_actor.role.as_str()),
        now,
    )?;
    Ok(())
}

fn notification_info(row: NotificationData) -> NotificationInfo {
    NotificationInfo {
        notification_id: row.notification_id,
        message: row.message,
        notification_type: row.notification_type,
        request_id: row.request_id,
        from_user: row.from_user,
        from_role: row.from_role,
        is_read: row.is_read != 0,
        created_at: row.created_at,
    }
}
