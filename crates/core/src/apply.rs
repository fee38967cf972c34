// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use trp_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use trp_domain::{
    ApprovalAction, DomainError, EditAuthority, FieldChange, ManagerEdit, VisitRequest,
    can_admin_act, can_admin_edit, can_employee_delete, can_manager_act, can_manager_edit,
    can_mark_paid, validate_request_fields,
};

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{TransitionResult, absent_snapshot, request_snapshot};

/// Accepts a fresh submission, producing the validated request and its
/// audit event.
///
/// The duplicate guard runs before this function, against the
/// employee's stored requests; this function only validates fields.
///
/// # Arguments
///
/// * `request` - The unpersisted request built from the submission
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `today` - The current calendar day, for journey date validation
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the accepted request and audit event
/// * `Err(CoreError)` if a field fails validation
///
/// # Errors
///
/// Returns an error if the submission violates domain field rules.
pub fn apply_submit(
    request: VisitRequest,
    actor: Actor,
    cause: Cause,
    today: Date,
) -> Result<TransitionResult, CoreError> {
    validate_request_fields(&request, today)?;

    let before: StateSnapshot = absent_snapshot();
    let after: StateSnapshot = request_snapshot(&request);

    let action: Action = Action::new(
        String::from("SubmitRequest"),
        Some(format!(
            "{} submitted a {}-day visit to {} for project '{}'",
            request.employee_name, request.duration_days, request.site_city, request.project
        )),
    );

    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, request.request_id);

    Ok(TransitionResult {
        new_request: Some(request),
        audit_event,
    })
}

/// Applies a command to an existing request, producing the new request
/// state and audit event.
///
/// The input request is never mutated; the caller persists the result.
///
/// # Arguments
///
/// * `request` - The current request (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new request state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The acting role's eligibility window has closed
/// - The requested status transition violates the state machine
/// - An edited field violates domain rules
#[allow(clippy::too_many_lines)]
pub fn apply(
    request: &VisitRequest,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.action_name();
    let before: StateSnapshot = request_snapshot(request);

    match command {
        Command::SetManagerStatus {
            action,
            actor_name,
            comment,
        } => {
            if !can_manager_act(request) {
                return Err(CoreError::DomainViolation(DomainError::ActionNotAllowed {
                    action: String::from(action_name),
                    reason: String::from(
                        "the manager window is closed; the administrator has already acted \
                         or the manager decision is final",
                    ),
                }));
            }

            let new_status = action.target_status();
            request.status.validate_transition(new_status)?;

            let mut new_request: VisitRequest = request.clone();
            new_request.status = new_status;
            match action {
                ApprovalAction::Approve | ApprovalAction::Hold => {
                    new_request.approved_by = Some(actor_name.clone());
                }
                ApprovalAction::Reject => {
                    new_request.approved_by = Some(actor_name.clone());
                    new_request.rejected_by = Some(actor_name.clone());
                }
            }
            if comment.is_some() {
                new_request.manager_comment = comment;
            }

            let after: StateSnapshot = request_snapshot(&new_request);
            let audit_action: Action = Action::new(
                String::from(action_name),
                Some(format!("{actor_name} set manager status to {new_status}")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                audit_action,
                before,
                after,
                request.request_id,
            );

            Ok(TransitionResult {
                new_request: Some(new_request),
                audit_event,
            })
        }
        Command::SetAdminStatus {
            action,
            actor_name,
            rejection_reason,
            comment,
        } => {
            if !can_admin_act(request) {
                return Err(CoreError::DomainViolation(DomainError::ActionNotAllowed {
                    action: String::from(action_name),
                    reason: String::from("the administrator's decision is already final"),
                }));
            }

            let new_status = action.target_status();
            request.admin_status.validate_transition(new_status)?;

            let mut new_request: VisitRequest = request.clone();
            new_request.admin_status = new_status;
            new_request.approved_by_admin = Some(actor_name.clone());
            match action {
                ApprovalAction::Reject => {
                    new_request.rejected_by = Some(actor_name.clone());
                    new_request.admin_rejection_reason = rejection_reason;
                }
                ApprovalAction::Approve | ApprovalAction::Hold => {}
            }
            if comment.is_some() {
                new_request.admin_comment = comment;
            }

            let after: StateSnapshot = request_snapshot(&new_request);
            let audit_action: Action = Action::new(
                String::from(action_name),
                Some(format!("{actor_name} set admin status to {new_status}")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                audit_action,
                before,
                after,
                request.request_id,
            );

            Ok(TransitionResult {
                new_request: Some(new_request),
                audit_event,
            })
        }
        Command::EditRequest {
            authority,
            editor_name,
            advance,
            duration_days,
            comment,
            edited_at,
        } => {
            let allowed: bool = match authority {
                EditAuthority::Manager => can_manager_edit(request),
                EditAuthority::Admin => can_admin_edit(request),
            };
            if !allowed {
                return Err(CoreError::DomainViolation(DomainError::ActionNotAllowed {
                    action: String::from(action_name),
                    reason: format!("the {authority} edit window is closed"),
                }));
            }

            let mut new_request: VisitRequest = request.clone();
            let mut advance_change: Option<FieldChange> = None;
            let mut duration_change: Option<FieldChange> = None;

            if let Some(new_advance) = advance {
                if !new_advance.is_finite() {
                    return Err(CoreError::DomainViolation(DomainError::InvalidAdvance {
                        reason: String::from("amount is not a finite number"),
                    }));
                }
                if new_advance < 0.0 {
                    return Err(CoreError::DomainViolation(DomainError::InvalidAdvance {
                        reason: String::from("amount must not be negative"),
                    }));
                }
                if (new_advance - request.advance).abs() >= f64::EPSILON {
                    advance_change = Some(FieldChange::new(request.advance, new_advance));
                    new_request.advance = new_advance;
                }
            }

            if let Some(new_duration) = duration_days {
                if new_duration == 0 {
                    return Err(CoreError::DomainViolation(DomainError::InvalidDuration {
                        days: new_duration,
                    }));
                }
                if new_duration != request.duration_days {
                    duration_change = Some(FieldChange::new(
                        f64::from(request.duration_days),
                        f64::from(new_duration),
                    ));
                    new_request.duration_days = new_duration;
                }
            }

            match authority {
                EditAuthority::Manager => {
                    if advance_change.is_some() || duration_change.is_some() {
                        new_request.manager_edit = Some(ManagerEdit::new(
                            editor_name.clone(),
                            edited_at,
                            advance_change,
                            duration_change,
                        ));
                    }
                    if comment.is_some() {
                        new_request.manager_comment = comment;
                    }
                }
                EditAuthority::Admin => {
                    if comment.is_some() {
                        new_request.admin_comment = comment;
                    }
                }
            }

            let after: StateSnapshot = request_snapshot(&new_request);
            let audit_action: Action = Action::new(
                String::from(action_name),
                Some(format!("{editor_name} edited the request as {authority}")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                audit_action,
                before,
                after,
                request.request_id,
            );

            Ok(TransitionResult {
                new_request: Some(new_request),
                audit_event,
            })
        }
        Command::MarkPaid { paid_by, paid_at } => {
            if !can_mark_paid(request) {
                return Err(CoreError::DomainViolation(DomainError::ActionNotAllowed {
                    action: String::from(action_name),
                    reason: String::from(
                        "payment requires a final admin approval and may happen only once",
                    ),
                }));
            }

            let mut new_request: VisitRequest = request.clone();
            new_request.payment_status = trp_domain::PaymentStatus::Paid;
            new_request.paid_at = Some(paid_at);
            new_request.paid_by = Some(paid_by.clone());

            let after: StateSnapshot = request_snapshot(&new_request);
            let audit_action: Action = Action::new(
                String::from(action_name),
                Some(format!("{paid_by} disbursed the advance")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                audit_action,
                before,
                after,
                request.request_id,
            );

            Ok(TransitionResult {
                new_request: Some(new_request),
                audit_event,
            })
        }
        Command::DeleteRequest { employee_name } => {
            if !can_employee_delete(request) {
                return Err(CoreError::DomainViolation(DomainError::ActionNotAllowed {
                    action: String::from(action_name),
                    reason: String::from(
                        "a request cannot be withdrawn once the administrator has acted",
                    ),
                }));
            }
            if !request
                .employee_name
                .trim()
                .eq_ignore_ascii_case(employee_name.trim())
            {
                return Err(CoreError::DomainViolation(DomainError::ActionNotAllowed {
                    action: String::from(action_name),
                    reason: String::from("only the submitting employee may withdraw a request"),
                }));
            }

            let after: StateSnapshot = absent_snapshot();
            let audit_action: Action = Action::new(
                String::from(action_name),
                Some(format!("{employee_name} withdrew the request")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                audit_action,
                before,
                after,
                request.request_id,
            );

            Ok(TransitionResult {
                new_request: None,
                audit_event,
            })
        }
    }
}
