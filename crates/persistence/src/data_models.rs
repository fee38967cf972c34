// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and domain conversions for the workflow schema.
//!
//! Timestamps are stored as RFC 3339 text and calendar dates as
//! ISO 8601 (`YYYY-MM-DD`) text. Conversions between rows and domain
//! values live here so queries and mutations stay schema-shaped.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use trp_domain::{ApprovalStatus, ManagerEdit, PaymentStatus, VisitRequest};

use crate::diesel_schema::{accounts, audit_events, notifications, sessions, visit_requests};
use crate::error::PersistenceError;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the stored text is not valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Formats a calendar date for storage.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn format_date(value: Date) -> Result<String, PersistenceError> {
    value
        .format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored calendar date.
///
/// # Errors
///
/// Returns an error if the stored text is not a valid ISO 8601 date.
pub fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// A visit request row as stored.
#[derive(Queryable, Debug, Clone)]
pub struct VisitRequestRow {
    pub request_id: i64,
    pub employee_name: String,
    pub site_city: String,
    pub project: String,
    pub reason: String,
    pub duration_days: i32,
    pub advance: f64,
    pub date_of_journey: Option<String>,
    pub submitted_at: String,
    pub status: String,
    pub admin_status: String,
    pub payment_status: String,
    pub approved_by: Option<String>,
    pub approved_by_admin: Option<String>,
    pub rejected_by: Option<String>,
    pub admin_rejection_reason: Option<String>,
    pub manager_comment: Option<String>,
    pub admin_comment: Option<String>,
    pub paid_at: Option<String>,
    pub paid_by: Option<String>,
    pub manager_edit_json: Option<String>,
}

impl VisitRequestRow {
    /// Converts a stored row into a domain request.
    ///
    /// # Errors
    ///
    /// Returns an error if any stored status, timestamp, or JSON column
    /// fails to parse.
    pub fn into_domain(self) -> Result<VisitRequest, PersistenceError> {
        let status = ApprovalStatus::parse_str(&self.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let admin_status = ApprovalStatus::parse_str(&self.admin_status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let payment_status = PaymentStatus::parse_str(&self.payment_status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        let duration_days = u32::try_from(self.duration_days)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        let date_of_journey = self
            .date_of_journey
            .as_deref()
            .map(parse_date)
            .transpose()?;
        let paid_at = self.paid_at.as_deref().map(parse_timestamp).transpose()?;
        let manager_edit: Option<ManagerEdit> = self
            .manager_edit_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(VisitRequest {
            request_id: Some(self.request_id),
            employee_name: self.employee_name,
            site_city: self.site_city,
            project: self.project,
            reason: self.reason,
            duration_days,
            advance: self.advance,
            date_of_journey,
            submitted_at: parse_timestamp(&self.submitted_at)?,
            status,
            admin_status,
            payment_status,
            approved_by: self.approved_by,
            approved_by_admin: self.approved_by_admin,
            rejected_by: self.rejected_by,
            admin_rejection_reason: self.admin_rejection_reason,
            manager_comment: self.manager_comment,
            admin_comment: self.admin_comment,
            paid_at,
            paid_by: self.paid_by,
            manager_edit,
        })
    }
}

/// Insertable form of a visit request.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = visit_requests)]
pub struct NewVisitRequestRow {
    pub employee_name: String,
    pub site_city: String,
    pub project: String,
    pub reason: String,
    pub duration_days: i32,
    pub advance: f64,
    pub date_of_journey: Option<String>,
    pub submitted_at: String,
    pub status: String,
    pub admin_status: String,
    pub payment_status: String,
    pub approved_by: Option<String>,
    pub approved_by_admin: Option<String>,
    pub rejected_by: Option<String>,
    pub admin_rejection_reason: Option<String>,
    pub manager_comment: Option<String>,
    pub admin_comment: Option<String>,
    pub paid_at: Option<String>,
    pub paid_by: Option<String>,
    pub manager_edit_json: Option<String>,
}

impl NewVisitRequestRow {
    /// Builds an insertable row from a domain request.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp or the manager-edit record fails
    /// to serialize.
    pub fn from_domain(request: &VisitRequest) -> Result<Self, PersistenceError> {
        let duration_days = i32::try_from(request.duration_days)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let manager_edit_json = request
            .manager_edit
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(Self {
            employee_name: request.employee_name.clone(),
            site_city: request.site_city.clone(),
            project: request.project.clone(),
            reason: request.reason.clone(),
            duration_days,
            advance: request.advance,
            date_of_journey: request.date_of_journey.map(format_date).transpose()?,
            submitted_at: format_timestamp(request.submitted_at)?,
            status: String::from(request.status.as_str()),
            admin_status: String::from(request.admin_status.as_str()),
            payment_status: String::from(request.payment_status.as_str()),
            approved_by: request.approved_by.clone(),
            approved_by_admin: request.approved_by_admin.clone(),
            rejected_by: request.rejected_by.clone(),
            admin_rejection_reason: request.admin_rejection_reason.clone(),
            manager_comment: request.manager_comment.clone(),
            admin_comment: request.admin_comment.clone(),
            paid_at: request.paid_at.map(format_timestamp).transpose()?,
            paid_by: request.paid_by.clone(),
            manager_edit_json,
        })
    }
}

/// An account row as stored.
#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    pub account_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_disabled: i32,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl AccountData {
    /// Returns true if the account has been disabled.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.is_disabled != 0
    }
}

/// Insertable form of an account.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = accounts)]
pub struct NewAccount {
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_disabled: i32,
    pub created_at: String,
}

/// A session row as stored.
#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub expires_at: String,
    pub last_active_at: Option<String>,
}

/// Insertable form of a session.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub expires_at: String,
}

/// A notification row as stored.
#[derive(Queryable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub notification_id: i64,
    pub recipient_role: String,
    pub message: String,
    pub notification_type: String,
    pub request_id: Option<i64>,
    pub from_user: Option<String>,
    pub from_role: Option<String>,
    pub is_read: i32,
    pub created_at: String,
}

impl NotificationData {
    /// Returns true if the notification has been read.
    #[must_use]
    pub const fn read(&self) -> bool {
        self.is_read != 0
    }
}

/// Insertable form of a notification.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub recipient_role: String,
    pub message: String,
    pub notification_type: String,
    pub request_id: Option<i64>,
    pub from_user: Option<String>,
    pub from_role: Option<String>,
    pub is_read: i32,
    pub created_at: String,
}

/// An audit event row as stored.
#[derive(Queryable, Debug, Clone)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub request_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot: String,
    pub after_snapshot: String,
    pub recorded_at: String,
}

/// Insertable form of an audit event.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEvent {
    pub request_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot: String,
    pub after_snapshot: String,
    pub recorded_at: String,
}
