// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Travel Request Portal.
//!
//! A single `SQLite` database (in-memory for tests, file-backed with WAL
//! for the server) holds the visit requests, the append-only audit
//! trail, accounts, sessions, and notifications. The `Persistence`
//! adapter is the only public surface; queries and mutations are
//! internal modules keyed by table concern.

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

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::{Connection, SqliteConnection};
use time::OffsetDateTime;
use trp_audit::AuditEvent;
use trp_domain::VisitRequest;

pub use data_models::{
    AccountData, AuditEventRow, NewNotification, NotificationData, SessionData, format_timestamp,
    parse_timestamp,
};
pub use error::PersistenceError;

/// Counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias kept for call sites that want to name the backend.
pub type SqlitePersistence = Persistence;

/// The storage outcome of persisting a workflow transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// ID of the stored audit event.
    pub event_id: i64,
    /// ID of the affected request; `None` after a withdrawal.
    pub request_id: Option<i64>,
}

/// Persistence adapter for the workflow store.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;

        // WAL gives the HTTP handlers better read concurrency
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Persists a workflow transition: the request change and its audit
    /// event together, in one transaction.
    ///
    /// A fresh request (no ID yet) is inserted and the audit event is
    /// re-scoped to the assigned ID. An existing request is updated in
    /// full. A `None` request is a withdrawal; the stored row named by
    /// the audit event's scope is deleted. If the audit insert fails the
    /// request write rolls back with it; a mutation never lands without
    /// its audit row.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the writes fail.
    pub fn persist_transition(
        &mut self,
        result: &trp::TransitionResult,
        recorded_at: OffsetDateTime,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        let recorded: String = format_timestamp(recorded_at)?;
        self.conn.transaction(|conn| match &result.new_request {
            Some(request) if request.request_id.is_none() => {
                let request_id: i64 = mutations::requests::insert_request(conn, request)?;
                let mut event: AuditEvent = result.audit_event.clone();
                event.request_id = Some(request_id);
                let event_id: i64 =
                    mutations::audit::insert_audit_event(conn, &event, &recorded)?;
                Ok(PersistTransitionResult {
                    event_id,
                    request_id: Some(request_id),
                })
            }
            Some(request) => {
                mutations::requests::update_request(conn, request)?;
                let event_id: i64 =
                    mutations::audit::insert_audit_event(conn, &result.audit_event, &recorded)?;
                Ok(PersistTransitionResult {
                    event_id,
                    request_id: request.request_id,
                })
            }
            None => {
                if let Some(request_id) = result.audit_event.request_id {
                    mutations::requests::delete_request(conn, request_id)?;
                }
                let event_id: i64 =
                    mutations::audit::insert_audit_event(conn, &result.audit_event, &recorded)?;
                Ok(PersistTransitionResult {
                    event_id,
                    request_id: None,
                })
            }
        })
    }

    // ========================================================================
    // Visit requests
    // ========================================================================

    /// Inserts a new request and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn insert_request(&mut self, request: &VisitRequest) -> Result<i64, PersistenceError> {
        mutations::requests::insert_request(&mut self.conn, request)
    }

    /// Fetches a single request by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RequestNotFound` if no row matches.
    pub fn get_request(&mut self, request_id: i64) -> Result<VisitRequest, PersistenceError> {
        queries::requests::get_request(&mut self.conn, request_id)
    }

    /// Lists every request, newest submission first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests(&mut self) -> Result<Vec<VisitRequest>, PersistenceError> {
        queries::requests::list_requests(&mut self.conn)
    }

    /// Lists one employee's requests, newest submission first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests_for_employee(
        &mut self,
        employee_name: &str,
    ) -> Result<Vec<VisitRequest>, PersistenceError> {
        queries::requests::list_requests_for_employee(&mut self.conn, employee_name)
    }

    /// Updates a persisted request in full.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RequestNotFound` if the request has no
    /// ID or no stored row matches it.
    pub fn update_request(&mut self, request: &VisitRequest) -> Result<(), PersistenceError> {
        mutations::requests::update_request(&mut self.conn, request)
    }

    /// Deletes a request.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RequestNotFound` if no row matches.
    pub fn delete_request(&mut self, request_id: i64) -> Result<(), PersistenceError> {
        mutations::requests::delete_request(&mut self.conn, request_id)
    }

    // ========================================================================
    // Audit trail
    // ========================================================================

    /// Persists an audit event and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn record_audit_event(
        &mut self,
        event: &AuditEvent,
        recorded_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let recorded: String = format_timestamp(recorded_at)?;
        mutations::audit::insert_audit_event(&mut self.conn, event, &recorded)
    }

    /// Fetches a single audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EventNotFound` if no row matches.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEventRow, PersistenceError> {
        queries::audit::get_event(&mut self.conn, event_id)
    }

    /// Lists the audit trail for one request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn audit_events_for_request(
        &mut self,
        request_id: i64,
    ) -> Result<Vec<AuditEventRow>, PersistenceError> {
        queries::audit::list_events_for_request(&mut self.conn, request_id)
    }

    // ========================================================================
    // Accounts & sessions
    // ========================================================================

    /// Creates an account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or the insert fails.
    pub fn create_account(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: &str,
        created_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let created: String = format_timestamp(created_at)?;
        mutations::accounts::create_account(
            &mut self.conn,
            login_name,
            display_name,
            password,
            role,
            &created,
        )
    }

    /// Fetches an account by login name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AccountNotFound` if no account matches.
    pub fn get_account_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<AccountData, PersistenceError> {
        queries::accounts::get_account_by_login(&mut self.conn, login_name)
    }

    /// Fetches an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AccountNotFound` if no account matches.
    pub fn get_account_by_id(&mut self, account_id: i64) -> Result<AccountData, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, account_id)
    }

    /// Lists every account, ordered by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_accounts(&mut self) -> Result<Vec<AccountData>, PersistenceError> {
        queries::accounts::list_accounts(&mut self.conn)
    }

    /// Verifies a password against the stored bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AccountNotFound` for a missing account
    /// or a wrong password; the two are deliberately indistinguishable.
    pub fn verify_password(
        &mut self,
        login_name: &str,
        password: &str,
    ) -> Result<AccountData, PersistenceError> {
        queries::accounts::verify_password(&mut self.conn, login_name, password)
    }

    /// Enables or disables an account.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AccountNotFound` if no account matches.
    pub fn set_account_disabled(
        &mut self,
        account_id: i64,
        disabled: bool,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::set_account_disabled(&mut self.conn, account_id, disabled)
    }

    /// Records a successful login time.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AccountNotFound` if no account matches.
    pub fn update_last_login(
        &mut self,
        account_id: i64,
        at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let at: String = format_timestamp(at)?;
        mutations::accounts::update_last_login(&mut self.conn, account_id, &at)
    }

    /// Replaces an account's password with a fresh bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails or no account matches.
    pub fn update_password(
        &mut self,
        account_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::update_password(&mut self.conn, account_id, new_password)
    }

    /// Creates a session row and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        account_id: i64,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let created: String = format_timestamp(created_at)?;
        let expires: String = format_timestamp(expires_at)?;
        mutations::sessions::create_session(
            &mut self.conn,
            session_token,
            account_id,
            &created,
            &expires,
        )
    }

    /// Fetches a session by its token.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SessionNotFound` if no session matches.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<SessionData, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Records session activity.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SessionNotFound` if no session matches.
    pub fn touch_session(
        &mut self,
        session_token: &str,
        at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let at: String = format_timestamp(at)?;
        mutations::sessions::touch_session(&mut self.conn, session_token, &at)
    }

    /// Deletes a session (logout). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes every session belonging to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_sessions_for_account(
        &mut self,
        account_id: i64,
    ) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_sessions_for_account(&mut self.conn, account_id)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Inserts a notification for a role's inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[allow(clippy::too_many_arguments)]
    pub fn notify(
        &mut self,
        recipient_role: &str,
        message: &str,
        notification_type: &str,
        request_id: Option<i64>,
        from_user: Option<&str>,
        from_role: Option<&str>,
        created_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let row: NewNotification = NewNotification {
            recipient_role: String::from(recipient_role),
            message: String::from(message),
            notification_type: String::from(notification_type),
            request_id,
            from_user: from_user.map(String::from),
            from_role: from_role.map(String::from),
            is_read: 0,
            created_at: format_timestamp(created_at)?,
        };
        mutations::notifications::insert_notification(&mut self.conn, &row)
    }

    /// Lists a role's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn notifications_for_role(
        &mut self,
        recipient_role: &str,
    ) -> Result<Vec<NotificationData>, PersistenceError> {
        queries::notifications::list_for_role(&mut self.conn, recipient_role)
    }

    /// Counts a role's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn unread_notification_count(
        &mut self,
        recipient_role: &str,
    ) -> Result<i64, PersistenceError> {
        queries::notifications::unread_count(&mut self.conn, recipient_role)
    }

    /// Marks one notification as read.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no notification matches.
    pub fn mark_notification_read(&mut self, notification_id: i64) -> Result<(), PersistenceError> {
        mutations::notifications::mark_read(&mut self.conn, notification_id)
    }

    /// Marks all of a role's notifications as read; returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_all_notifications_read(
        &mut self,
        recipient_role: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::notifications::mark_all_read(&mut self.conn, recipient_role)
    }

    /// Deletes notifications created before the cutoff; returns how many.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn purge_notifications_before(
        &mut self,
        cutoff: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        let cutoff: String = format_timestamp(cutoff)?;
        mutations::notifications::delete_older_than(&mut self.conn, &cutoff)
    }
}
