// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization for the portal API.
//!
//! Authentication turns credentials or a session token into an
//! [`AuthenticatedActor`]. Authorization checks whether that actor's role
//! permits a given action before any workflow code runs.

use std::fmt;
use std::str::FromStr;

use time::{Duration, OffsetDateTime};

use crate::error::AuthError;
use trp_audit::Actor;
use trp_domain::{DomainError, EditAuthority, RoleView};
use trp_persistence::{SqlitePersistence, parse_timestamp};

/// How long a session remains valid after login.
pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

/// The role assigned to a portal account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Employee,
    Manager,
    Admin,
    Accounts,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Accounts => "accounts",
        }
    }

    /// Parses a role from its stored string form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRole` for an unrecognized role.
    pub fn parse_str(value: &str) -> Result<Self, DomainError> {
        match value {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            "accounts" => Ok(Self::Accounts),
            other => Err(DomainError::InvalidRole {
                role: String::from(other),
            }),
        }
    }

    /// The request listing view this role sees.
    #[must_use]
    pub const fn view(self) -> RoleView {
        match self {
            Self::Employee => RoleView::Employee,
            Self::Manager => RoleView::Manager,
            Self::Admin => RoleView::Admin,
            Self::Accounts => RoleView::Accounts,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An actor whose identity and role have been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub account_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: Role,
}

impl AuthenticatedActor {
    /// Converts this actor into its audit trail representation.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::for_role(self.login_name.clone(), self.role.view())
    }
}

/// Issues and validates sessions backed by persistent storage.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticationService {
    session_expiration: Duration,
}

impl Default for AuthenticationService {
    fn default() -> Self {
        Self {
            session_expiration: DEFAULT_SESSION_EXPIRATION,
        }
    }
}

impl AuthenticationService {
    #[must_use]
    pub const fn new(session_expiration: Duration) -> Self {
        Self { session_expiration }
    }

    /// Verifies credentials and opens a new session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The storage backend holding accounts and sessions.
    /// * `login_name` - The account's login name, matched case-insensitively.
    /// * `password` - The plaintext password to verify.
    /// * `now` - The current time, used for the session window.
    ///
    /// # Returns
    ///
    /// The authenticated actor and the freshly issued session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` for unknown accounts, wrong
    /// passwords, disabled accounts, or malformed stored roles. Unknown
    /// account and wrong password produce the same message.
    pub fn login(
        &self,
        persistence: &mut SqlitePersistence,
        login_name: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(AuthenticatedActor, String), AuthError> {
        let account =
            persistence
                .verify_password(login_name, password)
                .map_err(|_| AuthError::AuthenticationFailed {
                    reason: String::from("invalid login name or password"),
                })?;

        if account.disabled() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("account is disabled"),
            });
        }

        let role =
            Role::parse_str(&account.role).map_err(|error| AuthError::AuthenticationFailed {
                reason: error.to_string(),
            })?;

        let token = generate_session_token(now);
        let expires_at = now + self.session_expiration;
        persistence
            .create_session(&token, account.account_id, now, expires_at)
            .map_err(|error| AuthError::AuthenticationFailed {
                reason: error.to_string(),
            })?;
        persistence
            .update_last_login(account.account_id, now)
            .map_err(|error| AuthError::AuthenticationFailed {
                reason: error.to_string(),
            })?;

        tracing::info!(login_name = %account.login_name, role = %role, "login succeeded");

        Ok((
            AuthenticatedActor {
                account_id: account.account_id,
                login_name: account.login_name,
                display_name: account.display_name,
                role,
            },
            token,
        ))
    }

    /// Resolves a session token into its actor, refreshing activity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` for unknown, expired, or
    /// disabled sessions.
    pub fn validate_session(
        &self,
        persistence: &mut SqlitePersistence,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<AuthenticatedActor, AuthError> {
        let session = persistence
            .get_session_by_token(session_token)
            .map_err(|_| AuthError::AuthenticationFailed {
                reason: String::from("unknown session"),
            })?;

        let expires_at =
            parse_timestamp(&session.expires_at).map_err(|error| {
                AuthError::AuthenticationFailed {
                    reason: error.to_string(),
                }
            })?;
        if now >= expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("session has expired"),
            });
        }

        let account = persistence
            .get_account_by_id(session.account_id)
            .map_err(|error| AuthError::AuthenticationFailed {
                reason: error.to_string(),
            })?;
        if account.disabled() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("account is disabled"),
            });
        }
        let role =
            Role::parse_str(&account.role).map_err(|error| AuthError::AuthenticationFailed {
                reason: error.to_string(),
            })?;

        persistence
            .touch_session(session_token, now)
            .map_err(|error| AuthError::AuthenticationFailed {
                reason: error.to_string(),
            })?;

        Ok(AuthenticatedActor {
            account_id: account.account_id,
            login_name: account.login_name,
            display_name: account.display_name,
            role,
        })
    }

    /// Ends a session. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the delete itself fails.
    pub fn logout(
        &self,
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|error| AuthError::AuthenticationFailed {
                reason: error.to_string(),
            })
    }
}

fn generate_session_token(now: OffsetDateTime) -> String {
    format!(
        "session_{}_{}",
        now.unix_timestamp_nanos(),
        rand::random::<u64>()
    )
}

/// Role checks for each portal action.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService;

impl AuthorizationService {
    /// Only employees submit, edit their own draft data, or withdraw requests.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn authorize_submit(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Employee => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("submit a visit request"),
                required_role: String::from("employee"),
            }),
        }
    }

    /// Only employees withdraw their own requests.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn authorize_delete(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Employee => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("withdraw a visit request"),
                required_role: String::from("employee"),
            }),
        }
    }

    /// Only managers act on the manager approval track.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn authorize_manager_action(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Manager => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("record a manager decision"),
                required_role: String::from("manager"),
            }),
        }
    }

    /// Only administrators act on the admin approval track.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn authorize_admin_action(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("record an admin decision"),
                required_role: String::from("admin"),
            }),
        }
    }

    /// Managers and administrators may adjust advance and duration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the role does not carry the
    /// requested edit authority.
    pub fn authorize_edit(
        actor: &AuthenticatedActor,
        authority: EditAuthority,
    ) -> Result<(), AuthError> {
        match (actor.role, authority) {
            (Role::Manager, EditAuthority::Manager) | (Role::Admin, EditAuthority::Admin) => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("edit request figures"),
                required_role: String::from(match authority {
                    EditAuthority::Manager => "manager",
                    EditAuthority::Admin => "admin",
                }),
            }),
        }
    }

    /// Only the accounts desk settles payments.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn authorize_mark_paid(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Accounts => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("mark a request as paid"),
                required_role: String::from("accounts"),
            }),
        }
    }

    /// Reviewing roles see every request; employees only their own.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for the employee role.
    pub fn authorize_view_all(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Manager | Role::Admin | Role::Accounts => Ok(()),
            Role::Employee => Err(AuthError::Unauthorized {
                action: String::from("list all visit requests"),
                required_role: String::from("manager, admin, or accounts"),
            }),
        }
    }

    /// Only administrators manage accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn authorize_manage_accounts(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("manage accounts"),
                required_role: String::from("admin"),
            }),
        }
    }

    /// Accounts and administrators export the paid register.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn authorize_export(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Accounts | Role::Admin => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("export the paid register"),
                required_role: String::from("accounts or admin"),
            }),
        }
    }
}
