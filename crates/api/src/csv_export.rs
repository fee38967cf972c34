// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of the paid register for the accounts desk.

use trp_domain::{PaymentStatus, VisitRequest};
use trp_persistence::{SqlitePersistence, format_timestamp};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::ApiError;

/// Column headers for the paid register export.
const EXPORT_HEADERS: &[&str] = &[
    "request_id",
    "employee_name",
    "site_city",
    "project",
    "duration_days",
    "advance",
    "approved_by",
    "approved_by_admin",
    "paid_by",
    "paid_at",
];

/// Renders every paid request as CSV, newest first.
///
/// # Arguments
///
/// * `persistence` - The storage backend holding requests.
/// * `authenticated_actor` - The actor requesting the export.
///
/// # Returns
///
/// The CSV document as UTF-8 bytes, headers included.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` unless the actor is the accounts desk
/// or an admin, or `Internal` if serialization fails.
pub fn export_paid_register(
    persistence: &mut SqlitePersistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<u8>, ApiError> {
    AuthorizationService::authorize_export(authenticated_actor)?;

    let requests: Vec<VisitRequest> = persistence.list_requests()?;
    let paid: Vec<&VisitRequest> = requests
        .iter()
        .filter(|request| request.payment_status == PaymentStatus::Paid)
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|error| ApiError::Internal {
            message: format!("failed to write export headers: {error}"),
        })?;

    for request in paid {
        let paid_at: String = match request.paid_at {
            Some(at) => format_timestamp(at)?,
            None => String::new(),
        };
        writer
            .write_record([
                request
                    .request_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                request.employee_name.clone(),
                request.site_city.clone(),
                request.project.clone(),
                request.duration_days.to_string(),
                format!("{:.2}", request.advance),
                request.approved_by.clone().unwrap_or_default(),
                request.approved_by_admin.clone().unwrap_or_default(),
                request.paid_by.clone().unwrap_or_default(),
                paid_at,
            ])
            .map_err(|error| ApiError::Internal {
                message: format!("failed to write export row: {error}"),
            })?;
    }

    writer.into_inner().map_err(|error| ApiError::Internal {
        message: format!("failed to finish export: {error}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedActor, Role};
    use time::macros::datetime;
    use trp::{Command, apply};
    use trp_audit::{Actor, Cause};
    use trp_domain::{ApprovalAction, VisitRequest};
    use trp_persistence::SqlitePersistence;

    fn accounts_actor() -> AuthenticatedActor {
        AuthenticatedActor {
            account_id: 1,
            login_name: String::from("PRIYA"),
            display_name: String::from("Priya Sen"),
            role: Role::Accounts,
        }
    }

    fn paid_request(persistence: &mut SqlitePersistence) -> i64 {
        let request = VisitRequest::new(
            String::from("RAVI"),
            String::from("Pune"),
            String::from("Boiler Upgrade"),
            String::from("Commissioning support"),
            3,
            1500.0,
            None,
            datetime!(2026-03-02 09:00 UTC),
        );
        let request_id = persistence.insert_request(&request).unwrap();
        let stored = persistence.get_request(request_id).unwrap();

        let actor = Actor::new(String::from("ASHA"), String::from("admin"));
        let cause = Cause::new(String::from("test"), String::from("test"));
        let approved = apply(
            &stored,
            Command::SetAdminStatus {
                action: ApprovalAction::Approve,
                actor_name: String::from("ASHA"),
                rejection_reason: None,
                comment: None,
            },
            actor.clone(),
            cause.clone(),
        )
        .unwrap();
        persistence
            .persist_transition(&approved, datetime!(2026-03-02 10:00 UTC))
            .unwrap();

        let stored = persistence.get_request(request_id).unwrap();
        let paid = apply(
            &stored,
            Command::MarkPaid {
                paid_by: String::from("PRIYA"),
                paid_at: datetime!(2026-03-03 11:00 UTC),
            },
            actor,
            cause,
        )
        .unwrap();
        persistence
            .persist_transition(&paid, datetime!(2026-03-03 11:00 UTC))
            .unwrap();
        request_id
    }

    #[test]
    fn export_contains_only_paid_requests() {
        let mut persistence = SqlitePersistence::new_in_memory().unwrap();
        let paid_id = paid_request(&mut persistence);

        let unpaid = VisitRequest::new(
            String::from("MEERA"),
            String::from("Nagpur"),
            String::from("Site Survey"),
            String::from("Initial survey"),
            2,
            1.0,
            None,
            datetime!(2026-03-04 09:00 UTC),
        );
        persistence.insert_request(&unpaid).unwrap();

        let bytes = export_paid_register(&mut persistence, &accounts_actor()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("request_id,employee_name"));
        assert!(text.contains(&format!("{paid_id},RAVI,Pune,Boiler Upgrade")));
        assert!(!text.contains("MEERA"));
    }

    #[test]
    fn employees_cannot_export() {
        let mut persistence = SqlitePersistence::new_in_memory().unwrap();
        let actor = AuthenticatedActor {
            account_id: 2,
            login_name: String::from("RAVI"),
            display_name: String::from("Ravi Kumar"),
            role: Role::Employee,
        };
        assert!(export_paid_register(&mut persistence, &actor).is_err());
    }
}
