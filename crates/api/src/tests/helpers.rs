// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::OffsetDateTime;
use time::macros::datetime;
use trp_audit::Cause;
use trp_persistence::SqlitePersistence;

use crate::{AuthenticatedActor, DuplicateCache, Role, SubmitVisitRequest};

pub const T0: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

pub fn test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("in-memory database should open")
}

pub fn employee_actor() -> AuthenticatedActor {
    AuthenticatedActor {
        account_id: 1,
        login_name: String::from("RAVI"),
        display_name: String::from("Ravi Kumar"),
        role: Role::Employee,
    }
}

pub fn manager_actor() -> AuthenticatedActor {
    AuthenticatedActor {
        account_id: 2,
        login_name: String::from("SUNIL"),
        display_name: String::from("Sunil Rao"),
        role: Role::Manager,
    }
}

pub fn admin_actor() -> AuthenticatedActor {
    AuthenticatedActor {
        account_id: 3,
        login_name: String::from("ASHA"),
        display_name: String::from("Asha Patel"),
        role: Role::Admin,
    }
}

pub fn accounts_actor() -> AuthenticatedActor {
    AuthenticatedActor {
        account_id: 4,
        login_name: String::from("PRIYA"),
        display_name: String::from("Priya Sen"),
        role: Role::Accounts,
    }
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("api-req-1"), String::from("API request"))
}

pub fn submission(project: &str) -> SubmitVisitRequest {
    SubmitVisitRequest {
        site_city: String::from("Pune"),
        project: String::from(project),
        reason: String::from("Commissioning support"),
        duration_days: 3,
        advance: Some(1500.0),
        date_of_journey: None,
    }
}

/// Submits a fresh request as the test employee and returns its ID.
pub fn submit_test_request(persistence: &mut SqlitePersistence, project: &str) -> i64 {
    let mut cache = DuplicateCache::new();
    crate::submit_request(
        persistence,
        submission(project),
        &employee_actor(),
        &mut cache,
        test_cause(),
        T0,
    )
    .expect("submission should succeed")
    .request_id
}
