// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Advisory capability flags for a request as seen by one actor.
//!
//! These drive what a client renders (buttons, menus) and are recomputed
//! server side before every mutation. They are advice, never enforcement:
//! handlers re-check the same predicates through the workflow layer.

use serde::{Deserialize, Serialize};

use crate::auth::{AuthenticatedActor, Role};
use trp_domain::{
    ApprovalAction, VisitRequest, admin_actions, can_admin_act, can_employee_delete,
    can_manager_act, can_mark_paid, manager_actions,
};

/// What one actor may do with one request right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCapabilities {
    pub can_decide: bool,
    pub can_edit: bool,
    pub can_mark_paid: bool,
    pub can_withdraw: bool,
    /// The decision verbs currently open to this actor, in display order.
    pub available_actions: Vec<String>,
}

impl RequestCapabilities {
    /// Computes the capability set for `actor` against `request`.
    #[must_use]
    pub fn for_actor(request: &VisitRequest, actor: &AuthenticatedActor) -> Self {
        match actor.role {
            Role::Employee => {
                let owns = request
                    .employee_name
                    .trim()
                    .eq_ignore_ascii_case(actor.login_name.trim());
                Self {
                    can_decide: false,
                    can_edit: false,
                    can_mark_paid: false,
                    can_withdraw: owns && can_employee_delete(request),
                    available_actions: Vec::new(),
                }
            }
            Role::Manager => {
                let open = can_manager_act(request);
                Self {
                    can_decide: open,
                    can_edit: open,
                    can_mark_paid: false,
                    can_withdraw: false,
                    available_actions: action_names(manager_actions(request)),
                }
            }
            Role::Admin => {
                let open = can_admin_act(request);
                Self {
                    can_decide: open,
                    can_edit: open,
                    can_mark_paid: false,
                    can_withdraw: false,
                    available_actions: action_names(admin_actions(request)),
                }
            }
            Role::Accounts => Self {
                can_decide: false,
                can_edit: false,
                can_mark_paid: can_mark_paid(request),
                can_withdraw: false,
                available_actions: Vec::new(),
            },
        }
    }
}

fn action_names(actions: &[ApprovalAction]) -> Vec<String> {
    actions
        .iter()
        .map(|action| String::from(action.as_str()))
        .collect()
}
