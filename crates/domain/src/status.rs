// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval and payment status state machines.
//!
//! A visit request carries two independent approval tracks (one for the
//! manager, one for the administrator) that share a single state machine,
//! plus a payment flag that only ever moves forward once.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Status of one approval track on a visit request.
///
/// Both the manager track and the administrator track use this enum.
/// The legal transitions are:
///
/// - `Pending` -> `Approved`, `OnHold`, or `Rejected`
/// - `OnHold` -> `Approved` or `Rejected`
/// - `Approved` and `Rejected` are terminal
///
/// A request held once cannot be held again; from hold the decision must
/// resolve one way or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting a decision.
    Pending,
    /// Decision deferred; still awaiting a final call.
    OnHold,
    /// Approved. Terminal for this track.
    Approved,
    /// Rejected. Terminal for this track.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the string representation used in the database and on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnHold => "on_hold",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string does not name a
    /// known status.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "on_hold" => Ok(Self::OnHold),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidStatus {
                status: String::from(s),
            }),
        }
    }

    /// Returns true if no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns true if the track has not yet reached a final decision.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::OnHold)
    }

    /// Validates a transition from this status to `new_status`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` when the transition
    /// is not permitted by the state machine.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: String::from(self.as_str()),
                to: String::from(new_status.as_str()),
                reason: String::from("decision is final and cannot be changed"),
            });
        }

        match (self, new_status) {
            (Self::Pending, Self::Approved | Self::OnHold | Self::Rejected)
            | (Self::OnHold, Self::Approved | Self::Rejected) => Ok(()),
            (Self::OnHold, Self::OnHold) => Err(DomainError::InvalidStatusTransition {
                from: String::from(self.as_str()),
                to: String::from(new_status.as_str()),
                reason: String::from("request is already on hold"),
            }),
            (_, Self::Pending) => Err(DomainError::InvalidStatusTransition {
                from: String::from(self.as_str()),
                to: String::from(new_status.as_str()),
                reason: String::from("a request cannot return to pending"),
            }),
            // Terminal origins were handled by the early return above.
            (Self::Approved | Self::Rejected, _) => {
                Err(DomainError::InvalidStatusTransition {
                    from: String::from(self.as_str()),
                    to: String::from(new_status.as_str()),
                    reason: String::from("decision is final and cannot be changed"),
                })
            }
        }
    }

    /// Returns the actions a reviewer may take from this status.
    ///
    /// Terminal statuses offer no actions. A held request may only be
    /// resolved, not held again.
    #[must_use]
    pub const fn available_actions(&self) -> &'static [ApprovalAction] {
        match self {
            Self::Pending => &[
                ApprovalAction::Approve,
                ApprovalAction::Hold,
                ApprovalAction::Reject,
            ],
            Self::OnHold => &[ApprovalAction::Approve, ApprovalAction::Reject],
            Self::Approved | Self::Rejected => &[],
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision verb a reviewer applies to an approval track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    /// Approve the request on this track.
    Approve,
    /// Put the request on hold for later resolution.
    Hold,
    /// Reject the request on this track.
    Reject,
}

impl ApprovalAction {
    /// Returns the string representation used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Hold => "hold",
            Self::Reject => "reject",
        }
    }

    /// Parses an action from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAction` if the string does not name a
    /// known action.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "approve" => Ok(Self::Approve),
            "hold" => Ok(Self::Hold),
            "reject" => Ok(Self::Reject),
            _ => Err(DomainError::InvalidAction {
                action: String::from(s),
            }),
        }
    }

    /// Returns the status this action drives the track to.
    #[must_use]
    pub const fn target_status(&self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Hold => ApprovalStatus::OnHold,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }
}

impl std::str::FromStr for ApprovalAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state of a visit request's travel advance.
///
/// Payment is a one-way latch: once a request is marked paid it can
/// never be unmarked, and payment is only reachable after the
/// administrator track is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// The advance has not been disbursed.
    Pending,
    /// The advance has been disbursed. Terminal.
    Paid,
}

impl PaymentStatus {
    /// Returns the string representation used in the database and on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Parses a payment status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string does not name a
    /// known payment status.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidStatus {
                status: String::from(s),
            }),
        }
    }

    /// Returns true if the advance has been disbursed.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_status_round_trip() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::OnHold,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            let parsed = ApprovalStatus::parse_str(status.as_str()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_approval_status_parse_rejects_unknown() {
        let result = ApprovalStatus::parse_str("cancelled");
        assert!(matches!(result, Err(DomainError::InvalidStatus { .. })));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ApprovalStatus::Pending.is_terminal());
        assert!(!ApprovalStatus::OnHold.is_terminal());
        assert!(ApprovalStatus::Approved.is_terminal());
        assert!(ApprovalStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_pending_allows_all_decisions() {
        let pending = ApprovalStatus::Pending;
        assert!(pending.validate_transition(ApprovalStatus::Approved).is_ok());
        assert!(pending.validate_transition(ApprovalStatus::OnHold).is_ok());
        assert!(pending.validate_transition(ApprovalStatus::Rejected).is_ok());
    }

    #[test]
    fn test_on_hold_must_resolve() {
        let held = ApprovalStatus::OnHold;
        assert!(held.validate_transition(ApprovalStatus::Approved).is_ok());
        assert!(held.validate_transition(ApprovalStatus::Rejected).is_ok());
        assert!(held.validate_transition(ApprovalStatus::OnHold).is_err());
        assert!(held.validate_transition(ApprovalStatus::Pending).is_err());
    }

    #[test]
    fn test_terminal_statuses_refuse_all_transitions() {
        for terminal in [ApprovalStatus::Approved, ApprovalStatus::Rejected] {
            for target in [
                ApprovalStatus::Pending,
                ApprovalStatus::OnHold,
                ApprovalStatus::Approved,
                ApprovalStatus::Rejected,
            ] {
                let result = terminal.validate_transition(target);
                assert!(
                    matches!(
                        result,
                        Err(DomainError::InvalidStatusTransition { .. })
                    ),
                    "{terminal} -> {target} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_available_actions_narrow_after_hold() {
        assert_eq!(ApprovalStatus::Pending.available_actions().len(), 3);
        let held_actions = ApprovalStatus::OnHold.available_actions();
        assert_eq!(
            held_actions,
            &[ApprovalAction::Approve, ApprovalAction::Reject]
        );
        assert!(ApprovalStatus::Approved.available_actions().is_empty());
        assert!(ApprovalStatus::Rejected.available_actions().is_empty());
    }

    #[test]
    fn test_action_targets() {
        assert_eq!(
            ApprovalAction::Approve.target_status(),
            ApprovalStatus::Approved
        );
        assert_eq!(ApprovalAction::Hold.target_status(), ApprovalStatus::OnHold);
        assert_eq!(
            ApprovalAction::Reject.target_status(),
            ApprovalStatus::Rejected
        );
    }

    #[test]
    fn test_payment_status_round_trip() {
        for status in [PaymentStatus::Pending, PaymentStatus::Paid] {
            let parsed = PaymentStatus::parse_str(status.as_str()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(PaymentStatus::parse_str("refunded").is_err());
    }
}
