// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy enforcement for portal accounts.

use thiserror::Error;

/// Reasons a candidate password can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("password must be at least {min_length} characters long")]
    TooShort { min_length: usize },
    #[error(
        "password must contain at least {required} character classes (lowercase, uppercase, digits, symbols), found {found}"
    )]
    InsufficientComplexity { required: usize, found: usize },
    #[error("password must not contain the account's {field}")]
    MatchesForbiddenField { field: String },
    #[error("password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Minimum requirements a new account password must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 2,
        }
    }
}

impl PasswordPolicy {
    /// Creates a policy with explicit limits.
    #[must_use]
    pub const fn new(min_length: usize, min_complexity: usize) -> Self {
        Self {
            min_length,
            min_complexity,
        }
    }

    /// Validates a candidate password against this policy.
    ///
    /// # Arguments
    ///
    /// * `password` - The candidate password.
    /// * `confirmation` - The confirmation entry, which must match exactly.
    /// * `login_name` - The account's login name, forbidden inside the password.
    /// * `display_name` - The account's display name, forbidden inside the password.
    ///
    /// # Errors
    ///
    /// Returns the first [`PasswordPolicyError`] the candidate violates, checked
    /// in order: confirmation, length, complexity, forbidden fields.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        login_name: &str,
        display_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found = Self::character_classes(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let lowered = password.to_lowercase();
        for (field, value) in [("login name", login_name), ("display name", display_name)] {
            let value = value.trim();
            if !value.is_empty() && lowered.contains(&value.to_lowercase()) {
                return Err(PasswordPolicyError::MatchesForbiddenField {
                    field: String::from(field),
                });
            }
        }

        Ok(())
    }

    /// Counts the distinct character classes present in a password.
    #[must_use]
    pub fn character_classes(password: &str) -> usize {
        let mut lowercase = false;
        let mut uppercase = false;
        let mut digit = false;
        let mut symbol = false;

        for ch in password.chars() {
            if ch.is_ascii_lowercase() {
                lowercase = true;
            } else if ch.is_ascii_uppercase() {
                uppercase = true;
            } else if ch.is_ascii_digit() {
                digit = true;
            } else {
                symbol = true;
            }
        }

        usize::from(lowercase) + usize::from(uppercase) + usize::from(digit) + usize::from(symbol)
    }
}
