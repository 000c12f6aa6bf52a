// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy for account credentials.
//!
//! Registration rejects weak passwords up front rather than storing them.
//! The policy checks length, character class variety, and that the password
//! is not simply the account's own email or display name.

use thiserror::Error;

/// Ways a candidate password can fail the policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Below the minimum length.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password draws on too few character classes.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password equals the account email or display name.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },
}

/// Password policy configuration.
///
/// The default requires 12 characters drawing on at least 3 of the 4
/// character classes (uppercase, lowercase, digit, symbol).
pub struct PasswordPolicy {
    /// Shortest acceptable password, counted in bytes.
    pub min_length: usize,
    /// How many of the four character classes must appear.
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Checks a password against the policy rules.
    ///
    /// Checks run in order: length, character class variety, then the
    /// forbidden-value comparison against `email` and `name`. The forbidden
    /// comparison is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns the first `PasswordPolicyError` the password violates.
    pub fn validate(
        &self,
        password: &str,
        email: &str,
        name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password.len() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = Self::character_classes(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let password_lower: String = password.to_lowercase();
        for (field, value) in [("email", email), ("name", name)] {
            if password_lower == value.to_lowercase() {
                return Err(PasswordPolicyError::MatchesForbiddenField {
                    field: String::from(field),
                });
            }
        }

        Ok(())
    }

    /// Counts how many of the four character classes the password uses:
    /// uppercase, lowercase, digit, and symbol (any other printable ASCII).
    fn character_classes(password: &str) -> usize {
        let mut found: [bool; 4] = [false; 4];

        for c in password.chars() {
            if c.is_ascii_uppercase() {
                found[0] = true;
            } else if c.is_ascii_lowercase() {
                found[1] = true;
            } else if c.is_ascii_digit() {
                found[2] = true;
            } else if c.is_ascii_graphic() {
                // Printable, not alphanumeric (those matched above)
                found[3] = true;
            }
        }

        found.into_iter().filter(|present| *present).count()
    }
}
