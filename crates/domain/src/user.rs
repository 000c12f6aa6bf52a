// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::role::Role;

/// An account that can authenticate and own bookings.
///
/// Email addresses are lowercased on construction so logins and uniqueness
/// checks are case-insensitive. Credentials are not part of the domain type;
/// the store keeps only a password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The identifier assigned by the store. `None` until persisted.
    user_id: Option<i64>,
    name: String,
    email: String,
    role: Role,
}

impl User {
    /// Creates a user, validating the name and email.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if the name is empty or
    /// `DomainError::InvalidEmail` if the email does not look like an
    /// address.
    pub fn new(name: &str, email: &str, role: Role) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "name must not be empty",
            )));
        }

        let email: String = email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(DomainError::InvalidEmail(email));
        }

        Ok(Self {
            user_id: None,
            name: String::from(name),
            email,
            role,
        })
    }

    /// Creates a user with a store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Same validation as [`User::new`].
    pub fn with_id(user_id: i64, name: &str, email: &str, role: Role) -> Result<Self, DomainError> {
        let mut user: Self = Self::new(name, email, role)?;
        user.user_id = Some(user_id);
        Ok(user)
    }

    /// The store-assigned identifier, if persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.user_id
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lowercased email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The role assigned to this user.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// A lightweight shape check. Full deliverability checking belongs to the
/// mail system, not the domain model.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty() && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
}
