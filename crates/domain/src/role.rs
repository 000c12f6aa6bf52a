// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Access role of a user, ordered by numeric rank.
///
/// Authorization checks use "at least" semantics rather than exact match:
/// a role satisfies a requirement if its rank is greater than or equal to
/// the required role's rank. Any future role must slot into this ordered
/// scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user (rank 10). May manage only their own bookings.
    #[default]
    User,
    /// Administrator (rank 20). May manage resources, users, and every
    /// booking.
    Admin,
}

impl Role {
    /// Numeric rank used for "at least" comparisons.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::User => 10,
            Self::Admin => 20,
        }
    }

    /// Returns whether this role is at least as privileged as `required`.
    #[must_use]
    pub const fn at_least(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rank_ordering_is_user_below_admin() {
        assert!(Role::User.rank() < Role::Admin.rank());
        assert_eq!(Role::User.rank(), 10);
        assert_eq!(Role::Admin.rank(), 20);
    }

    #[test]
    fn at_least_uses_rank_not_equality() {
        assert!(Role::Admin.at_least(Role::User));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(Role::User.at_least(Role::User));
        assert!(!Role::User.at_least(Role::Admin));
    }

    #[test]
    fn round_trips_through_strings() {
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn rejects_unknown_role_strings() {
        assert_eq!(
            Role::from_str("superuser"),
            Err(DomainError::InvalidRole(String::from("superuser")))
        );
        assert!(Role::from_str("Admin").is_err());
    }
}
