// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API error types and the translations from domain and persistence errors.

use crate::password_policy::PasswordPolicyError;
use resa_domain::DomainError;
use resa_persistence::PersistenceError;

/// Authentication and authorization failures.
///
/// `AuthenticationFailed` covers everything wrong with the credentials or
/// session itself. `Unauthorized` means the session was fine but the role
/// was insufficient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credentials or session token could not be verified.
    AuthenticationFailed {
        /// Why verification failed, phrased for the API response.
        reason: String,
    },
    /// The actor is known but lacks the role the action demands.
    Unauthorized {
        /// The action that was refused.
        action: String,
        /// The minimum role that would have been accepted.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => write!(f, "Authentication failed: {reason}"),
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires at least the {required_role} role"
                )
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Errors returned across the API boundary.
///
/// Domain and persistence errors are translated into these variants
/// before leaving the API layer, so callers see one stable contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The credentials or session token could not be verified.
    AuthenticationFailed {
        /// Why verification failed.
        reason: String,
    },
    /// The actor's role does not permit the attempted action.
    Unauthorized {
        /// The action that was refused.
        action: String,
        /// The minimum role that would have been accepted.
        required_role: String,
    },
    /// A time-based rule was violated (past slot, inverted interval).
    TemporalRuleViolation {
        /// Description of the violated rule.
        message: String,
    },
    /// The requested slot overlaps an existing booking on the resource.
    ///
    /// Displays as a generic availability message, so callers learn
    /// nothing about the booking they collided with.
    SlotConflict {
        /// The resource the slot was requested on.
        resource_id: i64,
    },
    /// A structural business rule was violated, such as a uniqueness rule.
    DomainRuleViolation {
        /// Machine-readable name of the violated rule.
        rule: String,
        /// Description of the violation.
        message: String,
    },
    /// A request field failed validation.
    InvalidInput {
        /// Name of the offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },
    /// A requested entity was not found.
    ///
    /// Also returned when a booking exists but is not visible to the
    /// requesting actor, so absence and denied visibility cannot be told
    /// apart from the outside.
    NotFound {
        /// The kind of entity that was looked up.
        entity: String,
        /// Description of what was missing.
        message: String,
    },
    /// Something failed inside the server rather than in the request.
    Internal {
        /// Description of the failure.
        message: String,
    },
    /// The supplied password does not meet the policy.
    PasswordPolicyViolation {
        /// Which requirement was missed.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => write!(f, "Authentication failed: {reason}"),
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires at least the {required_role} role"
                )
            }
            Self::TemporalRuleViolation { message } => write!(f, "{message}"),
            Self::SlotConflict { .. } => write!(f, "Resource is not available"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::NotFound { entity, message } => write!(f, "{entity} not found: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Auth failures cross into the API error space without rewording.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Policy failures surface with the requirement text as the message.
impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Maps a domain error onto the API contract.
///
/// Each domain variant is matched explicitly, so adding a variant to
/// `DomainError` forces a decision here instead of leaking through a
/// catch-all.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTimeSlot { reason } => {
            ApiError::TemporalRuleViolation { message: reason }
        }
        DomainError::TimeSlotInPast { field } => ApiError::TemporalRuleViolation {
            message: format!("'{field}' must not be in the past"),
        },
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::InvalidResourceName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidCapacity { capacity } => ApiError::InvalidInput {
            field: String::from("capacity"),
            message: format!("Invalid capacity: {capacity}. Must be zero or greater"),
        },
        DomainError::InvalidRoomType(value) => ApiError::InvalidInput {
            field: String::from("room_type"),
            message: format!("'{value}' is not a recognized room type"),
        },
        DomainError::InvalidRole(value) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("'{value}' is not a recognized role"),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::TimestampParseError { value, error } => ApiError::InvalidInput {
            field: String::from("datetime"),
            message: format!("Failed to parse timestamp '{value}': {error}"),
        },
        DomainError::TimestampFormatError { error } => ApiError::Internal {
            message: format!("Failed to format timestamp: {error}"),
        },
    }
}

/// Maps a persistence error onto the API contract.
///
/// Storage detail stays behind this boundary: the variants the API can
/// act on get precise equivalents, anything else collapses into
/// `Internal`.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateUser { email } => ApiError::DomainRuleViolation {
            rule: String::from("unique_email"),
            message: format!("User with email '{email}' already exists"),
        },
        PersistenceError::DuplicateResource { name } => ApiError::DomainRuleViolation {
            rule: String::from("unique_resource_name"),
            message: format!("Resource with name '{name}' already exists"),
        },
        PersistenceError::UserNotFound(message) => ApiError::NotFound {
            entity: String::from("User"),
            message,
        },
        PersistenceError::ResourceNotFound(message) => ApiError::NotFound {
            entity: String::from("Resource"),
            message,
        },
        PersistenceError::BookingNotFound(message) => ApiError::NotFound {
            entity: String::from("Booking"),
            message,
        },
        PersistenceError::SlotUnavailable { resource_id } => {
            ApiError::SlotConflict { resource_id }
        }
        _ => ApiError::Internal {
            message: format!("Persistence error: {err}"),
        },
    }
}
