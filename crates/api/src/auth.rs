// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use resa_domain::Role;
use resa_persistence::{PersistenceError, SessionData, SqlitePersistence, UserData};
use std::str::FromStr;
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};

use crate::error::AuthError;

/// The uniform reason returned for any credential failure during login.
///
/// Unknown emails and wrong passwords produce the same reason so a caller
/// cannot probe which accounts exist.
const INVALID_CREDENTIALS: &str = "Incorrect username or password";

/// An authenticated actor with an associated role.
///
/// This represents a user who has presented a valid session and may
/// perform actions according to their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// Database ID of the authenticated user.
    pub id: i64,
    /// Role the user held when the session was validated.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns `true` if this actor holds the Admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.at_least(Role::Admin)
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Roles are ordered, so holding a higher role always satisfies a check
/// for a lower one.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor holds at least the required role.
    ///
    /// `action` names the attempted operation and appears in the error so
    /// responses can say what was denied.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor's role ranks below the required role.
    pub fn require_role(
        actor: &AuthenticatedActor,
        required: Role,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role.at_least(required) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from(required.as_str()),
            })
        }
    }

    /// Checks that an actor holds the Admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        Self::require_role(actor, Role::Admin, action)
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates a user by email and password and creates a session.
    ///
    /// On success returns the new session token alongside the actor and the
    /// user's stored data. The email is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails. Unknown emails and wrong
    /// passwords fail with the same reason.
    pub fn login(
        persistence: &mut SqlitePersistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, UserData), AuthError> {
        let user: UserData = persistence
            .get_user_by_email(email)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| {
                tracing::warn!("Login failed for {}", email);
                AuthError::AuthenticationFailed {
                    reason: String::from(INVALID_CREDENTIALS),
                }
            })?;

        if !persistence
            .verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
        {
            tracing::warn!("Login failed for {}", email);
            return Err(AuthError::AuthenticationFailed {
                reason: String::from(INVALID_CREDENTIALS),
            });
        }

        let role: Role =
            Role::from_str(&user.role).map_err(|_| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {}", user.role),
            })?;

        let session_token: String = Self::generate_session_token();
        let expires_at: String = Self::expiry_timestamp()?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(user.user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        let actor: AuthenticatedActor = AuthenticatedActor::new(user.user_id, role);

        Ok((session_token, actor, user))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// Expired sessions are deleted as a side effect of being presented.
    /// Valid ones get their activity timestamp refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if OffsetDateTime::now_utc() > Self::parse_expiry(&session.expires_at)? {
            tracing::debug!("Rejecting and deleting expired session");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        let role: Role =
            Role::from_str(&user.role).map_err(|_| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {}", user.role),
            })?;

        // Record activity so idle sessions can be told apart from active ones
        persistence
            .touch_session(session.session_id)
            .map_err(Self::map_persistence_error)?;

        let actor: AuthenticatedActor = AuthenticatedActor::new(user.user_id, role);

        Ok((actor, user))
    }

    /// Logs out by deleting the session. Unknown tokens are not an error
    /// at the persistence layer, so logout is effectively idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session row cannot be deleted.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        tracing::debug!("Deleting session for logout");
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// Produces an opaque session token from a nanosecond timestamp plus
    /// 64 random bits.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        // A clock before the epoch degrades to the random component alone
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    /// ISO 8601 timestamp for a session created now.
    fn expiry_timestamp() -> Result<String, AuthError> {
        (OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION)
            .format(&Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })
    }

    /// Parses a stored session expiry back into a timestamp.
    fn parse_expiry(raw: &str) -> Result<OffsetDateTime, AuthError> {
        OffsetDateTime::parse(raw, &Iso8601::DEFAULT).map_err(|e| {
            AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            }
        })
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
