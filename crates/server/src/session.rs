// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Axum extractor for session-token authentication.
//!
//! Handlers that require a logged-in caller take a [`SessionUser`] argument;
//! the extractor resolves the bearer token against the session store before
//! the handler body runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use resa_api::{AuthenticatedActor, AuthenticationService};
use resa_persistence::UserData;
use tracing::{debug, warn};

use crate::AppState;

/// Why a request failed session extraction.
///
/// Every variant renders as a plain-text 401 response.
#[derive(Debug)]
pub enum SessionError {
    /// No Authorization header on the request.
    MissingHeader,
    /// Authorization header present but not in `Bearer <token>` form.
    MalformedHeader,
    /// Token did not resolve to an active, unexpired session.
    Rejected(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingHeader => String::from("Missing Authorization header"),
            Self::MalformedHeader => {
                String::from("Invalid Authorization header format. Expected: 'Bearer <token>'")
            }
            Self::Rejected(reason) => format!("Session validation failed: {reason}"),
        };

        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}

/// Pulls the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Result<&str, SessionError> {
    let header = parts.headers.get(header::AUTHORIZATION).ok_or_else(|| {
        debug!("Request carried no Authorization header");
        SessionError::MissingHeader
    })?;

    let value = header.to_str().map_err(|_| {
        warn!("Authorization header is not valid UTF-8");
        SessionError::MalformedHeader
    })?;

    value.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Authorization header does not use the Bearer scheme");
        SessionError::MalformedHeader
    })
}

/// Authenticated caller context, extracted from the Authorization header.
///
/// Carries the authorization-level view of the caller (`AuthenticatedActor`)
/// alongside the stored account row (`UserData`). Requests without a valid
/// `Bearer` token are rejected with 401 before the handler runs.
pub struct SessionUser(pub AuthenticatedActor, pub UserData);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let mut persistence = state.persistence.lock().await;
        let (actor, user) = AuthenticationService::validate_session(&mut persistence, token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::Rejected(e.to_string())
            })?;
        drop(persistence);

        debug!(email = %user.email, role = ?actor.role, "Session validated");

        Ok(Self(actor, user))
    }
}
