// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the resa booking backend.
//!
//! This crate sits between the HTTP surface and the persistence layer. It
//! owns authentication, authorization, the password policy, and the
//! translation of domain and persistence errors into the API error
//! contract. Handlers are plain functions over the persistence facade so
//! they can be exercised directly in tests without a running server.
//!
//! ## Visibility Model
//!
//! Regular users see only their own bookings. Admins see everything. When
//! a booking exists but is not visible to the caller, the API reports it
//! as not found rather than as forbidden, so the existence of other
//! people's bookings cannot be probed.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

pub mod auth;
pub mod error;
pub mod handlers;
pub mod password_policy;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    BookingResponse, CreateBookingRequest, CreateResourceRequest, CreateUserRequest, LoginRequest,
    LoginResponse, ResourceResponse, UpdateBookingRequest, UserResponse,
};
