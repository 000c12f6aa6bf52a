// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use resa_domain::{Role, format_timestamp};
use resa_persistence::SqlitePersistence;
use time::{Duration, OffsetDateTime};

use crate::auth::AuthenticatedActor;
use crate::handlers;
use crate::request_response::{CreateBookingRequest, CreateUserRequest, UserResponse};

/// A password that satisfies the default password policy.
pub const TEST_PASSWORD: &str = "Sup3rSecret!pw";

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Builds an ISO 8601 UTC timestamp a whole number of hours away from now.
///
/// Booking handlers compare slots against the wall clock, so fixtures are
/// expressed relative to it.
pub fn hours_from_now(hours: i64) -> String {
    format_timestamp(OffsetDateTime::now_utc() + Duration::hours(hours))
        .expect("Valid test timestamp")
}

/// Registers a regular user and returns the actor for them.
pub fn register_test_user(persistence: &mut SqlitePersistence) -> AuthenticatedActor {
    register_user_with_email(persistence, "test.user@example.com")
}

/// Registers a second, unrelated regular user.
pub fn register_other_user(persistence: &mut SqlitePersistence) -> AuthenticatedActor {
    register_user_with_email(persistence, "other.user@example.com")
}

pub fn register_user_with_email(
    persistence: &mut SqlitePersistence,
    email: &str,
) -> AuthenticatedActor {
    let response: UserResponse = handlers::create_user(
        persistence,
        CreateUserRequest {
            name: String::from("Test User"),
            email: String::from(email),
            password: String::from(TEST_PASSWORD),
            role: String::from("user"),
        },
    )
    .expect("Failed to register test user");

    AuthenticatedActor::new(response.id, Role::User)
}

/// Registers an admin and returns the actor for them.
pub fn register_test_admin(persistence: &mut SqlitePersistence) -> AuthenticatedActor {
    let response: UserResponse = handlers::create_user(
        persistence,
        CreateUserRequest {
            name: String::from("Test Admin"),
            email: String::from("test.admin@example.com"),
            password: String::from(TEST_PASSWORD),
            role: String::from("admin"),
        },
    )
    .expect("Failed to register test admin");

    AuthenticatedActor::new(response.id, Role::Admin)
}

/// Seeds a resource directly in the store and returns its ID.
pub fn create_test_resource(persistence: &mut SqlitePersistence) -> i64 {
    persistence
        .create_resource("main hall", Some("building a"), 50, "auditorium")
        .expect("Failed to create test resource")
}

/// Builds a create request for a slot `start_hours..end_hours` from now.
pub fn booking_request(resource_id: i64, start_hours: i64, end_hours: i64) -> CreateBookingRequest {
    CreateBookingRequest {
        title: String::from("Team Sync"),
        start: hours_from_now(start_hours),
        end: hours_from_now(end_hours),
        resource_id,
    }
}
