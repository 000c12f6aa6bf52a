// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.
//!
//! Timestamps cross this boundary as ISO 8601 strings. Requests accept any
//! parseable offset; responses always carry the stored UTC form.

use resa_domain::{Role, RoomType};

fn default_room_type() -> String {
    String::from("auditorium")
}

fn default_role() -> String {
    String::from("user")
}

/// API request to create a booking.
///
/// The owner is not part of the payload. It is always the authenticated
/// actor making the request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateBookingRequest {
    /// The booking title.
    pub title: String,
    /// The start of the slot (ISO 8601).
    pub start: String,
    /// The end of the slot (ISO 8601, exclusive).
    pub end: String,
    /// The resource to book.
    pub resource_id: i64,
}

/// API request to update an existing booking.
///
/// The payload replaces the booking's title, slot, and resource. Ownership
/// moves to the actor performing the update.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateBookingRequest {
    /// The new booking title.
    pub title: String,
    /// The new start of the slot (ISO 8601).
    pub start: String,
    /// The new end of the slot (ISO 8601, exclusive).
    pub end: String,
    /// The resource the booking should occupy.
    pub resource_id: i64,
}

/// API representation of a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingResponse {
    /// The booking ID.
    pub id: i64,
    /// The booking title.
    pub title: String,
    /// The start of the slot (ISO 8601, UTC).
    pub start: String,
    /// The end of the slot (ISO 8601, UTC, exclusive).
    pub end: String,
    /// The booked resource.
    pub resource_id: i64,
    /// The user who owns the booking.
    pub owner_id: i64,
}

/// API request to create a resource.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateResourceRequest {
    /// The resource name, unique case-insensitively.
    pub name: String,
    /// An optional free-form location.
    pub location: Option<String>,
    /// The seating capacity. Defaults to 0.
    #[serde(default)]
    pub capacity: i64,
    /// The room type. Defaults to "auditorium".
    #[serde(default = "default_room_type")]
    pub room_type: String,
}

/// API representation of a resource.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceResponse {
    /// The resource ID.
    pub id: i64,
    /// The resource name.
    pub name: String,
    /// The resource location, if any.
    pub location: Option<String>,
    /// The seating capacity.
    pub capacity: i64,
    /// The room type.
    pub room_type: RoomType,
}

/// API request to register a new user account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateUserRequest {
    /// The display name.
    pub name: String,
    /// The account email, unique case-insensitively.
    pub email: String,
    /// The plaintext password. Stored only as a bcrypt hash.
    pub password: String,
    /// The account role. Defaults to "user".
    #[serde(default = "default_role")]
    pub role: String,
}

/// API representation of a user account.
///
/// The password hash never crosses this boundary.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserResponse {
    /// The user ID.
    pub id: i64,
    /// The display name.
    pub name: String,
    /// The account email.
    pub email: String,
    /// The account role.
    pub role: Role,
}

/// API request to log in and create a session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The account email.
    pub email: String,
    /// The account password.
    pub password: String,
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The session token (opaque).
    pub session_token: String,
    /// Session expiration timestamp (ISO 8601).
    pub expires_at: String,
    /// The authenticated user's ID.
    pub user_id: i64,
    /// The authenticated user's display name.
    pub name: String,
    /// The authenticated user's email.
    pub email: String,
    /// The authenticated user's role.
    pub role: Role,
}
