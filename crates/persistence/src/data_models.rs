// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Stored representation of a user account.
///
/// Timestamps are ISO 8601 strings in UTC as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// Stored representation of an authentication session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Stored representation of a bookable resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceData {
    pub resource_id: i64,
    pub resource_name: String,
    pub location: Option<String>,
    pub capacity: i64,
    pub room_type: String,
    pub created_at: Option<String>,
}

/// Stored representation of a booking.
///
/// The slot bounds are ISO 8601 strings in UTC. Because the format is
/// fixed-width, string comparison in SQL matches chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingData {
    pub booking_id: i64,
    pub title: String,
    pub start_at: String,
    pub end_at: String,
    pub owner_id: i64,
    pub resource_id: i64,
    pub created_at: Option<String>,
}
