// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod resource_tests;
mod user_tests;

use crate::SqlitePersistence;

/// Builds a fixed-width ISO 8601 UTC timestamp far in the future.
///
/// Tests use day/hour coordinates so slot relationships read naturally.
pub fn ts(day: u8, hour: u8) -> String {
    format!("2030-01-{day:02}T{hour:02}:00:00.000000000Z")
}

pub fn create_test_user(persistence: &mut SqlitePersistence) -> i64 {
    persistence
        .create_user("Test User", "test.user@example.com", "hunter2hunter2", "user")
        .unwrap()
}

pub fn create_test_admin(persistence: &mut SqlitePersistence) -> i64 {
    persistence
        .create_user("Test Admin", "test.admin@example.com", "hunter2hunter2", "admin")
        .unwrap()
}

pub fn create_test_resource(persistence: &mut SqlitePersistence) -> i64 {
    persistence
        .create_resource("main hall", Some("building a"), 50, "auditorium")
        .unwrap()
}
