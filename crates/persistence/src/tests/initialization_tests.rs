// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Initialization (`SQLite` in-memory, file-based, migrations, foreign key
//! enforcement) is also exercised implicitly by every persistence test
//! that calls `SqlitePersistence::new_in_memory()`. The tests here cover
//! the properties worth asserting directly: isolation between instances
//! and that migrations actually produced the schema.

use crate::SqlitePersistence;
use crate::tests::create_test_user;

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, crate::error::PersistenceError> =
        SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    // Each in-memory instance should be isolated
    let mut db1 = SqlitePersistence::new_in_memory().unwrap();
    let mut db2 = SqlitePersistence::new_in_memory().unwrap();

    // Create a user in db1
    create_test_user(&mut db1);

    // db2 should not see it
    let count1 = db1.count_users().unwrap();
    let count2 = db2.count_users().unwrap();

    assert_eq!(count1, 1, "db1 should have 1 user");
    assert_eq!(count2, 0, "db2 should have 0 users (isolated)");
}

#[test]
fn test_migrations_applied_on_initialization() {
    // If migrations didn't run, the schema wouldn't exist and this would fail
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let users = persistence.list_users(0, 10);
    assert!(
        users.is_ok(),
        "Migrations must have applied for the users table to exist"
    );

    let resources = persistence.list_resources(0, 10, None, None);
    assert!(
        resources.is_ok(),
        "Migrations must have applied for the resources table to exist"
    );

    let bookings = persistence.list_all_bookings(0, 10, None);
    assert!(
        bookings.is_ok(),
        "Migrations must have applied for the bookings table to exist"
    );
}

#[test]
fn test_foreign_key_enforcement_is_active() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_backed_database_round_trip() {
    let dir = std::env::temp_dir().join(format!("resa_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bookings.db");

    {
        let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
        create_test_user(&mut persistence);
    }

    // A fresh adapter over the same file sees the persisted row
    let mut reopened = SqlitePersistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_users().unwrap(), 1);

    std::fs::remove_dir_all(&dir).ok();
}
