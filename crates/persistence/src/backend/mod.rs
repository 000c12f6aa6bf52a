// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific database plumbing.
//!
//! Everything that cannot be written in backend-agnostic Diesel DSL lives
//! here: connection setup, migration execution, PRAGMA and engine settings,
//! and the `last_insert_rowid()` workaround. The booking, resource, user,
//! and session operations in `queries/` and `mutations/` stay agnostic and
//! reach backend-specific behavior only through the [`PersistenceBackend`]
//! trait.
//!
//! Supported backends:
//!
//! - `sqlite`: default for development and the standard test suite
//! - `mysql`: MySQL/MariaDB, exercised by opt-in validation tests

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Backend escape hatch for the few operations Diesel cannot express
/// generically.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection` so the
/// generated query and mutation functions can call these without knowing
/// which backend they run on.
pub trait PersistenceBackend: Connection {
    /// Returns the auto-increment ID of the most recently inserted row.
    ///
    /// `RETURNING` support differs between the backends, so inserts that
    /// need their new ID read it back through this method instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Checks that the connection enforces foreign keys.
    ///
    /// Run once at startup. Without enforcement the database would accept
    /// bookings pointing at deleted users or resources.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if the
    /// backend reports enforcement as off.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

/// `SQLite` reads the ID back with `last_insert_rowid()` and checks
/// enforcement through `PRAGMA foreign_keys`.
impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}

/// `MySQL` reads the ID back with `LAST_INSERT_ID()` and checks
/// enforcement against `@@foreign_key_checks`.
impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }
}
