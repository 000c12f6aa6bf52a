// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup and helpers.
//!
//! Covers connection establishment, migration execution, PRAGMA
//! configuration, and `last_insert_rowid()`. Raw SQL appears only where
//! Diesel has no DSL for the statement (PRAGMAs and `last_insert_rowid()`).

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded `SQLite` migrations from `migrations/`.
///
/// The `MySQL` counterpart lives in `migrations_mysql/`; the two directories
/// must stay schema-equivalent (see `cargo xtask verify-migrations`).
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Opens (or creates) a `SQLite` database, enables foreign key enforcement,
/// and applies pending migrations.
///
/// # Arguments
///
/// * `database_url` - File path or `SQLite` URI (e.g. `file:x?mode=memory`)
///
/// # Errors
///
/// Returns an error if the connection cannot be established, the PRAGMA
/// fails, or a migration fails to apply.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!("Opening SQLite database at: {}", database_url);

    let mut conn = SqliteConnection::establish(database_url)?;

    // Foreign keys are off by default in SQLite and must be enabled per
    // connection, before any rows are written.
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    debug!("Applied {} pending SQLite migrations", applied.len());

    Ok(conn)
}

/// Switches a file-based database to WAL journal mode for better read
/// concurrency. Not meaningful for in-memory databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("PRAGMA journal_mode = WAL").execute(conn)?;
    Ok(())
}

/// Confirms that `PRAGMA foreign_keys` is on for this connection.
///
/// Bookings reference their owner and resource by foreign key; without
/// enforcement, cascade deletes and referential integrity silently stop
/// working.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if the
/// pragma reports 0.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;

    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    debug!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Reads `last_insert_rowid()` for the connection.
///
/// Used by inserts that need the generated ID, since `RETURNING` is not
/// available in every context on this backend.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}
