// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resource mutations.
//!
//! This module contains backend-agnostic mutations for persisting bookable
//! resources. All mutations use Diesel DSL, with minimal backend-specific
//! helpers abstracted via the `PersistenceBackend` trait.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::resources;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new bookable resource.
///
/// The `name` and `location` are normalized to lowercase for
/// case-insensitive uniqueness and search.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The resource name (will be normalized)
/// * `location` - The optional location (will be normalized)
/// * `capacity` - The non-negative capacity
/// * `room_type` - The room type label
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateResource` if the name is already
/// taken, or another error if the resource cannot be created.
pub fn create_resource(
    conn: &mut _,
    name: &str,
    location: Option<&str>,
    capacity: i64,
    room_type: &str,
) -> Result<i64, PersistenceError> {
    let normalized_name: String = name.to_lowercase();
    let normalized_location: Option<String> = location.map(str::to_lowercase);

    info!(
        "Creating resource with name: {}, room_type: {}",
        normalized_name, room_type
    );

    let insert_result: Result<usize, diesel::result::Error> =
        diesel::insert_into(resources::table)
            .values((
                resources::resource_name.eq(&normalized_name),
                resources::location.eq(&normalized_location),
                resources::capacity.eq(capacity),
                resources::room_type.eq(room_type),
            ))
            .execute(conn);

    match insert_result {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(PersistenceError::DuplicateResource {
                name: normalized_name,
            });
        }
        Err(e) => return Err(PersistenceError::from(e)),
    }

    let resource_id: i64 = conn.get_last_insert_rowid()?;

    info!(resource_id, "Resource created successfully");

    Ok(resource_id)
}
}

backend_fn! {
/// Deletes a resource.
///
/// Bookings on the resource are removed by `ON DELETE CASCADE`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `resource_id` - The resource ID
///
/// # Errors
///
/// Returns `PersistenceError::ResourceNotFound` if no such resource
/// exists, or another error if the database delete fails.
pub fn delete_resource(conn: &mut _, resource_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting resource ID: {}", resource_id);

    let rows_affected: usize = diesel::delete(resources::table)
        .filter(resources::resource_id.eq(resource_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ResourceNotFound(format!(
            "Resource with ID {resource_id} not found"
        )));
    }

    info!("Deleted resource ID: {}", resource_id);
    Ok(())
}
}
