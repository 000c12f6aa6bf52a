// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resource queries.
//!
//! This module contains backend-agnostic queries for retrieving bookable
//! resources. All queries use Diesel DSL and work across all supported
//! database backends.
//!
//! Resource names and locations are stored lowercase, so contains-style
//! filters lowercase the needle and match with plain `LIKE`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::ResourceData;
use crate::diesel_schema::resources;
use crate::error::PersistenceError;

/// Diesel Queryable struct for resource rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = resources)]
struct ResourceRow {
    resource_id: i64,
    resource_name: String,
    location: Option<String>,
    capacity: i64,
    room_type: String,
    created_at: Option<String>,
}

backend_fn! {
/// Retrieves a resource by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `resource_id` - The resource ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the resource is not found.
pub fn get_resource_by_id(
    conn: &mut _,
    resource_id: i64,
) -> Result<Option<ResourceData>, PersistenceError> {
    debug!("Looking up resource by ID: {}", resource_id);

    let result: Result<ResourceRow, diesel::result::Error> = resources::table
        .filter(resources::resource_id.eq(resource_id))
        .select(ResourceRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(ResourceData {
            resource_id: row.resource_id,
            resource_name: row.resource_name,
            location: row.location,
            capacity: row.capacity,
            room_type: row.room_type,
            created_at: row.created_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves a resource by name.
///
/// The `name` is normalized to lowercase for case-insensitive lookup.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The resource name to search for
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the resource is not found.
pub fn get_resource_by_name(
    conn: &mut _,
    name: &str,
) -> Result<Option<ResourceData>, PersistenceError> {
    let normalized_name: String = name.to_lowercase();

    debug!("Looking up resource by name: {}", normalized_name);

    let result: Result<ResourceRow, diesel::result::Error> = resources::table
        .filter(resources::resource_name.eq(&normalized_name))
        .select(ResourceRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(ResourceData {
            resource_id: row.resource_id,
            resource_name: row.resource_name,
            location: row.location,
            capacity: row.capacity,
            room_type: row.room_type,
            created_at: row.created_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists resources ordered by name, with pagination and optional filters.
///
/// The `name` and `location` filters are substring matches, lowercased to
/// match the stored representation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `offset` - Number of resources to skip
/// * `limit` - Maximum number of resources to return
/// * `name` - Optional name substring filter
/// * `location` - Optional location substring filter
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_resources(
    conn: &mut _,
    offset: i64,
    limit: i64,
    name: Option<&str>,
    location: Option<&str>,
) -> Result<Vec<ResourceData>, PersistenceError> {
    debug!(
        "Listing resources with offset {} and limit {}",
        offset, limit
    );

    let mut query = resources::table
        .select(ResourceRow::as_select())
        .into_boxed();

    if let Some(name) = name {
        let pattern: String = format!("%{}%", name.to_lowercase());
        query = query.filter(resources::resource_name.like(pattern));
    }

    if let Some(location) = location {
        let pattern: String = format!("%{}%", location.to_lowercase());
        query = query.filter(resources::location.like(pattern));
    }

    let rows: Vec<ResourceRow> = query
        .order_by(resources::resource_name.asc())
        .offset(offset)
        .limit(limit)
        .load(conn)?;

    let resources_list: Vec<ResourceData> = rows
        .into_iter()
        .map(|row| ResourceData {
            resource_id: row.resource_id,
            resource_name: row.resource_name,
            location: row.location,
            capacity: row.capacity,
            room_type: row.room_type,
            created_at: row.created_at,
        })
        .collect();

    Ok(resources_list)
}
}

backend_fn! {
/// Checks whether a resource with the given ID exists.
///
/// Used inside booking transactions so a vanished resource is reported
/// as missing rather than surfacing as a foreign key violation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `resource_id` - The resource ID to check
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn resource_exists(conn: &mut _, resource_id: i64) -> Result<bool, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = resources::table
        .filter(resources::resource_id.eq(resource_id))
        .select(count(resources::resource_id))
        .first(conn)?;

    Ok(count > 0)
}
}
