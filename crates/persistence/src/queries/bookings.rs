// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking queries.
//!
//! This module contains backend-agnostic queries for retrieving bookings
//! and checking slot availability. All queries use Diesel DSL and work
//! across all supported database backends.
//!
//! Slot bounds are stored as fixed-width ISO 8601 UTC strings, so the
//! lexicographic comparisons below match chronological order.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::BookingData;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

diesel::define_sql_function! {
    /// SQL `lower`, available on both backends.
    ///
    /// Titles keep their original case in storage, so case-insensitive
    /// matching has to lowercase the column at query time.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel Queryable struct for booking rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
struct BookingRow {
    booking_id: i64,
    title: String,
    start_at: String,
    end_at: String,
    owner_id: i64,
    resource_id: i64,
    created_at: Option<String>,
}

backend_fn! {
/// Retrieves a booking by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `booking_id` - The booking ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the booking is not found.
pub fn get_booking_by_id(
    conn: &mut _,
    booking_id: i64,
) -> Result<Option<BookingData>, PersistenceError> {
    debug!("Looking up booking by ID: {}", booking_id);

    let result: Result<BookingRow, diesel::result::Error> = bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(BookingData {
            booking_id: row.booking_id,
            title: row.title,
            start_at: row.start_at,
            end_at: row.end_at,
            owner_id: row.owner_id,
            resource_id: row.resource_id,
            created_at: row.created_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists bookings owned by a user, ordered by start time, with pagination
/// and an optional case-insensitive title substring filter.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `owner_id` - The owning user's ID
/// * `offset` - Number of bookings to skip
/// * `limit` - Maximum number of bookings to return
/// * `title` - Optional title substring filter
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_owner(
    conn: &mut _,
    owner_id: i64,
    offset: i64,
    limit: i64,
    title: Option<&str>,
) -> Result<Vec<BookingData>, PersistenceError> {
    debug!(
        "Listing bookings for owner {} with offset {} and limit {}",
        owner_id, offset, limit
    );

    let mut query = bookings::table
        .filter(bookings::owner_id.eq(owner_id))
        .select(BookingRow::as_select())
        .into_boxed();

    if let Some(title) = title {
        let pattern: String = format!("%{}%", title.to_lowercase());
        query = query.filter(lower(bookings::title).like(pattern));
    }

    let rows: Vec<BookingRow> = query
        .order_by(bookings::start_at.asc())
        .offset(offset)
        .limit(limit)
        .load(conn)?;

    Ok(rows.into_iter().map(booking_data_from_row).collect())
}
}

backend_fn! {
/// Lists bookings across all owners, ordered by start time, with
/// pagination and an optional case-insensitive title substring filter.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `offset` - Number of bookings to skip
/// * `limit` - Maximum number of bookings to return
/// * `title` - Optional title substring filter
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_all_bookings(
    conn: &mut _,
    offset: i64,
    limit: i64,
    title: Option<&str>,
) -> Result<Vec<BookingData>, PersistenceError> {
    debug!(
        "Listing all bookings with offset {} and limit {}",
        offset, limit
    );

    let mut query = bookings::table.select(BookingRow::as_select()).into_boxed();

    if let Some(title) = title {
        let pattern: String = format!("%{}%", title.to_lowercase());
        query = query.filter(lower(bookings::title).like(pattern));
    }

    let rows: Vec<BookingRow> = query
        .order_by(bookings::start_at.asc())
        .offset(offset)
        .limit(limit)
        .load(conn)?;

    Ok(rows.into_iter().map(booking_data_from_row).collect())
}
}

backend_fn! {
/// Counts bookings on a resource whose slot overlaps `[start_at, end_at)`.
///
/// Two half-open slots overlap iff each starts before the other ends.
/// Slots that merely touch at a boundary do not overlap, so a booking
/// ending exactly at `start_at` is not counted.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `resource_id` - The resource to check
/// * `start_at` - Inclusive slot start (ISO 8601 UTC)
/// * `end_at` - Exclusive slot end (ISO 8601 UTC)
/// * `exclude_booking_id` - A booking to ignore, for reschedule checks
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_conflicting_bookings(
    conn: &mut _,
    resource_id: i64,
    start_at: &str,
    end_at: &str,
    exclude_booking_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let mut query = bookings::table
        .filter(bookings::resource_id.eq(resource_id))
        .filter(bookings::start_at.lt(end_at))
        .filter(bookings::end_at.gt(start_at))
        .select(count(bookings::booking_id))
        .into_boxed();

    if let Some(exclude_id) = exclude_booking_id {
        query = query.filter(bookings::booking_id.ne(exclude_id));
    }

    let conflicts: i64 = query.first(conn)?;

    debug!(
        "Found {} conflicting bookings on resource {} in [{}, {})",
        conflicts, resource_id, start_at, end_at
    );
    Ok(conflicts)
}
}

fn booking_data_from_row(row: BookingRow) -> BookingData {
    BookingData {
        booking_id: row.booking_id,
        title: row.title,
        start_at: row.start_at,
        end_at: row.end_at,
        owner_id: row.owner_id,
        resource_id: row.resource_id,
        created_at: row.created_at,
    }
}
