// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutations.
//!
//! Booking creation and reschedule run the availability check and the
//! write inside a single database transaction, so two requests racing for
//! the same slot cannot both succeed. These two mutations call other
//! generated functions and are therefore written as explicit backend
//! pairs instead of going through `backend_fn!`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use crate::queries::bookings::{
    count_conflicting_bookings_mysql, count_conflicting_bookings_sqlite, get_booking_by_id_mysql,
    get_booking_by_id_sqlite,
};
use crate::queries::resources::{resource_exists_mysql, resource_exists_sqlite};

/// Creates a booking if the slot is free (`SQLite` version).
///
/// The resource existence check, the conflict check, and the insert run
/// in one transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `title` - The booking title
/// * `start_at` - Inclusive slot start (ISO 8601 UTC)
/// * `end_at` - Exclusive slot end (ISO 8601 UTC)
/// * `owner_id` - The owning user's ID
/// * `resource_id` - The resource to book
///
/// # Errors
///
/// Returns an error if:
/// - The resource does not exist
/// - The slot overlaps an existing booking on the resource
/// - The database operation fails
pub fn create_booking_sqlite(
    conn: &mut SqliteConnection,
    title: &str,
    start_at: &str,
    end_at: &str,
    owner_id: i64,
    resource_id: i64,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating booking on resource {} in [{}, {})",
        resource_id, start_at, end_at
    );

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        if !resource_exists_sqlite(conn, resource_id)? {
            return Err(PersistenceError::ResourceNotFound(format!(
                "Resource with ID {resource_id} not found"
            )));
        }

        let conflicts: i64 =
            count_conflicting_bookings_sqlite(conn, resource_id, start_at, end_at, None)?;
        if conflicts > 0 {
            return Err(PersistenceError::SlotUnavailable { resource_id });
        }

        diesel::insert_into(bookings::table)
            .values((
                bookings::title.eq(title),
                bookings::start_at.eq(start_at),
                bookings::end_at.eq(end_at),
                bookings::owner_id.eq(owner_id),
                bookings::resource_id.eq(resource_id),
            ))
            .execute(conn)?;

        let booking_id: i64 = conn.get_last_insert_rowid()?;

        info!(booking_id, resource_id, "Booking created");
        Ok(booking_id)
    })
}

/// Creates a booking if the slot is free (`MySQL` version).
///
/// The resource existence check, the conflict check, and the insert run
/// in one transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `title` - The booking title
/// * `start_at` - Inclusive slot start (ISO 8601 UTC)
/// * `end_at` - Exclusive slot end (ISO 8601 UTC)
/// * `owner_id` - The owning user's ID
/// * `resource_id` - The resource to book
///
/// # Errors
///
/// Returns an error if:
/// - The resource does not exist
/// - The slot overlaps an existing booking on the resource
/// - The database operation fails
pub fn create_booking_mysql(
    conn: &mut MysqlConnection,
    title: &str,
    start_at: &str,
    end_at: &str,
    owner_id: i64,
    resource_id: i64,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating booking on resource {} in [{}, {})",
        resource_id, start_at, end_at
    );

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        if !resource_exists_mysql(conn, resource_id)? {
            return Err(PersistenceError::ResourceNotFound(format!(
                "Resource with ID {resource_id} not found"
            )));
        }

        let conflicts: i64 =
            count_conflicting_bookings_mysql(conn, resource_id, start_at, end_at, None)?;
        if conflicts > 0 {
            return Err(PersistenceError::SlotUnavailable { resource_id });
        }

        diesel::insert_into(bookings::table)
            .values((
                bookings::title.eq(title),
                bookings::start_at.eq(start_at),
                bookings::end_at.eq(end_at),
                bookings::owner_id.eq(owner_id),
                bookings::resource_id.eq(resource_id),
            ))
            .execute(conn)?;

        let booking_id: i64 = conn.get_last_insert_rowid()?;

        info!(booking_id, resource_id, "Booking created");
        Ok(booking_id)
    })
}

/// Moves a booking to a new slot, title, and resource (`SQLite` version).
///
/// The conflict check runs against the target resource and excludes the
/// booking itself, so shrinking or shifting within its own previous slot
/// always succeeds. The checks and the update run in one transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `booking_id` - The booking to update
/// * `title` - The new title
/// * `start_at` - New inclusive slot start (ISO 8601 UTC)
/// * `end_at` - New exclusive slot end (ISO 8601 UTC)
/// * `owner_id` - The owning user's ID
/// * `resource_id` - The resource the booking should occupy
///
/// # Errors
///
/// Returns an error if:
/// - The booking does not exist
/// - The target resource does not exist
/// - The new slot overlaps another booking on the target resource
/// - The database operation fails
pub fn reschedule_booking_sqlite(
    conn: &mut SqliteConnection,
    booking_id: i64,
    title: &str,
    start_at: &str,
    end_at: &str,
    owner_id: i64,
    resource_id: i64,
) -> Result<(), PersistenceError> {
    debug!(
        "Rescheduling booking {} to [{}, {}) on resource {}",
        booking_id, start_at, end_at, resource_id
    );

    conn.transaction::<(), PersistenceError, _>(|conn| {
        if get_booking_by_id_sqlite(conn, booking_id)?.is_none() {
            return Err(PersistenceError::BookingNotFound(format!(
                "Booking with ID {booking_id} not found"
            )));
        }

        if !resource_exists_sqlite(conn, resource_id)? {
            return Err(PersistenceError::ResourceNotFound(format!(
                "Resource with ID {resource_id} not found"
            )));
        }

        let conflicts: i64 = count_conflicting_bookings_sqlite(
            conn,
            resource_id,
            start_at,
            end_at,
            Some(booking_id),
        )?;
        if conflicts > 0 {
            return Err(PersistenceError::SlotUnavailable { resource_id });
        }

        diesel::update(bookings::table)
            .filter(bookings::booking_id.eq(booking_id))
            .set((
                bookings::title.eq(title),
                bookings::start_at.eq(start_at),
                bookings::end_at.eq(end_at),
                bookings::owner_id.eq(owner_id),
                bookings::resource_id.eq(resource_id),
            ))
            .execute(conn)?;

        info!(booking_id, "Booking rescheduled");
        Ok(())
    })
}

/// Moves a booking to a new slot, title, and resource (`MySQL` version).
///
/// The conflict check runs against the target resource and excludes the
/// booking itself, so shrinking or shifting within its own previous slot
/// always succeeds. The checks and the update run in one transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `booking_id` - The booking to update
/// * `title` - The new title
/// * `start_at` - New inclusive slot start (ISO 8601 UTC)
/// * `end_at` - New exclusive slot end (ISO 8601 UTC)
/// * `owner_id` - The owning user's ID
/// * `resource_id` - The resource the booking should occupy
///
/// # Errors
///
/// Returns an error if:
/// - The booking does not exist
/// - The target resource does not exist
/// - The new slot overlaps another booking on the target resource
/// - The database operation fails
pub fn reschedule_booking_mysql(
    conn: &mut MysqlConnection,
    booking_id: i64,
    title: &str,
    start_at: &str,
    end_at: &str,
    owner_id: i64,
    resource_id: i64,
) -> Result<(), PersistenceError> {
    debug!(
        "Rescheduling booking {} to [{}, {}) on resource {}",
        booking_id, start_at, end_at, resource_id
    );

    conn.transaction::<(), PersistenceError, _>(|conn| {
        if get_booking_by_id_mysql(conn, booking_id)?.is_none() {
            return Err(PersistenceError::BookingNotFound(format!(
                "Booking with ID {booking_id} not found"
            )));
        }

        if !resource_exists_mysql(conn, resource_id)? {
            return Err(PersistenceError::ResourceNotFound(format!(
                "Resource with ID {resource_id} not found"
            )));
        }

        let conflicts: i64 = count_conflicting_bookings_mysql(
            conn,
            resource_id,
            start_at,
            end_at,
            Some(booking_id),
        )?;
        if conflicts > 0 {
            return Err(PersistenceError::SlotUnavailable { resource_id });
        }

        diesel::update(bookings::table)
            .filter(bookings::booking_id.eq(booking_id))
            .set((
                bookings::title.eq(title),
                bookings::start_at.eq(start_at),
                bookings::end_at.eq(end_at),
                bookings::owner_id.eq(owner_id),
                bookings::resource_id.eq(resource_id),
            ))
            .execute(conn)?;

        info!(booking_id, "Booking rescheduled");
        Ok(())
    })
}

backend_fn! {
/// Deletes a booking.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `booking_id` - The booking ID
///
/// # Errors
///
/// Returns `PersistenceError::BookingNotFound` if no such booking exists,
/// or another error if the database delete fails.
pub fn delete_booking(conn: &mut _, booking_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting booking ID: {}", booking_id);

    let rows_affected: usize = diesel::delete(bookings::table)
        .filter(bookings::booking_id.eq(booking_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::BookingNotFound(format!(
            "Booking with ID {booking_id} not found"
        )));
    }

    info!("Deleted booking ID: {}", booking_id);
    Ok(())
}
}
