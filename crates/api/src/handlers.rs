// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use std::str::FromStr;
use time::OffsetDateTime;

use resa_domain::{
    Booking, DomainError, Resource, Role, RoomType, TimeSlot, User, format_timestamp,
    parse_timestamp,
};
use resa_persistence::{BookingData, ResourceData, SqlitePersistence, UserData};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    BookingResponse, CreateBookingRequest, CreateResourceRequest, CreateUserRequest, LoginRequest,
    LoginResponse, ResourceResponse, UpdateBookingRequest, UserResponse,
};

/// Parses a request timestamp, attributing failures to the given field.
fn parse_instant(field: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    parse_timestamp(value).map_err(|e| match e {
        DomainError::TimestampParseError { value, error } => ApiError::InvalidInput {
            field: String::from(field),
            message: format!("Failed to parse timestamp '{value}': {error}"),
        },
        other => translate_domain_error(other),
    })
}

/// Parses a timestamp already stored in the database.
///
/// Stored timestamps are written by this crate, so a parse failure here
/// is an internal fault, not a caller error.
fn parse_stored_instant(value: &str) -> Result<OffsetDateTime, ApiError> {
    parse_timestamp(value).map_err(|e| ApiError::Internal {
        message: format!("Stored timestamp is invalid: {e}"),
    })
}

/// Rebuilds the time slot of a stored booking.
fn stored_slot(data: &BookingData) -> Result<TimeSlot, ApiError> {
    let start: OffsetDateTime = parse_stored_instant(&data.start_at)?;
    let end: OffsetDateTime = parse_stored_instant(&data.end_at)?;
    TimeSlot::new(start, end).map_err(|e| ApiError::Internal {
        message: format!("Stored booking slot is invalid: {e}"),
    })
}

/// The uniform not-found error for a booking.
///
/// Used both when the booking does not exist and when it exists but is
/// not visible to the requesting actor.
fn booking_not_found(booking_id: i64) -> ApiError {
    ApiError::NotFound {
        entity: String::from("Booking"),
        message: format!("Booking {booking_id} does not exist"),
    }
}

/// Whether the actor may see a booking owned by `owner_id`.
fn booking_visible(actor: &AuthenticatedActor, owner_id: i64) -> bool {
    actor.is_admin() || actor.id == owner_id
}

fn booking_response(data: BookingData) -> BookingResponse {
    BookingResponse {
        id: data.booking_id,
        title: data.title,
        start: data.start_at,
        end: data.end_at,
        resource_id: data.resource_id,
        owner_id: data.owner_id,
    }
}

fn resource_response(data: ResourceData) -> Result<ResourceResponse, ApiError> {
    let room_type: RoomType =
        RoomType::from_str(&data.room_type).map_err(|e| ApiError::Internal {
            message: format!("Stored room type is invalid: {e}"),
        })?;

    Ok(ResourceResponse {
        id: data.resource_id,
        name: data.resource_name,
        location: data.location,
        capacity: data.capacity,
        room_type,
    })
}

fn user_response(data: &UserData) -> Result<UserResponse, ApiError> {
    let role: Role = Role::from_str(&data.role).map_err(|e| ApiError::Internal {
        message: format!("Stored role is invalid: {e}"),
    })?;

    Ok(UserResponse {
        id: data.user_id,
        name: data.name.clone(),
        email: data.email.clone(),
        role,
    })
}

/// Creates a new booking owned by the authenticated actor.
///
/// The slot must lie entirely in the future and the resource must be free
/// for it. Both ends of the slot are checked against the wall clock at the
/// time of the call.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The booking to create
/// * `actor` - The authenticated actor, who becomes the owner
///
/// # Errors
///
/// Returns an error if the slot is invalid, lies in the past, the resource
/// does not exist, or the resource is already booked for an overlapping slot.
pub fn create_booking(
    persistence: &mut SqlitePersistence,
    request: CreateBookingRequest,
    actor: &AuthenticatedActor,
) -> Result<BookingResponse, ApiError> {
    let start: OffsetDateTime = parse_instant("start", &request.start)?;
    let end: OffsetDateTime = parse_instant("end", &request.end)?;

    let slot: TimeSlot = TimeSlot::new(start, end).map_err(translate_domain_error)?;
    slot.ensure_not_in_past(OffsetDateTime::now_utc())
        .map_err(translate_domain_error)?;

    let booking: Booking = Booking::new(&request.title, slot, actor.id, request.resource_id)
        .map_err(translate_domain_error)?;

    let start_at: String = format_timestamp(slot.start()).map_err(translate_domain_error)?;
    let end_at: String = format_timestamp(slot.end()).map_err(translate_domain_error)?;

    let booking_id: i64 = persistence
        .create_booking(
            booking.title(),
            &start_at,
            &end_at,
            booking.owner_id(),
            booking.resource_id(),
        )
        .map_err(translate_persistence_error)?;

    Ok(BookingResponse {
        id: booking_id,
        title: String::from(booking.title()),
        start: start_at,
        end: end_at,
        resource_id: booking.resource_id(),
        owner_id: booking.owner_id(),
    })
}

/// Retrieves a single booking by ID.
///
/// Non-admin actors can only see their own bookings. A booking owned by
/// someone else produces the same error as a missing one.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `booking_id` - The booking to retrieve
/// * `actor` - The authenticated actor
///
/// # Errors
///
/// Returns an error if the booking does not exist or is not visible to
/// the actor.
pub fn get_booking(
    persistence: &mut SqlitePersistence,
    booking_id: i64,
    actor: &AuthenticatedActor,
) -> Result<BookingResponse, ApiError> {
    let booking: BookingData = persistence
        .get_booking_by_id(booking_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| booking_not_found(booking_id))?;

    if !booking_visible(actor, booking.owner_id) {
        return Err(booking_not_found(booking_id));
    }

    Ok(booking_response(booking))
}

/// Lists the authenticated actor's own bookings.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor
/// * `offset` - Number of bookings to skip
/// * `limit` - Maximum number of bookings to return
/// * `title` - Optional case-insensitive title substring filter
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
    offset: i64,
    limit: i64,
    title: Option<&str>,
) -> Result<Vec<BookingResponse>, ApiError> {
    let bookings: Vec<BookingData> = persistence
        .list_bookings_for_owner(actor.id, offset, limit, title)
        .map_err(translate_persistence_error)?;

    Ok(bookings.into_iter().map(booking_response).collect())
}

/// Lists bookings across all owners.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor (must be Admin)
/// * `offset` - Number of bookings to skip
/// * `limit` - Maximum number of bookings to return
/// * `title` - Optional case-insensitive title substring filter
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_all_bookings(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
    offset: i64,
    limit: i64,
    title: Option<&str>,
) -> Result<Vec<BookingResponse>, ApiError> {
    AuthorizationService::require_admin(actor, "list_all_bookings")?;

    let bookings: Vec<BookingData> = persistence
        .list_all_bookings(offset, limit, title)
        .map_err(translate_persistence_error)?;

    Ok(bookings.into_iter().map(booking_response).collect())
}

/// Updates a booking's title, slot, and resource.
///
/// A booking whose slot has already ended is immutable. The new slot may
/// start in the past, which allows corrections to in-progress bookings.
/// Ownership moves to the actor performing the update.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `booking_id` - The booking to update
/// * `request` - The replacement title, slot, and resource
/// * `actor` - The authenticated actor, who becomes the owner
///
/// # Errors
///
/// Returns an error if the booking does not exist or is not visible to the
/// actor, has already ended, the new slot is invalid, or the target
/// resource is unavailable for the new slot.
pub fn update_booking(
    persistence: &mut SqlitePersistence,
    booking_id: i64,
    request: UpdateBookingRequest,
    actor: &AuthenticatedActor,
) -> Result<BookingResponse, ApiError> {
    let existing: BookingData = persistence
        .get_booking_by_id(booking_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| booking_not_found(booking_id))?;

    if !booking_visible(actor, existing.owner_id) {
        return Err(booking_not_found(booking_id));
    }

    if stored_slot(&existing)?.ends_before(OffsetDateTime::now_utc()) {
        return Err(ApiError::TemporalRuleViolation {
            message: String::from("Booking has already ended and can no longer be modified"),
        });
    }

    let start: OffsetDateTime = parse_instant("start", &request.start)?;
    let end: OffsetDateTime = parse_instant("end", &request.end)?;
    let slot: TimeSlot = TimeSlot::new(start, end).map_err(translate_domain_error)?;

    let booking: Booking = Booking::new(&request.title, slot, actor.id, request.resource_id)
        .map_err(translate_domain_error)?;

    let start_at: String = format_timestamp(slot.start()).map_err(translate_domain_error)?;
    let end_at: String = format_timestamp(slot.end()).map_err(translate_domain_error)?;

    persistence
        .reschedule_booking(
            booking_id,
            booking.title(),
            &start_at,
            &end_at,
            booking.owner_id(),
            booking.resource_id(),
        )
        .map_err(translate_persistence_error)?;

    Ok(BookingResponse {
        id: booking_id,
        title: String::from(booking.title()),
        start: start_at,
        end: end_at,
        resource_id: booking.resource_id(),
        owner_id: booking.owner_id(),
    })
}

/// Deletes a booking.
///
/// Bookings that have already ended are kept as history and cannot be
/// deleted.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `booking_id` - The booking to delete
/// * `actor` - The authenticated actor
///
/// # Errors
///
/// Returns an error if the booking does not exist or is not visible to the
/// actor, or if the booking has already ended.
pub fn delete_booking(
    persistence: &mut SqlitePersistence,
    booking_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let existing: BookingData = persistence
        .get_booking_by_id(booking_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| booking_not_found(booking_id))?;

    if !booking_visible(actor, existing.owner_id) {
        return Err(booking_not_found(booking_id));
    }

    if stored_slot(&existing)?.ends_at_or_before(OffsetDateTime::now_utc()) {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("immutable_past_booking"),
            message: String::from("Cannot delete a booking that has already ended"),
        });
    }

    persistence
        .delete_booking(booking_id)
        .map_err(translate_persistence_error)?;

    Ok(())
}

/// Creates a new resource.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The resource to create
/// * `actor` - The authenticated actor (must be Admin)
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the fields are invalid,
/// or a resource with the same name already exists.
pub fn create_resource(
    persistence: &mut SqlitePersistence,
    request: CreateResourceRequest,
    actor: &AuthenticatedActor,
) -> Result<ResourceResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_resource")?;

    let room_type: RoomType =
        RoomType::from_str(&request.room_type).map_err(translate_domain_error)?;
    let resource: Resource = Resource::new(
        &request.name,
        request.location.as_deref(),
        request.capacity,
        room_type,
    )
    .map_err(translate_domain_error)?;

    let resource_id: i64 = persistence
        .create_resource(
            resource.name(),
            resource.location(),
            resource.capacity(),
            resource.room_type().as_str(),
        )
        .map_err(translate_persistence_error)?;

    Ok(ResourceResponse {
        id: resource_id,
        name: String::from(resource.name()),
        location: resource.location().map(String::from),
        capacity: resource.capacity(),
        room_type: resource.room_type(),
    })
}

/// Retrieves a single resource by ID.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `resource_id` - The resource to retrieve
///
/// # Errors
///
/// Returns an error if the resource does not exist.
pub fn get_resource(
    persistence: &mut SqlitePersistence,
    resource_id: i64,
) -> Result<ResourceResponse, ApiError> {
    let resource: ResourceData = persistence
        .get_resource_by_id(resource_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            entity: String::from("Resource"),
            message: format!("Resource {resource_id} does not exist"),
        })?;

    resource_response(resource)
}

/// Lists resources, optionally filtered by name and location.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `offset` - Number of resources to skip
/// * `limit` - Maximum number of resources to return
/// * `name` - Optional case-insensitive name substring filter
/// * `location` - Optional case-insensitive location substring filter
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_resources(
    persistence: &mut SqlitePersistence,
    offset: i64,
    limit: i64,
    name: Option<&str>,
    location: Option<&str>,
) -> Result<Vec<ResourceResponse>, ApiError> {
    let resources: Vec<ResourceData> = persistence
        .list_resources(offset, limit, name, location)
        .map_err(translate_persistence_error)?;

    resources.into_iter().map(resource_response).collect()
}

/// Deletes a resource and all bookings on it.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `resource_id` - The resource to delete
/// * `actor` - The authenticated actor (must be Admin)
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the resource does not
/// exist.
pub fn delete_resource(
    persistence: &mut SqlitePersistence,
    resource_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(actor, "delete_resource")?;

    persistence
        .delete_resource(resource_id)
        .map_err(translate_persistence_error)?;

    Ok(())
}

/// Registers a new user account.
///
/// Registration is open and the requested role is honored as provided.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The account to create
///
/// # Errors
///
/// Returns an error if the fields are invalid, the password violates the
/// password policy, or the email is already registered.
pub fn create_user(
    persistence: &mut SqlitePersistence,
    request: CreateUserRequest,
) -> Result<UserResponse, ApiError> {
    let role: Role = Role::from_str(&request.role).map_err(translate_domain_error)?;
    let user: User = User::new(&request.name, &request.email, role)
        .map_err(translate_domain_error)?;

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(&request.password, user.email(), user.name())?;

    let user_id: i64 = persistence
        .create_user(user.name(), user.email(), &request.password, role.as_str())
        .map_err(translate_persistence_error)?;

    Ok(UserResponse {
        id: user_id,
        name: String::from(user.name()),
        email: String::from(user.email()),
        role,
    })
}

/// Retrieves a single user by ID.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `user_id` - The user to retrieve
///
/// # Errors
///
/// Returns an error if the user does not exist.
pub fn get_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
) -> Result<UserResponse, ApiError> {
    let user: UserData = persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            entity: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })?;

    user_response(&user)
}

/// Lists user accounts.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `offset` - Number of users to skip
/// * `limit` - Maximum number of users to return
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_users(
    persistence: &mut SqlitePersistence,
    offset: i64,
    limit: i64,
) -> Result<Vec<UserResponse>, ApiError> {
    let users: Vec<UserData> = persistence
        .list_users(offset, limit)
        .map_err(translate_persistence_error)?;

    users.iter().map(user_response).collect()
}

/// Deletes a user account, their sessions, and all their bookings.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `user_id` - The user to delete
/// * `actor` - The authenticated actor (must be Admin)
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the user does not
/// exist.
pub fn delete_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(actor, "delete_user")?;

    persistence
        .delete_sessions_for_user(user_id)
        .map_err(translate_persistence_error)?;
    persistence
        .delete_user(user_id)
        .map_err(translate_persistence_error)?;

    Ok(())
}

/// Authenticates a user and creates a session.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The login credentials
///
/// # Returns
///
/// The session token together with the authenticated user's information.
///
/// # Errors
///
/// Returns an error if authentication fails.
pub fn login(
    persistence: &mut SqlitePersistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _authenticated_actor, user): (String, AuthenticatedActor, UserData) =
        AuthenticationService::login(persistence, &request.email, &request.password)?;

    // Get session expiration from the session we just created
    let session: Option<resa_persistence::SessionData> = persistence
        .get_session_by_token(&session_token)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to retrieve session: {e}"),
        })?;

    let expires_at: String = session
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    let role: Role = Role::from_str(&user.role).map_err(|e| ApiError::Internal {
        message: format!("Stored role is invalid: {e}"),
    })?;

    Ok(LoginResponse {
        session_token,
        expires_at,
        user_id: user.user_id,
        name: user.name,
        email: user.email,
        role,
    })
}

/// Logs out by deleting the session.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `session_token` - The session token to delete
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut SqlitePersistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the current user's information.
///
/// # Arguments
///
/// * `user` - The user data from the validated session
///
/// # Errors
///
/// Returns an error if the stored role cannot be interpreted.
pub fn whoami(user: &UserData) -> Result<UserResponse, ApiError> {
    user_response(user)
}
