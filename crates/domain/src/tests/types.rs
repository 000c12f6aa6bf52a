// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::morning_slot;
use crate::{Booking, DomainError, Resource, Role, RoomType, User};

#[test]
fn test_resource_creation() {
    let resource: Resource =
        Resource::new("Main Hall", Some("Building A"), 120, RoomType::Auditorium).unwrap();

    assert_eq!(resource.id(), None);
    assert_eq!(resource.name(), "main hall");
    assert_eq!(resource.location(), Some("building a"));
    assert_eq!(resource.capacity(), 120);
    assert_eq!(resource.room_type(), RoomType::Auditorium);
}

#[test]
fn test_resource_name_normalized_to_lowercase() {
    let upper: Resource = Resource::new("DESK-7", None, 1, RoomType::Desk).unwrap();
    let lower: Resource = Resource::new("desk-7", None, 1, RoomType::Desk).unwrap();

    assert_eq!(upper.name(), lower.name());
}

#[test]
fn test_resource_without_location() {
    let resource: Resource = Resource::new("quiet box", None, 0, RoomType::Box).unwrap();
    assert_eq!(resource.location(), None);
    assert_eq!(resource.capacity(), 0);
}

#[test]
fn test_resource_rejects_empty_name() {
    let result: Result<Resource, DomainError> = Resource::new("   ", None, 4, RoomType::Desk);
    assert!(matches!(result, Err(DomainError::InvalidResourceName(_))));
}

#[test]
fn test_resource_rejects_negative_capacity() {
    let result: Result<Resource, DomainError> =
        Resource::new("room", None, -1, RoomType::MeetingRoom);
    assert!(matches!(
        result,
        Err(DomainError::InvalidCapacity { capacity: -1 })
    ));
}

#[test]
fn test_resource_with_id() {
    let resource: Resource =
        Resource::with_id(7, "Lab", Some("Floor 2"), 10, RoomType::ConferenceRoom).unwrap();
    assert_eq!(resource.id(), Some(7));
    assert_eq!(resource.name(), "lab");
}

#[test]
fn test_booking_creation() {
    let booking: Booking = Booking::new("Standup", morning_slot(), 1, 2).unwrap();

    assert_eq!(booking.id(), None);
    assert_eq!(booking.title(), "Standup");
    assert_eq!(booking.owner_id(), 1);
    assert_eq!(booking.resource_id(), 2);
    assert_eq!(*booking.slot(), morning_slot());
}

#[test]
fn test_booking_title_preserves_case() {
    let booking: Booking = Booking::new("Quarterly Review", morning_slot(), 1, 2).unwrap();
    assert_eq!(booking.title(), "Quarterly Review");
}

#[test]
fn test_booking_rejects_empty_title() {
    let result: Result<Booking, DomainError> = Booking::new("  ", morning_slot(), 1, 2);
    assert!(matches!(result, Err(DomainError::InvalidTitle(_))));
}

#[test]
fn test_booking_with_id() {
    let booking: Booking = Booking::with_id(42, "Standup", morning_slot(), 1, 2).unwrap();
    assert_eq!(booking.id(), Some(42));
}

#[test]
fn test_user_creation() {
    let user: User = User::new("Ada Lovelace", "Ada@Example.COM", Role::User).unwrap();

    assert_eq!(user.id(), None);
    assert_eq!(user.name(), "Ada Lovelace");
    assert_eq!(user.email(), "ada@example.com");
    assert_eq!(user.role(), Role::User);
}

#[test]
fn test_user_email_trimmed_and_lowercased() {
    let user: User = User::new("Ada", "  ADA@EXAMPLE.COM ", Role::Admin).unwrap();
    assert_eq!(user.email(), "ada@example.com");
}

#[test]
fn test_user_rejects_empty_name() {
    let result: Result<User, DomainError> = User::new("", "ada@example.com", Role::User);
    assert!(matches!(result, Err(DomainError::InvalidName(_))));
}

#[test]
fn test_user_rejects_malformed_email() {
    for email in ["", "plainaddress", "@example.com", "user@", "user@nodot"] {
        let result: Result<User, DomainError> = User::new("Ada", email, Role::User);
        assert!(
            matches!(result, Err(DomainError::InvalidEmail(_))),
            "expected rejection for {email:?}"
        );
    }
}

#[test]
fn test_user_with_id() {
    let user: User = User::with_id(3, "Ada", "ada@example.com", Role::Admin).unwrap();
    assert_eq!(user.id(), Some(3));
    assert_eq!(user.role(), Role::Admin);
}
