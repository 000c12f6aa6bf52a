// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for resource persistence operations.

use crate::tests::{create_test_resource, create_test_user, ts};
use crate::{PersistenceError, SqlitePersistence};

#[test]
fn test_create_and_get_resource() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let resource_id = persistence
        .create_resource("Main Hall", Some("Building A"), 120, "auditorium")
        .unwrap();

    let resource = persistence
        .get_resource_by_id(resource_id)
        .unwrap()
        .unwrap();
    assert_eq!(resource.resource_id, resource_id);
    assert_eq!(resource.resource_name, "main hall");
    assert_eq!(resource.location.as_deref(), Some("building a"));
    assert_eq!(resource.capacity, 120);
    assert_eq!(resource.room_type, "auditorium");
}

#[test]
fn test_create_resource_without_location() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let resource_id = persistence
        .create_resource("desk-7", None, 1, "desk")
        .unwrap();

    let resource = persistence
        .get_resource_by_id(resource_id)
        .unwrap()
        .unwrap();
    assert!(resource.location.is_none());
}

#[test]
fn test_duplicate_name_is_rejected_case_insensitively() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    create_test_resource(&mut persistence);

    let result = persistence.create_resource("MAIN HALL", None, 10, "box");

    assert!(matches!(
        result,
        Err(PersistenceError::DuplicateResource { name }) if name == "main hall"
    ));
}

#[test]
fn test_get_resource_by_name_is_case_insensitive() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    create_test_resource(&mut persistence);

    let resource = persistence.get_resource_by_name("Main Hall").unwrap();
    assert!(resource.is_some());
}

#[test]
fn test_list_resources_orders_by_name() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .create_resource("zulu room", None, 4, "meeting_room")
        .unwrap();
    persistence
        .create_resource("alpha room", None, 4, "meeting_room")
        .unwrap();

    let resources = persistence.list_resources(0, 10, None, None).unwrap();

    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].resource_name, "alpha room");
    assert_eq!(resources[1].resource_name, "zulu room");
}

#[test]
fn test_list_resources_filters_by_name_and_location() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .create_resource("quiet box", Some("floor 1"), 1, "box")
        .unwrap();
    persistence
        .create_resource("open space", Some("floor 2"), 30, "open_space")
        .unwrap();

    let by_name = persistence
        .list_resources(0, 10, Some("QUIET"), None)
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].resource_name, "quiet box");

    let by_location = persistence
        .list_resources(0, 10, None, Some("floor 2"))
        .unwrap();
    assert_eq!(by_location.len(), 1);
    assert_eq!(by_location[0].resource_name, "open space");

    let no_match = persistence
        .list_resources(0, 10, Some("quiet"), Some("floor 2"))
        .unwrap();
    assert!(no_match.is_empty());
}

#[test]
fn test_delete_resource() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let resource_id = create_test_resource(&mut persistence);

    persistence.delete_resource(resource_id).unwrap();

    assert!(
        persistence
            .get_resource_by_id(resource_id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_delete_missing_resource_fails() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let result = persistence.delete_resource(9999);
    assert!(matches!(result, Err(PersistenceError::ResourceNotFound(_))));
}

#[test]
fn test_delete_resource_cascades_to_bookings() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence);
    let resource_id = create_test_resource(&mut persistence);

    let booking_id = persistence
        .create_booking("Standup", &ts(1, 9), &ts(1, 10), user_id, resource_id)
        .unwrap();

    persistence.delete_resource(resource_id).unwrap();

    assert!(persistence.get_booking_by_id(booking_id).unwrap().is_none());
}
