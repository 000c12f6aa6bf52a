// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for user and session persistence operations.

use crate::tests::{create_test_admin, create_test_user, ts};
use crate::{PersistenceError, SqlitePersistence};

#[test]
fn test_create_and_get_user() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence
        .create_user("Ada Lovelace", "Ada@Example.com", "correct horse", "admin")
        .unwrap();

    let user = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(user.name, "Ada Lovelace");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, "admin");
    assert!(user.created_at.is_some());
    assert!(user.last_login_at.is_none());

    // Passwords are stored hashed, never in the clear
    assert_ne!(user.password_hash, "correct horse");
}

#[test]
fn test_get_user_by_email_is_case_insensitive() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    create_test_user(&mut persistence);

    let user = persistence
        .get_user_by_email("TEST.USER@EXAMPLE.COM")
        .unwrap();
    assert!(user.is_some());
}

#[test]
fn test_get_missing_user_returns_none() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.get_user_by_id(9999).unwrap().is_none());
    assert!(
        persistence
            .get_user_by_email("ghost@example.com")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_duplicate_email_is_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    create_test_user(&mut persistence);

    let result = persistence.create_user("Other Name", "Test.User@example.com", "pw", "user");

    assert!(matches!(
        result,
        Err(PersistenceError::DuplicateUser { email }) if email == "test.user@example.com"
    ));
}

#[test]
fn test_list_users_paginates_in_id_order() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    for i in 0..5 {
        persistence
            .create_user(&format!("User {i}"), &format!("user{i}@example.com"), "pw", "user")
            .unwrap();
    }

    let page = persistence.list_users(1, 2).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].email, "user1@example.com");
    assert_eq!(page[1].email, "user2@example.com");
}

#[test]
fn test_delete_user() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence);

    persistence.delete_user(user_id).unwrap();

    assert!(persistence.get_user_by_id(user_id).unwrap().is_none());
}

#[test]
fn test_delete_missing_user_fails() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let result = persistence.delete_user(9999);
    assert!(matches!(result, Err(PersistenceError::UserNotFound(_))));
}

#[test]
fn test_delete_user_cascades_to_sessions() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence);

    persistence
        .create_session("token-1", user_id, &ts(10, 0))
        .unwrap();
    persistence.delete_user(user_id).unwrap();

    assert!(
        persistence
            .get_session_by_token("token-1")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_verify_password_accepts_correct_and_rejects_wrong() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence);

    let user = persistence.get_user_by_id(user_id).unwrap().unwrap();

    assert!(
        persistence
            .verify_password("hunter2hunter2", &user.password_hash)
            .unwrap()
    );
    assert!(
        !persistence
            .verify_password("wrong password", &user.password_hash)
            .unwrap()
    );
}

#[test]
fn test_update_last_login_sets_timestamp() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence);

    persistence.update_last_login(user_id).unwrap();

    let user = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[test]
fn test_session_lifecycle() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_admin(&mut persistence);

    let session_id = persistence
        .create_session("session-token", user_id, &ts(10, 0))
        .unwrap();

    let session = persistence
        .get_session_by_token("session-token")
        .unwrap()
        .unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.expires_at, ts(10, 0));

    persistence.delete_session("session-token").unwrap();
    assert!(
        persistence
            .get_session_by_token("session-token")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_delete_expired_sessions_keeps_live_ones() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence);

    // One session long expired, one far in the future
    persistence
        .create_session("stale", user_id, "2001-01-01T00:00:00.000000000Z")
        .unwrap();
    persistence
        .create_session("fresh", user_id, &ts(10, 0))
        .unwrap();

    let removed = persistence.delete_expired_sessions().unwrap();

    assert_eq!(removed, 1);
    assert!(persistence.get_session_by_token("stale").unwrap().is_none());
    assert!(persistence.get_session_by_token("fresh").unwrap().is_some());
}

#[test]
fn test_delete_sessions_for_user_removes_all() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence);
    let other_id = create_test_admin(&mut persistence);

    persistence.create_session("a", user_id, &ts(10, 0)).unwrap();
    persistence.create_session("b", user_id, &ts(11, 0)).unwrap();
    persistence.create_session("c", other_id, &ts(10, 0)).unwrap();

    let removed = persistence.delete_sessions_for_user(user_id).unwrap();

    assert_eq!(removed, 2);
    assert!(persistence.get_session_by_token("c").unwrap().is_some());
}
