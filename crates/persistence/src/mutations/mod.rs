// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Most mutations use Diesel DSL and are backend-agnostic, with minimal use of
//! backend-specific helpers (e.g., `last_insert_rowid()` for `SQLite`).
//!
//! ## Module Organization
//!
//! - `bookings`: booking mutations, including transactional slot claims
//! - `resources`: resource mutations
//! - `users`: user and session mutations
//!
//! ## Backend-Specific Code
//!
//! Backend-specific helpers (e.g., `get_last_insert_rowid()`) are imported from
//! the `backend` module. All other code uses Diesel DSL exclusively.

pub mod bookings;
pub mod resources;
pub mod users;

// Re-export backend-specific mutation functions used by lib.rs
pub use bookings::{
    create_booking_mysql, create_booking_sqlite, delete_booking_mysql, delete_booking_sqlite,
    reschedule_booking_mysql, reschedule_booking_sqlite,
};
pub use resources::{
    create_resource_mysql, create_resource_sqlite, delete_resource_mysql, delete_resource_sqlite,
};
pub use users::{
    create_session_mysql, create_session_sqlite, create_user_mysql, create_user_sqlite,
    delete_expired_sessions_mysql, delete_expired_sessions_sqlite, delete_session_mysql,
    delete_session_sqlite, delete_sessions_for_user_mysql, delete_sessions_for_user_sqlite,
    delete_user_mysql, delete_user_sqlite, touch_session_mysql, touch_session_sqlite,
    update_last_login_mysql, update_last_login_sqlite,
};
