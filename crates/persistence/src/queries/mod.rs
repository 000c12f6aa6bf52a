// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries, grouped by entity.
//!
//! - `bookings`: booking lookups, listings, and availability counting
//! - `resources`: resource lookups and listings
//! - `users`: user and session lookups
//!
//! Every query is generated as a monomorphic pair, suffixed `_sqlite` and
//! `_mysql`. The `Persistence` adapter in `lib.rs` picks the right one for
//! the connection it holds.

pub mod bookings;
pub mod resources;
pub mod users;

// Re-export backend-specific query functions used by lib.rs
pub use bookings::{
    count_conflicting_bookings_mysql, count_conflicting_bookings_sqlite, get_booking_by_id_mysql,
    get_booking_by_id_sqlite, list_all_bookings_mysql, list_all_bookings_sqlite,
    list_bookings_for_owner_mysql, list_bookings_for_owner_sqlite,
};
pub use resources::{
    get_resource_by_id_mysql, get_resource_by_id_sqlite, get_resource_by_name_mysql,
    get_resource_by_name_sqlite, list_resources_mysql, list_resources_sqlite,
    resource_exists_mysql, resource_exists_sqlite,
};
pub use users::{
    count_users_mysql, count_users_sqlite, get_session_by_token_mysql, get_session_by_token_sqlite,
    get_user_by_email_mysql, get_user_by_email_sqlite, get_user_by_id_mysql, get_user_by_id_sqlite,
    list_users_mysql, list_users_sqlite, verify_password,
};
