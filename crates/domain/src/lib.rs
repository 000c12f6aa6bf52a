// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types for the resa booking backend.
//!
//! This crate holds the vocabulary of the system: roles, room types, time
//! slots, resources, bookings, and users, together with the validation
//! rules that make an instance of each type well-formed. It performs no
//! I/O; persistence and transport concerns live in the other crates.
//!
//! ## Invariants enforced here
//!
//! - A [`TimeSlot`] is always a non-empty half-open interval `[start, end)`.
//! - Resource names and locations are lowercased on construction.
//! - User emails are lowercased and minimally shape-checked.
//! - [`Role`] ordering is numeric rank, compared with "at least" semantics.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking;
mod error;
mod resource;
mod role;
mod room_type;
mod time_slot;
mod user;

#[cfg(test)]
mod tests;

pub use booking::Booking;
pub use error::DomainError;
pub use resource::Resource;
pub use role::Role;
pub use room_type::RoomType;
pub use time_slot::{TimeSlot, format_timestamp, parse_timestamp};
pub use user::User;
