// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::time_slot::TimeSlot;

/// A reservation of a resource over a half-open time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The identifier assigned by the store. `None` until persisted.
    booking_id: Option<i64>,
    title: String,
    slot: TimeSlot,
    owner_id: i64,
    resource_id: i64,
}

impl Booking {
    /// Creates a booking, validating the title.
    ///
    /// The slot carries its own ordering invariant, so a `Booking` can only
    /// ever hold a well-formed interval.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTitle` if the title is empty.
    pub fn new(
        title: &str,
        slot: TimeSlot,
        owner_id: i64,
        resource_id: i64,
    ) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::InvalidTitle(String::from(
                "title must not be empty",
            )));
        }

        Ok(Self {
            booking_id: None,
            title: String::from(title),
            slot,
            owner_id,
            resource_id,
        })
    }

    /// Creates a booking with a store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Same validation as [`Booking::new`].
    pub fn with_id(
        booking_id: i64,
        title: &str,
        slot: TimeSlot,
        owner_id: i64,
        resource_id: i64,
    ) -> Result<Self, DomainError> {
        let mut booking: Self = Self::new(title, slot, owner_id, resource_id)?;
        booking.booking_id = Some(booking_id);
        Ok(booking)
    }

    /// The store-assigned identifier, if persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.booking_id
    }

    /// The booking title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The reserved time slot.
    #[must_use]
    pub const fn slot(&self) -> &TimeSlot {
        &self.slot
    }

    /// The identifier of the user who owns this booking.
    #[must_use]
    pub const fn owner_id(&self) -> i64 {
        self.owner_id
    }

    /// The identifier of the booked resource.
    #[must_use]
    pub const fn resource_id(&self) -> i64 {
        self.resource_id
    }
}
