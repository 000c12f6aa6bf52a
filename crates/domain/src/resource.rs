// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::room_type::RoomType;

/// A bookable resource: a room, desk, or other reservable space.
///
/// Names and locations are case-normalized to lowercase on construction so
/// uniqueness and search are case-insensitive. Capacity is non-negative;
/// zero means "capacity not tracked".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// The identifier assigned by the store. `None` until persisted.
    resource_id: Option<i64>,
    name: String,
    location: Option<String>,
    capacity: i64,
    room_type: RoomType,
}

impl Resource {
    /// Creates a resource, validating and normalizing its fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidResourceName` if the name is empty or
    /// `DomainError::InvalidCapacity` if the capacity is negative.
    pub fn new(
        name: &str,
        location: Option<&str>,
        capacity: i64,
        room_type: RoomType,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidResourceName(String::from(
                "name must not be empty",
            )));
        }
        if capacity < 0 {
            return Err(DomainError::InvalidCapacity { capacity });
        }

        Ok(Self {
            resource_id: None,
            name: name.to_lowercase(),
            location: location.map(str::to_lowercase),
            capacity,
            room_type,
        })
    }

    /// Creates a resource with a store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Same validation as [`Resource::new`].
    pub fn with_id(
        resource_id: i64,
        name: &str,
        location: Option<&str>,
        capacity: i64,
        room_type: RoomType,
    ) -> Result<Self, DomainError> {
        let mut resource: Self = Self::new(name, location, capacity, room_type)?;
        resource.resource_id = Some(resource_id);
        Ok(resource)
    }

    /// The store-assigned identifier, if persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.resource_id
    }

    /// The lowercased resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lowercased location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The capacity of the resource.
    #[must_use]
    pub const fn capacity(&self) -> i64 {
        self.capacity
    }

    /// The room type.
    #[must_use]
    pub const fn room_type(&self) -> RoomType {
        self.room_type
    }
}
