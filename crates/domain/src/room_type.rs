// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The kind of bookable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// Large presentation space.
    #[default]
    Auditorium,
    /// Single-person focus box.
    Box,
    /// Conference room.
    ConferenceRoom,
    /// Individual desk.
    Desk,
    /// Meeting room.
    MeetingRoom,
    /// Shared open space.
    OpenSpace,
}

impl RoomType {
    /// All room types, in stable order.
    pub const ALL: [Self; 6] = [
        Self::Auditorium,
        Self::Box,
        Self::ConferenceRoom,
        Self::Desk,
        Self::MeetingRoom,
        Self::OpenSpace,
    ];

    /// Converts this room type to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auditorium => "auditorium",
            Self::Box => "box",
            Self::ConferenceRoom => "conference_room",
            Self::Desk => "desk",
            Self::MeetingRoom => "meeting_room",
            Self::OpenSpace => "open_space",
        }
    }
}

impl FromStr for RoomType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auditorium" => Ok(Self::Auditorium),
            "box" => Ok(Self::Box),
            "conference_room" => Ok(Self::ConferenceRoom),
            "desk" => Ok(Self::Desk),
            "meeting_room" => Ok(Self::MeetingRoom),
            "open_space" => Ok(Self::OpenSpace),
            _ => Err(DomainError::InvalidRoomType(s.to_string())),
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_round_trips() {
        for room_type in RoomType::ALL {
            assert_eq!(RoomType::from_str(room_type.as_str()).unwrap(), room_type);
        }
    }

    #[test]
    fn rejects_unknown_room_types() {
        assert_eq!(
            RoomType::from_str("garage"),
            Err(DomainError::InvalidRoomType(String::from("garage")))
        );
        // Case-sensitive: stored values are always lowercase.
        assert!(RoomType::from_str("Desk").is_err());
    }
}
