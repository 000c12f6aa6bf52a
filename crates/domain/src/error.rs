// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The interval is empty or inverted (`end <= start`).
    InvalidTimeSlot {
        /// Description of the violation.
        reason: String,
    },
    /// The interval lies (partly) in the past at a point where that is
    /// not allowed.
    TimeSlotInPast {
        /// The field that was in the past (`start` or `end`).
        field: &'static str,
    },
    /// Booking title is empty or invalid.
    InvalidTitle(String),
    /// Resource name is empty or invalid.
    InvalidResourceName(String),
    /// Resource capacity is negative.
    InvalidCapacity {
        /// The rejected capacity value.
        capacity: i64,
    },
    /// Room type string does not name a known room type.
    InvalidRoomType(String),
    /// Role string does not name a known role.
    InvalidRole(String),
    /// User name is empty or invalid.
    InvalidName(String),
    /// User email is empty or malformed.
    InvalidEmail(String),
    /// Failed to parse a timestamp from a string.
    TimestampParseError {
        /// The invalid timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to format a timestamp as a string.
    TimestampFormatError {
        /// The formatting error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeSlot { reason } => write!(f, "Invalid time slot: {reason}"),
            Self::TimeSlotInPast { field } => {
                write!(f, "'{field}' must not be in the past")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidResourceName(msg) => write!(f, "Invalid resource name: {msg}"),
            Self::InvalidCapacity { capacity } => {
                write!(f, "Invalid capacity {capacity}: must be non-negative")
            }
            Self::InvalidRoomType(value) => write!(f, "Invalid room type: '{value}'"),
            Self::InvalidRole(value) => write!(f, "Invalid role: '{value}'"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::TimestampParseError { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
            Self::TimestampFormatError { error } => {
                write!(f, "Failed to format timestamp: {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
