// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open time intervals.
//!
//! A [`TimeSlot`] is the interval `[start, end)`: the end instant is
//! excluded, so a slot ending exactly when another starts does not
//! conflict with it. All instants are normalized to UTC on construction
//! so comparisons never depend on the offset a caller supplied.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Iso8601;
use time::{OffsetDateTime, UtcOffset};

use crate::error::DomainError;

/// A non-empty half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl TimeSlot {
    /// Creates a time slot from two instants.
    ///
    /// Both instants are converted to UTC. The interval must be non-empty:
    /// `start < end`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeSlot` if `end <= start`.
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, DomainError> {
        let start: OffsetDateTime = start.to_offset(UtcOffset::UTC);
        let end: OffsetDateTime = end.to_offset(UtcOffset::UTC);

        if end <= start {
            return Err(DomainError::InvalidTimeSlot {
                reason: String::from("'end' must be after the booking start date time"),
            });
        }

        Ok(Self { start, end })
    }

    /// The inclusive start instant.
    #[must_use]
    pub const fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// The exclusive end instant.
    #[must_use]
    pub const fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Returns whether this slot overlaps `other`.
    ///
    /// Two half-open intervals `[s1, e1)` and `[s2, e2)` overlap iff
    /// `s1 < e2 && s2 < e1`. Touching boundaries (one slot's end equal to
    /// the other's start) do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Validates that the slot does not begin or end before `now`.
    ///
    /// This is the creation-time rule: a new booking may not lie even
    /// partly in the past. Because `start < end` always holds, a start at
    /// or after `now` implies the end is too, but both fields are checked
    /// so the error names the offending one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TimeSlotInPast` naming the offending field.
    pub fn ensure_not_in_past(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        if self.start < now {
            return Err(DomainError::TimeSlotInPast { field: "start" });
        }
        if self.end < now {
            return Err(DomainError::TimeSlotInPast { field: "end" });
        }
        Ok(())
    }

    /// Returns whether the slot ends strictly before `now`.
    #[must_use]
    pub fn ends_before(&self, now: OffsetDateTime) -> bool {
        self.end < now
    }

    /// Returns whether the slot ends at or before `now`.
    #[must_use]
    pub fn ends_at_or_before(&self, now: OffsetDateTime) -> bool {
        self.end <= now
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Parses an ISO-8601 timestamp with offset and normalizes it to UTC.
///
/// # Errors
///
/// Returns `DomainError::TimestampParseError` if the string is not a
/// valid ISO-8601 timestamp carrying an offset.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT)
        .map(|parsed| parsed.to_offset(UtcOffset::UTC))
        .map_err(|e| DomainError::TimestampParseError {
            value: value.to_string(),
            error: e.to_string(),
        })
}

/// Formats a timestamp as ISO-8601 in UTC.
///
/// This is the canonical storage and wire representation: fixed-width, so
/// lexicographic comparison of two formatted timestamps matches their
/// chronological order.
///
/// # Errors
///
/// Returns `DomainError::TimestampFormatError` if formatting fails.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, DomainError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(&Iso8601::DEFAULT)
        .map_err(|e| DomainError::TimestampFormatError {
            error: e.to_string(),
        })
}
