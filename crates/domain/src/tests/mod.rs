// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod types;

use time::OffsetDateTime;
use time::macros::datetime;

use crate::TimeSlot;

pub fn slot(start: OffsetDateTime, end: OffsetDateTime) -> TimeSlot {
    TimeSlot::new(start, end).unwrap()
}

pub fn morning_slot() -> TimeSlot {
    slot(
        datetime!(2026-06-01 09:00 UTC),
        datetime!(2026-06-01 10:00 UTC),
    )
}
