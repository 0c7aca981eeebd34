//! Inclusive day ranges used by the availability calendar.
//!
//! Unlike a [`StayWindow`](crate::stay::StayWindow), a `DayRange` includes
//! its last day: `[2025-03-01, 2025-03-03]` covers three days.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Day;

/// Largest range a single bulk write may cover.
pub const MAX_BULK_DAYS: i64 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRange {
    start: Day,
    end: Day,
}

impl DayRange {
    /// Build a range, rejecting `end < start` as a validation error on `end_date`.
    pub fn new(start: Day, end: Day) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::invalid(
                "end_date",
                "end_date must be on or after start_date",
            ));
        }
        Ok(Self { start, end })
    }

    /// Like [`DayRange::new`], additionally capping the length at [`MAX_BULK_DAYS`].
    pub fn new_bulk(start: Day, end: Day) -> Result<Self, CoreError> {
        let range = Self::new(start, end)?;
        if range.day_count() > MAX_BULK_DAYS {
            return Err(CoreError::invalid(
                "end_date",
                format!("a bulk update may cover at most {MAX_BULK_DAYS} days"),
            ));
        }
        Ok(range)
    }

    pub fn start(&self) -> Day {
        self.start
    }

    pub fn end(&self) -> Day {
        self.end
    }

    /// `(end - start) + 1`.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every calendar day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = Day> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.succ_opt()).take_while(move |d| *d <= end)
    }
}
