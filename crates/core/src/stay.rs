//! Stay windows and the rule that prevents double-booking a unit.
//!
//! A stay occupies the half-open interval `[start, end)`: the checkout day is
//! free for the next check-in. Two windows overlap iff
//! `a.start < b.end && b.start < a.end`.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Day, DbId};

/// Field that carries the overlap error on reservation writes.
pub const OVERLAP_FIELD: &str = "start_date";

/// Message returned when a candidate stay collides with an existing one.
pub const OVERLAP_MESSAGE: &str = "these dates overlap with an existing reservation";

/// A validated `[start, end)` stay. `end == start` is a same-day block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StayWindow {
    start: Day,
    end: Day,
}

impl StayWindow {
    /// Build a window, rejecting `end < start` as a validation error on `end_date`.
    pub fn new(start: Day, end: Day) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::invalid(
                "end_date",
                "end_date must be on or after start_date",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Day {
        self.start
    }

    pub fn end(&self) -> Day {
        self.end
    }

    /// Number of nights covered (zero for a same-day block).
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Half-open overlap test.
    pub fn overlaps(&self, other: &StayWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An existing reservation's window, as seen by the overlap check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedWindow {
    pub reservation_id: DbId,
    pub window: StayWindow,
}

/// Return the first booked window that collides with `candidate`.
///
/// `exclude_id` skips the reservation being updated so it never conflicts
/// with itself. A linear scan is fine at a few hundred stays per unit.
pub fn find_conflict<'a, I>(
    booked: I,
    candidate: &StayWindow,
    exclude_id: Option<DbId>,
) -> Option<&'a BookedWindow>
where
    I: IntoIterator<Item = &'a BookedWindow>,
{
    booked
        .into_iter()
        .filter(|b| Some(b.reservation_id) != exclude_id)
        .find(|b| b.window.overlaps(candidate))
}

/// The error a write is rejected with when [`find_conflict`] finds a match.
pub fn overlap_conflict() -> CoreError {
    CoreError::Conflict {
        field: OVERLAP_FIELD,
        message: OVERLAP_MESSAGE.to_string(),
    }
}
