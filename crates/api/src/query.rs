//! Shared query parameter types for API handlers.

use serde::Deserialize;
use staybook_core::day_range::DayRange;
use staybook_core::error::{CoreError, FieldErrors};
use staybook_core::stay::StayWindow;
use staybook_core::types::{Day, DbId};

/// `?start_date=&end_date=` with both ends inclusive.
///
/// Both fields are optional at the extractor level so a missing one comes
/// back as a field-keyed validation error instead of a plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
}

impl DateRangeParams {
    /// Both dates are required.
    pub fn require(self) -> Result<DayRange, CoreError> {
        let (start, end) = both(self.start_date, self.end_date)?;
        DayRange::new(start, end)
    }

    /// Either both dates or neither.
    pub fn optional(self) -> Result<Option<DayRange>, CoreError> {
        match (self.start_date, self.end_date) {
            (None, None) => Ok(None),
            (start, end) => {
                let (start, end) = both(start, end)?;
                DayRange::new(start, end).map(Some)
            }
        }
    }
}

/// `?start_date=&end_date=&exclude_id=` for the read-only overlap check.
#[derive(Debug, Default, Deserialize)]
pub struct ConflictParams {
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub exclude_id: Option<DbId>,
}

impl ConflictParams {
    pub fn window(&self) -> Result<StayWindow, CoreError> {
        let (start, end) = both(self.start_date, self.end_date)?;
        StayWindow::new(start, end)
    }
}

fn both(start: Option<Day>, end: Option<Day>) -> Result<(Day, Day), CoreError> {
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        (start, end) => {
            let mut errors = FieldErrors::new();
            if start.is_none() {
                errors.add("start_date", "start_date is required");
            }
            if end.is_none() {
                errors.add("end_date", "end_date is required");
            }
            Err(CoreError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    #[test]
    fn missing_dates_are_reported_per_field() {
        let err = DateRangeParams::default().require().unwrap_err();
        assert_matches!(err, CoreError::Validation(ref e)
            if e.get("start_date").is_some() && e.get("end_date").is_some());
    }

    #[test]
    fn optional_range_accepts_neither_but_not_one() {
        assert_eq!(DateRangeParams::default().optional().unwrap(), None);

        let half = DateRangeParams {
            start_date: Some(day("2025-01-01")),
            end_date: None,
        };
        assert_matches!(half.optional(), Err(CoreError::Validation(ref e)) if e.get("end_date").is_some());
    }

    #[test]
    fn conflict_params_build_a_stay_window() {
        let params = ConflictParams {
            start_date: Some(day("2025-01-05")),
            end_date: Some(day("2025-01-10")),
            exclude_id: Some(3),
        };
        assert_eq!(params.window().unwrap().nights(), 5);
    }
}
