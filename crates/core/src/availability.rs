//! Per-day availability overrides.
//!
//! Overrides are sparse: a day without a row is available at the unit's
//! default price. This module only validates what a write would store.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::booking::MAX_NOTES_LEN;
use crate::error::FieldErrors;
use crate::money::check_amount;
use crate::types::Day;

/// What a point or bulk write stores for each day it covers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DaySetting {
    pub is_available: bool,
    pub custom_price: Option<Decimal>,
    pub notes: Option<String>,
}

impl DaySetting {
    pub fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(price) = self.custom_price {
            check_amount("custom_price", price, &mut errors);
        }
        if self
            .notes
            .as_deref()
            .is_some_and(|n| n.chars().count() > MAX_NOTES_LEN)
        {
            errors.add(
                "notes",
                format!("notes must be at most {MAX_NOTES_LEN} characters"),
            );
        }
        errors
    }
}

/// Body of a single-day write.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDayRequest {
    pub date: Day,
    #[serde(flatten)]
    pub setting: DaySetting,
}

/// Body of a bulk range write. Both ends are inclusive.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRangeRequest {
    pub start_date: Day,
    pub end_date: Day,
    #[serde(flatten)]
    pub setting: DaySetting,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(price: Option<Decimal>, notes: Option<String>) -> DaySetting {
        DaySetting {
            is_available: true,
            custom_price: price,
            notes,
        }
    }

    #[test]
    fn plain_setting_is_valid() {
        assert!(setting(None, None).check().is_empty());
        assert!(setting(Some(Decimal::ZERO), None).check().is_empty());
    }

    #[test]
    fn negative_price_is_rejected() {
        let errors = setting(Some(Decimal::new(-1, 0)), None).check();
        assert!(errors.get("custom_price").is_some());
    }

    #[test]
    fn price_must_fit_the_money_column() {
        let errors = setting(Some(Decimal::new(1_999, 3)), None).check();
        assert!(errors.get("custom_price").is_some());
        let errors = setting(Some(Decimal::new(100_000_000_000, 0)), None).check();
        assert!(errors.get("custom_price").is_some());
    }

    #[test]
    fn overlong_notes_are_rejected() {
        let errors = setting(None, Some("n".repeat(MAX_NOTES_LEN + 1))).check();
        assert!(errors.get("notes").is_some());
    }

    #[test]
    fn bulk_body_deserializes_flat() {
        let req: SetRangeRequest = serde_json::from_value(serde_json::json!({
            "start_date": "2025-02-01",
            "end_date": "2025-02-05",
            "is_available": false,
            "notes": "owner stay"
        }))
        .unwrap();
        assert!(!req.setting.is_available);
        assert_eq!(req.setting.custom_price, None);
        assert_eq!(req.setting.notes.as_deref(), Some("owner stay"));
    }
}
