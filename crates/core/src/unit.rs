//! Validation for rental units.

use rust_decimal::Decimal;

use crate::booking::is_currency_code;
use crate::error::FieldErrors;
use crate::money::check_amount;

pub const MAX_UNIT_NAME_LEN: usize = 255;

/// Check the fields supplied when creating a unit.
pub fn check_unit(name: &str, nightly_price: Decimal, currency: &str, max_guests: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let name_len = name.trim().chars().count();
    if name_len == 0 || name_len > MAX_UNIT_NAME_LEN {
        errors.add(
            "name",
            format!("name must be between 1 and {MAX_UNIT_NAME_LEN} characters"),
        );
    }
    check_amount("nightly_price", nightly_price, &mut errors);
    if !is_currency_code(currency) {
        errors.add("currency", "currency must be a 3-letter ISO 4217 code");
    }
    if max_guests < 1 {
        errors.add("max_guests", "max_guests must be at least 1");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_unit_passes() {
        assert!(check_unit("Sea View Loft", Decimal::new(9900, 2), "USD", 4).is_empty());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let errors = check_unit("   ", Decimal::new(-1, 0), "usd", 0);
        for field in ["name", "nightly_price", "currency", "max_guests"] {
            assert!(errors.get(field).is_some(), "{field} should be reported");
        }
    }

    #[test]
    fn nightly_price_must_fit_the_money_column() {
        let errors = check_unit("Loft", Decimal::new(12_345, 3), "USD", 2);
        assert!(errors.get("nightly_price").is_some());
        let errors = check_unit("Loft", Decimal::new(10_000_000_000, 0), "USD", 2);
        assert!(errors.get("nightly_price").is_some());
    }
}
