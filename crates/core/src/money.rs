//! Money amounts as stored in `NUMERIC(12,2)` columns.

use rust_decimal::Decimal;

use crate::error::FieldErrors;

/// Digits allowed after the decimal point.
pub const MONEY_SCALE: u32 = 2;

/// Digits allowed before the decimal point (`NUMERIC(12,2)` leaves ten).
pub const MONEY_INTEGER_DIGITS: u32 = 10;

/// Check that `amount` is non-negative and fits the money column exactly,
/// adding a message under `field` for each rule it breaks.
///
/// Trailing zeros do not count towards the scale: `12.500` is accepted.
pub fn check_amount(field: &str, amount: Decimal, errors: &mut FieldErrors) {
    if amount.is_sign_negative() && !amount.is_zero() {
        errors.add(field, format!("{field} must not be negative"));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        errors.add(
            field,
            format!("{field} must have at most {MONEY_SCALE} decimal places"),
        );
    }
    if amount.trunc().abs() >= Decimal::from(10_i64.pow(MONEY_INTEGER_DIGITS)) {
        errors.add(
            field,
            format!("{field} must have at most {MONEY_INTEGER_DIGITS} digits before the decimal point"),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn errors_for(amount: &str) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_amount("total", Decimal::from_str(amount).unwrap(), &mut errors);
        errors
    }

    #[test]
    fn column_sized_amounts_pass() {
        for amount in ["0", "0.00", "19.99", "12.500", "9999999999.99"] {
            assert!(errors_for(amount).is_empty(), "{amount} should be accepted");
        }
    }

    #[test]
    fn more_than_two_decimal_places_is_rejected() {
        let errors = errors_for("10.005");
        assert_eq!(
            errors.get("total"),
            Some(&["total must have at most 2 decimal places".to_string()][..])
        );
    }

    #[test]
    fn amounts_beyond_ten_integer_digits_are_rejected() {
        assert!(errors_for("10000000000").get("total").is_some());
        assert!(errors_for("99999999999999999999").get("total").is_some());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let errors = errors_for("-0.01");
        assert_eq!(
            errors.get("total"),
            Some(&["total must not be negative".to_string()][..])
        );
    }
}
