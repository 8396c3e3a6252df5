//! Farm area rules.
//!
//! # Invariants
//! - `total > 0`, `arable >= 0`, `vegetation >= 0`.
//! - `arable + vegetation <= total`, equality allowed.
//! - Quantities keep at most two fractional digits and fit in ten digits.

use crate::model::field_errors::{FieldErrors, NON_FIELD_ERRORS};
use rust_decimal::Decimal;

const MAX_AREA_SCALE: u32 = 2;

pub const TOTAL_AREA_FIELD: &str = "total_area_hectares";
pub const ARABLE_AREA_FIELD: &str = "arable_area_hectares";
pub const VEGETATION_AREA_FIELD: &str = "vegetation_area_hectares";

pub const AREA_SUM_MESSAGE: &str =
    "The sum of the arable area and vegetation cannot exceed the total area of the farm.";

/// Returns true iff the allocated sub-areas fit within the total area.
///
/// A sum that overflows `Decimal` exceeds any total.
pub fn areas_within_total(arable: Decimal, vegetation: Decimal, total: Decimal) -> bool {
    arable
        .checked_add(vegetation)
        .is_some_and(|sum| sum <= total)
}

/// Evaluates every per-field rule, then the sum rule, collecting failures.
///
/// The sum rule is only checked when all three values passed their own rules.
pub fn validate_farm_areas(
    errors: &mut FieldErrors,
    total: Option<Decimal>,
    arable: Option<Decimal>,
    vegetation: Option<Decimal>,
) {
    let total = check_field(errors, TOTAL_AREA_FIELD, total, |value| {
        (value <= Decimal::ZERO).then_some("The total area cannot be negative or zero.")
    });
    let arable = check_field(errors, ARABLE_AREA_FIELD, arable, |value| {
        (value < Decimal::ZERO).then_some("The arable area cannot be negative.")
    });
    let vegetation = check_field(errors, VEGETATION_AREA_FIELD, vegetation, |value| {
        (value < Decimal::ZERO).then_some("The vegetation area cannot be negative.")
    });

    if let (Some(total), Some(arable), Some(vegetation)) = (total, arable, vegetation) {
        if !areas_within_total(arable, vegetation, total) {
            errors.push(NON_FIELD_ERRORS, AREA_SUM_MESSAGE);
        }
    }
}

fn check_field(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<Decimal>,
    range_rule: impl Fn(Decimal) -> Option<&'static str>,
) -> Option<Decimal> {
    let Some(value) = value else {
        errors.push(field, crate::model::field_errors::REQUIRED);
        return None;
    };
    if let Some(message) = range_rule(value) {
        errors.push(field, message);
        return None;
    }
    if value.normalize().scale() > MAX_AREA_SCALE {
        errors.push(
            field,
            "Ensure that there are no more than 2 decimal places.",
        );
        return None;
    }
    if value.abs() > max_area_hectares() {
        errors.push(
            field,
            "Ensure that there are no more than 10 digits in total.",
        );
        return None;
    }
    Some(value)
}

/// Largest area accepted in hectares: ten digits, two of them fractional.
pub fn max_area_hectares() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn equality_is_within_total() {
        assert!(areas_within_total(dec(100), dec(100), dec(200)));
    }

    #[test]
    fn overflowing_sum_is_not_within_total() {
        assert!(!areas_within_total(Decimal::MAX, Decimal::MAX, Decimal::MAX));
        assert!(areas_within_total(Decimal::MAX, Decimal::ZERO, Decimal::MAX));
    }

    #[test]
    fn exceeding_total_is_rejected() {
        assert!(!areas_within_total(dec(60), dec(50), dec(100)));
    }

    #[test]
    fn zero_total_and_negative_parts_are_reported_together() {
        let mut errors = FieldErrors::new();
        validate_farm_areas(&mut errors, Some(dec(0)), Some(dec(-1)), Some(dec(-2)));
        assert!(errors.contains(TOTAL_AREA_FIELD));
        assert!(errors.contains(ARABLE_AREA_FIELD));
        assert!(errors.contains(VEGETATION_AREA_FIELD));
        assert!(!errors.contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn sum_violation_is_a_non_field_error() {
        let mut errors = FieldErrors::new();
        validate_farm_areas(&mut errors, Some(dec(100)), Some(dec(60)), Some(dec(50)));
        assert_eq!(errors.messages(NON_FIELD_ERRORS), [AREA_SUM_MESSAGE]);
    }

    #[test]
    fn more_than_two_decimal_places_is_rejected() {
        let mut errors = FieldErrors::new();
        validate_farm_areas(
            &mut errors,
            Some(Decimal::new(100_125, 3)),
            Some(Decimal::new(1050, 2)),
            Some(Decimal::new(2000, 3)),
        );
        assert!(errors.contains(TOTAL_AREA_FIELD));
        assert!(!errors.contains(ARABLE_AREA_FIELD));
        assert!(!errors.contains(VEGETATION_AREA_FIELD));
    }

    #[test]
    fn area_above_ten_digits_is_rejected() {
        let mut errors = FieldErrors::new();
        validate_farm_areas(
            &mut errors,
            Some(dec(100_000_000)),
            Some(dec(0)),
            Some(dec(0)),
        );
        assert!(errors.contains(TOTAL_AREA_FIELD));
    }

    #[test]
    fn missing_values_are_required() {
        let mut errors = FieldErrors::new();
        validate_farm_areas(&mut errors, None, Some(dec(1)), None);
        assert_eq!(
            errors.messages(TOTAL_AREA_FIELD),
            [crate::model::field_errors::REQUIRED]
        );
        assert!(errors.contains(VEGETATION_AREA_FIELD));
    }
}
