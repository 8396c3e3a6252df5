//! Domain records for farmers, farms, crop types and crop plantings.
//!
//! # Responsibility
//! - Define the plain records returned by repositories and services.
//! - Define typed write inputs and the validated drafts built from them.
//!
//! # Invariants
//! - A draft only exists when every field rule passed.
//! - Area quantities carry at most two fractional digits.

pub mod crop;
pub mod crop_type;
pub mod farm;
pub mod farmer;
pub mod field_errors;
pub mod state;

/// Unix epoch milliseconds, as stored in `created_at`/`updated_at` columns.
pub type EpochMillis = i64;

const MAX_TEXT_CHARS: usize = 255;

/// Trims a required text field and records a field error when it is missing,
/// blank, or longer than `max_chars`.
pub(crate) fn required_text(
    errors: &mut field_errors::FieldErrors,
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Option<String> {
    let Some(value) = value else {
        errors.push(field, field_errors::REQUIRED);
        return None;
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "This field may not be blank.");
        return None;
    }
    if trimmed.chars().count() > max_chars {
        errors.push(
            field,
            format!("Ensure this field has no more than {max_chars} characters."),
        );
        return None;
    }
    Some(trimmed.to_string())
}
