//! CPF/CNPJ taxpayer document validation.
//!
//! # Responsibility
//! - Normalize free-form document input to digits only.
//! - Verify both modulo-11 check digits for CPF (11 digits) and CNPJ (14 digits).
//!
//! # Invariants
//! - Any digit count other than 11 or 14 is invalid.
//! - Missing or empty input is invalid.
//! - Repeated-digit documents are rejected only when the policy says so.

use serde::{Deserialize, Serialize};

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

const CPF_FIRST_WEIGHTS: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_SECOND_WEIGHTS: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Which taxpayer scheme a document was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Individual taxpayer number (11 digits).
    Cpf,
    /// Entity taxpayer number (14 digits).
    Cnpj,
}

/// Policy knobs for document validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPolicy {
    /// Reject documents whose digits are all identical, such as
    /// `000.000.000-00`, even when the check digits happen to match.
    pub reject_repeated_digits: bool,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            reject_repeated_digits: true,
        }
    }
}

/// Outcome of a document check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCheck {
    /// Digits left after stripping punctuation.
    pub normalized: String,
    /// Scheme matched by digit count, `None` for unsupported lengths.
    pub kind: Option<DocumentKind>,
    pub valid: bool,
}

impl DocumentCheck {
    /// Returns the normalized digits when the document is valid.
    pub fn into_valid(self) -> Option<(DocumentKind, String)> {
        match (self.valid, self.kind) {
            (true, Some(kind)) => Some((kind, self.normalized)),
            _ => None,
        }
    }
}

/// Strips every non-digit character from `raw`.
pub fn normalize_document(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validates a raw CPF/CNPJ string under `policy`.
pub fn validate_document(raw: Option<&str>, policy: DocumentPolicy) -> DocumentCheck {
    let normalized = raw.map(normalize_document).unwrap_or_default();
    let digits: Vec<u32> = normalized.chars().filter_map(|c| c.to_digit(10)).collect();

    let kind = match digits.len() {
        CPF_LEN => Some(DocumentKind::Cpf),
        CNPJ_LEN => Some(DocumentKind::Cnpj),
        _ => None,
    };

    let valid = match kind {
        None => false,
        Some(_) if policy.reject_repeated_digits && all_same(&digits) => false,
        Some(DocumentKind::Cpf) => {
            check_digits_match(&digits, &CPF_FIRST_WEIGHTS, &CPF_SECOND_WEIGHTS)
        }
        Some(DocumentKind::Cnpj) => {
            check_digits_match(&digits, &CNPJ_FIRST_WEIGHTS, &CNPJ_SECOND_WEIGHTS)
        }
    };

    DocumentCheck {
        normalized,
        kind,
        valid,
    }
}

/// Convenience wrapper using [`DocumentPolicy::default`].
pub fn is_valid_document(raw: &str) -> bool {
    validate_document(Some(raw), DocumentPolicy::default()).valid
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn check_digits_match(digits: &[u32], first_weights: &[u32], second_weights: &[u32]) -> bool {
    let body_len = first_weights.len();
    let first = check_digit(&digits[..body_len], first_weights);
    let second = check_digit(&digits[..body_len + 1], second_weights);
    digits[body_len] == first && digits[body_len + 1] == second
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(digit, weight)| digit * weight)
        .sum();
    match sum % 11 {
        remainder if remainder < 2 => 0,
        remainder => 11 - remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::{check_digit, normalize_document, CPF_FIRST_WEIGHTS, CPF_SECOND_WEIGHTS};

    #[test]
    fn normalize_strips_punctuation_and_letters() {
        assert_eq!(normalize_document("951.810.400-04"), "95181040004");
        assert_eq!(normalize_document("77.759.188/0001-80"), "77759188000180");
        assert_eq!(normalize_document("abc"), "");
    }

    #[test]
    fn remainder_below_two_maps_to_zero() {
        // 9*10 + 5*9 + 1*8 + 8*7 + 1*6 + 0*5 + 4*4 + 0*3 + 0*2 = 221, 221 % 11 = 1
        assert_eq!(check_digit(&[9, 5, 1, 8, 1, 0, 4, 0, 0], &CPF_FIRST_WEIGHTS), 0);
        assert_eq!(
            check_digit(&[9, 5, 1, 8, 1, 0, 4, 0, 0, 0], &CPF_SECOND_WEIGHTS),
            4
        );
        assert_eq!(check_digit(&[0; 9], &CPF_FIRST_WEIGHTS), 0);
    }
}
