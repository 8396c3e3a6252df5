//! Farm record and write input.
//!
//! # Invariants
//! - `state` is one of the 27 UF codes.
//! - `total > 0`, `arable >= 0`, `vegetation >= 0`, `arable + vegetation <= total`.
//! - A farm always belongs to exactly one farmer.

use super::farmer::{Farmer, FarmerId};
use super::field_errors::FieldErrors;
use super::state::StateCode;
use super::{required_text, EpochMillis, MAX_TEXT_CHARS};
use crate::validation::area::validate_farm_areas;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type FarmId = Uuid;

pub const FARMER_ID_FIELD: &str = "farmer_id";
pub const STATE_FIELD: &str = "state";
pub const INVALID_STATE_MESSAGE: &str =
    "Invalid value for the state. Please set a valid state, e.g.: SP";

/// Persisted farm, with its owning farmer embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Farm {
    pub id: FarmId,
    pub farmer: Farmer,
    pub name: String,
    pub city: String,
    pub state: StateCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_area_hectares: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub arable_area_hectares: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vegetation_area_hectares: Decimal,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

/// Create/update payload. Absent fields are `None`.
///
/// `state` stays a string here so unknown codes surface as a field error
/// instead of a body parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FarmInput {
    pub farmer_id: Option<FarmerId>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_area_hectares: Option<Decimal>,
    pub arable_area_hectares: Option<Decimal>,
    pub vegetation_area_hectares: Option<Decimal>,
}

impl FarmInput {
    /// Fills absent fields from `current`, for partial updates.
    ///
    /// The merged input is validated as a whole, so changing a single area
    /// still re-checks the sum against the stored values.
    pub fn merged_over(self, current: &Farm) -> Self {
        Self {
            farmer_id: self.farmer_id.or(Some(current.farmer.id)),
            name: self.name.or_else(|| Some(current.name.clone())),
            city: self.city.or_else(|| Some(current.city.clone())),
            state: self
                .state
                .or_else(|| Some(current.state.code().to_string())),
            total_area_hectares: self
                .total_area_hectares
                .or(Some(current.total_area_hectares)),
            arable_area_hectares: self
                .arable_area_hectares
                .or(Some(current.arable_area_hectares)),
            vegetation_area_hectares: self
                .vegetation_area_hectares
                .or(Some(current.vegetation_area_hectares)),
        }
    }
}

/// Validated farm fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmDraft {
    pub farmer_id: FarmerId,
    pub name: String,
    pub city: String,
    pub state: StateCode,
    pub total_area_hectares: Decimal,
    pub arable_area_hectares: Decimal,
    pub vegetation_area_hectares: Decimal,
}

impl FarmDraft {
    /// Validates every field of `input`, returning all failures together.
    ///
    /// Farmer existence is checked by the service, not here.
    pub fn validate(input: &FarmInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        if input.farmer_id.is_none() {
            errors.push(FARMER_ID_FIELD, super::field_errors::REQUIRED);
        }
        let name = required_text(&mut errors, "name", input.name.as_deref(), MAX_TEXT_CHARS);
        let city = required_text(&mut errors, "city", input.city.as_deref(), MAX_TEXT_CHARS);
        let state = match input.state.as_deref() {
            None => {
                errors.push(STATE_FIELD, super::field_errors::REQUIRED);
                None
            }
            Some(code) => {
                let parsed = StateCode::parse(code);
                if parsed.is_none() {
                    errors.push(STATE_FIELD, INVALID_STATE_MESSAGE);
                }
                parsed
            }
        };
        validate_farm_areas(
            &mut errors,
            input.total_area_hectares,
            input.arable_area_hectares,
            input.vegetation_area_hectares,
        );

        match (input.farmer_id, name, city, state) {
            (Some(farmer_id), Some(name), Some(city), Some(state)) if errors.is_empty() => {
                Ok(Self {
                    farmer_id,
                    name,
                    city,
                    state,
                    total_area_hectares: input.total_area_hectares.unwrap_or_default(),
                    arable_area_hectares: input.arable_area_hectares.unwrap_or_default(),
                    vegetation_area_hectares: input.vegetation_area_hectares.unwrap_or_default(),
                })
            }
            _ => Err(errors),
        }
    }
}
