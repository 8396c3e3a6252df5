//! Crop planting record: one crop type registered on one farm.
//!
//! # Invariants
//! - The pair (farm, crop type) is unique.

use super::crop_type::{CropType, CropTypeId};
use super::farm::{Farm, FarmId};
use super::field_errors::{FieldErrors, REQUIRED};
use super::EpochMillis;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CropId = Uuid;

pub const FARM_ID_FIELD: &str = "farm_id";
pub const CROP_TYPE_ID_FIELD: &str = "crop_type_id";
pub const DUPLICATE_CROP_MESSAGE: &str =
    "A crop with this farm and type of crop already exists.";

/// Persisted crop with its farm and crop type embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crop {
    pub id: CropId,
    pub farm: Farm,
    pub crop_type: CropType,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

/// Crop types planted on one farm, as returned by the grouped crop listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmCrops {
    pub farm: Farm,
    pub crops: Vec<CropType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CropInput {
    pub farm_id: Option<FarmId>,
    pub crop_type_id: Option<CropTypeId>,
}

impl CropInput {
    pub fn merged_over(self, current: &Crop) -> Self {
        Self {
            farm_id: self.farm_id.or(Some(current.farm.id)),
            crop_type_id: self.crop_type_id.or(Some(current.crop_type.id)),
        }
    }
}

/// Validated crop references. Existence is checked by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropDraft {
    pub farm_id: FarmId,
    pub crop_type_id: CropTypeId,
}

impl CropDraft {
    pub fn validate(input: &CropInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        if input.farm_id.is_none() {
            errors.push(FARM_ID_FIELD, REQUIRED);
        }
        if input.crop_type_id.is_none() {
            errors.push(CROP_TYPE_ID_FIELD, REQUIRED);
        }
        match (input.farm_id, input.crop_type_id) {
            (Some(farm_id), Some(crop_type_id)) => Ok(Self {
                farm_id,
                crop_type_id,
            }),
            _ => Err(errors),
        }
    }
}
