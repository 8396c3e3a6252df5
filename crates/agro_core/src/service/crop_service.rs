//! Crop use-case service.
//!
//! # Invariants
//! - A farm registers a crop type at most once. The pre-check covers the
//!   common case and the `UNIQUE (farm_id, crop_type_id)` constraint covers
//!   concurrent writers; both report the same conflict message.

use crate::model::crop::{
    Crop, CropDraft, CropId, CropInput, FarmCrops, CROP_TYPE_ID_FIELD, DUPLICATE_CROP_MESSAGE,
    FARM_ID_FIELD,
};
use crate::model::field_errors::FieldErrors;
use crate::repo::crop_repo::CropRepository;
use crate::repo::crop_type_repo::CropTypeRepository;
use crate::repo::farm_repo::FarmRepository;
use crate::service::{missing_reference_message, ServiceError, ServiceResult};
use log::info;

pub struct CropService<C: CropRepository, F: FarmRepository, T: CropTypeRepository> {
    crops: C,
    farms: F,
    crop_types: T,
}

impl<C: CropRepository, F: FarmRepository, T: CropTypeRepository> CropService<C, F, T> {
    pub fn new(crops: C, farms: F, crop_types: T) -> Self {
        Self {
            crops,
            farms,
            crop_types,
        }
    }

    pub fn create_crop(&self, input: &CropInput) -> ServiceResult<Crop> {
        let draft = self.validate(input)?;
        self.ensure_pair_free(&draft, None)?;
        let crop = self.crops.create_crop(&draft)?;
        info!(
            "event=crop_create module=service status=ok crop_id={} farm_id={} crop_type_id={}",
            crop.id, draft.farm_id, draft.crop_type_id
        );
        Ok(crop)
    }

    pub fn get_crop(&self, id: CropId) -> ServiceResult<Crop> {
        self.crops
            .get_crop(id)?
            .ok_or_else(|| ServiceError::not_found("crop", id))
    }

    /// Lists every crop grouped by the farm it is planted on.
    pub fn list_crops_by_farm(&self) -> ServiceResult<Vec<FarmCrops>> {
        Ok(self.crops.list_crops_by_farm()?)
    }

    pub fn update_crop(&self, id: CropId, input: &CropInput) -> ServiceResult<Crop> {
        self.get_crop(id)?;
        self.save(id, input)
    }

    pub fn patch_crop(&self, id: CropId, input: CropInput) -> ServiceResult<Crop> {
        let current = self.get_crop(id)?;
        self.save(id, &input.merged_over(&current))
    }

    pub fn delete_crop(&self, id: CropId) -> ServiceResult<()> {
        self.crops.delete_crop(id)?;
        info!("event=crop_delete module=service status=ok crop_id={id}");
        Ok(())
    }

    fn save(&self, id: CropId, input: &CropInput) -> ServiceResult<Crop> {
        let draft = self.validate(input)?;
        self.ensure_pair_free(&draft, Some(id))?;
        Ok(self.crops.update_crop(id, &draft)?)
    }

    fn validate(&self, input: &CropInput) -> ServiceResult<CropDraft> {
        let mut errors = FieldErrors::new();
        if let Some(farm_id) = input.farm_id {
            if self.farms.get_farm(farm_id)?.is_none() {
                errors.push(FARM_ID_FIELD, missing_reference_message(farm_id));
            }
        }
        if let Some(crop_type_id) = input.crop_type_id {
            if self.crop_types.get_crop_type(crop_type_id)?.is_none() {
                errors.push(CROP_TYPE_ID_FIELD, missing_reference_message(crop_type_id));
            }
        }

        match CropDraft::validate(input) {
            Ok(draft) if errors.is_empty() => Ok(draft),
            Ok(_) => Err(ServiceError::Validation(errors)),
            Err(draft_errors) => {
                for field in [FARM_ID_FIELD, CROP_TYPE_ID_FIELD] {
                    for message in draft_errors.messages(field) {
                        errors.push(field, message.clone());
                    }
                }
                Err(ServiceError::Validation(errors))
            }
        }
    }

    fn ensure_pair_free(&self, draft: &CropDraft, owner: Option<CropId>) -> ServiceResult<()> {
        match self.crops.find_by_pair(draft.farm_id, draft.crop_type_id)? {
            Some(existing) if Some(existing.id) != owner => {
                Err(ServiceError::Conflict(DUPLICATE_CROP_MESSAGE.to_string()))
            }
            _ => Ok(()),
        }
    }
}
