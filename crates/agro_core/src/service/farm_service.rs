//! Farm use-case service.
//!
//! # Invariants
//! - Every write is validated as a whole: a partial update is merged over the
//!   stored farm before the area rules run.
//! - The owning farmer must exist.

use crate::model::farm::{Farm, FarmDraft, FarmId, FarmInput, FARMER_ID_FIELD};
use crate::model::field_errors::FieldErrors;
use crate::repo::farm_repo::FarmRepository;
use crate::repo::farmer_repo::FarmerRepository;
use crate::repo::{Page, PageRequest};
use crate::service::{missing_reference_message, ServiceError, ServiceResult};
use log::info;

pub struct FarmService<F: FarmRepository, P: FarmerRepository> {
    farms: F,
    farmers: P,
}

impl<F: FarmRepository, P: FarmerRepository> FarmService<F, P> {
    pub fn new(farms: F, farmers: P) -> Self {
        Self { farms, farmers }
    }

    pub fn create_farm(&self, input: &FarmInput) -> ServiceResult<Farm> {
        let draft = self.validate(input)?;
        let farm = self.farms.create_farm(&draft)?;
        info!(
            "event=farm_create module=service status=ok farm_id={} state={}",
            farm.id,
            farm.state.code()
        );
        Ok(farm)
    }

    pub fn get_farm(&self, id: FarmId) -> ServiceResult<Farm> {
        self.farms
            .get_farm(id)?
            .ok_or_else(|| ServiceError::not_found("farm", id))
    }

    pub fn list_farms(&self, page: &PageRequest) -> ServiceResult<Page<Farm>> {
        Ok(self.farms.list_farms(page)?)
    }

    /// Replaces every field. Absent fields are validation errors.
    pub fn update_farm(&self, id: FarmId, input: &FarmInput) -> ServiceResult<Farm> {
        self.get_farm(id)?;
        self.save(id, input)
    }

    /// Updates only the fields present in `input`, re-checking the area sum
    /// against the stored values for the fields left out.
    pub fn patch_farm(&self, id: FarmId, input: FarmInput) -> ServiceResult<Farm> {
        let current = self.get_farm(id)?;
        self.save(id, &input.merged_over(&current))
    }

    /// Deletes the farm together with its crops.
    pub fn delete_farm(&self, id: FarmId) -> ServiceResult<()> {
        self.farms.delete_farm(id)?;
        info!("event=farm_delete module=service status=ok farm_id={id}");
        Ok(())
    }

    fn save(&self, id: FarmId, input: &FarmInput) -> ServiceResult<Farm> {
        let draft = self.validate(input)?;
        let farm = self.farms.update_farm(id, &draft)?;
        info!("event=farm_update module=service status=ok farm_id={id}");
        Ok(farm)
    }

    fn validate(&self, input: &FarmInput) -> ServiceResult<FarmDraft> {
        let draft = FarmDraft::validate(input);
        let missing_farmer = match input.farmer_id {
            Some(farmer_id) => self.farmers.get_farmer(farmer_id)?.is_none(),
            None => false,
        };

        match (draft, missing_farmer) {
            (Ok(draft), false) => Ok(draft),
            (draft, _) => {
                let mut errors = draft.err().unwrap_or_else(FieldErrors::new);
                if let (true, Some(farmer_id)) = (missing_farmer, input.farmer_id) {
                    errors.push(FARMER_ID_FIELD, missing_reference_message(farmer_id));
                }
                Err(ServiceError::Validation(errors))
            }
        }
    }
}
