//! Crop type use-case service.

use crate::model::crop_type::{CropType, CropTypeDraft, CropTypeId, CropTypeInput};
use crate::repo::crop_type_repo::{CropTypeRepository, DUPLICATE_CROP_TYPE_MESSAGE};
use crate::service::{ServiceError, ServiceResult};
use log::info;

pub struct CropTypeService<R: CropTypeRepository> {
    repo: R,
}

impl<R: CropTypeRepository> CropTypeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_crop_type(&self, input: &CropTypeInput) -> ServiceResult<CropType> {
        let draft = CropTypeDraft::validate(input)?;
        self.ensure_name_free(&draft.name, None)?;
        let crop_type = self.repo.create_crop_type(&draft)?;
        info!(
            "event=crop_type_create module=service status=ok crop_type_id={}",
            crop_type.id
        );
        Ok(crop_type)
    }

    pub fn get_crop_type(&self, id: CropTypeId) -> ServiceResult<CropType> {
        self.repo
            .get_crop_type(id)?
            .ok_or_else(|| ServiceError::not_found("crop type", id))
    }

    pub fn list_crop_types(&self) -> ServiceResult<Vec<CropType>> {
        Ok(self.repo.list_crop_types()?)
    }

    pub fn update_crop_type(
        &self,
        id: CropTypeId,
        input: &CropTypeInput,
    ) -> ServiceResult<CropType> {
        self.get_crop_type(id)?;
        self.save(id, input)
    }

    pub fn patch_crop_type(&self, id: CropTypeId, input: CropTypeInput) -> ServiceResult<CropType> {
        let current = self.get_crop_type(id)?;
        self.save(id, &input.merged_over(&current))
    }

    /// Deletes the crop type and every crop planted with it.
    pub fn delete_crop_type(&self, id: CropTypeId) -> ServiceResult<()> {
        self.repo.delete_crop_type(id)?;
        info!("event=crop_type_delete module=service status=ok crop_type_id={id}");
        Ok(())
    }

    fn save(&self, id: CropTypeId, input: &CropTypeInput) -> ServiceResult<CropType> {
        let draft = CropTypeDraft::validate(input)?;
        self.ensure_name_free(&draft.name, Some(id))?;
        Ok(self.repo.update_crop_type(id, &draft)?)
    }

    fn ensure_name_free(&self, name: &str, owner: Option<CropTypeId>) -> ServiceResult<()> {
        match self.repo.find_by_name(name)? {
            Some(existing) if Some(existing.id) != owner => Err(ServiceError::Conflict(
                DUPLICATE_CROP_TYPE_MESSAGE.to_string(),
            )),
            _ => Ok(()),
        }
    }
}
