//! Farmer use-case service.
//!
//! # Invariants
//! - Documents are validated and stored digits-only.
//! - A document belongs to at most one farmer; duplicates are reported as
//!   `ServiceError::Conflict` whether caught here or by the unique constraint.

use crate::model::farmer::{Farmer, FarmerDraft, FarmerId, FarmerInput};
use crate::repo::farmer_repo::{FarmerRepository, DUPLICATE_DOCUMENT_MESSAGE};
use crate::repo::{Page, PageRequest};
use crate::service::{ServiceError, ServiceResult};
use crate::validation::document::DocumentPolicy;
use log::info;

pub struct FarmerService<R: FarmerRepository> {
    repo: R,
    policy: DocumentPolicy,
}

impl<R: FarmerRepository> FarmerService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, DocumentPolicy::default())
    }

    pub fn with_policy(repo: R, policy: DocumentPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn create_farmer(&self, input: &FarmerInput) -> ServiceResult<Farmer> {
        let draft = FarmerDraft::validate(input, self.policy)?;
        self.ensure_document_free(&draft.document, None)?;
        let farmer = self.repo.create_farmer(&draft)?;
        info!("event=farmer_create module=service status=ok farmer_id={}", farmer.id);
        Ok(farmer)
    }

    pub fn get_farmer(&self, id: FarmerId) -> ServiceResult<Farmer> {
        self.repo
            .get_farmer(id)?
            .ok_or_else(|| ServiceError::not_found("farmer", id))
    }

    pub fn list_farmers(&self, page: &PageRequest) -> ServiceResult<Page<Farmer>> {
        Ok(self.repo.list_farmers(page)?)
    }

    /// Replaces every field. Absent fields are validation errors.
    pub fn update_farmer(&self, id: FarmerId, input: &FarmerInput) -> ServiceResult<Farmer> {
        self.get_farmer(id)?;
        self.save(id, input)
    }

    /// Updates only the fields present in `input`.
    pub fn patch_farmer(&self, id: FarmerId, input: FarmerInput) -> ServiceResult<Farmer> {
        let current = self.get_farmer(id)?;
        self.save(id, &input.merged_over(&current))
    }

    /// Deletes the farmer together with its farms and their crops.
    pub fn delete_farmer(&self, id: FarmerId) -> ServiceResult<()> {
        self.repo.delete_farmer(id)?;
        info!("event=farmer_delete module=service status=ok farmer_id={id}");
        Ok(())
    }

    fn save(&self, id: FarmerId, input: &FarmerInput) -> ServiceResult<Farmer> {
        let draft = FarmerDraft::validate(input, self.policy)?;
        self.ensure_document_free(&draft.document, Some(id))?;
        let farmer = self.repo.update_farmer(id, &draft)?;
        info!("event=farmer_update module=service status=ok farmer_id={id}");
        Ok(farmer)
    }

    fn ensure_document_free(&self, document: &str, owner: Option<FarmerId>) -> ServiceResult<()> {
        match self.repo.find_by_document(document)? {
            Some(existing) if Some(existing.id) != owner => Err(ServiceError::Conflict(
                DUPLICATE_DOCUMENT_MESSAGE.to_string(),
            )),
            _ => Ok(()),
        }
    }
}
