//! Professional repository.

use uuid::Uuid;

use crate::entities::Professional;
use crate::storage::{Conditions, SharedStorage, StorageExt};
use crate::types::StorageResult;

#[derive(Clone)]
pub struct ProfessionalRepository {
    storage: SharedStorage,
}

impl ProfessionalRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn create_professional(&self, professional: &Professional) -> StorageResult<()> {
        self.storage.create(professional).await
    }

    pub async fn get_professional_by_id(&self, id: Uuid) -> StorageResult<Professional> {
        self.storage.find_one(Conditions::new().eq("id", id)).await
    }

    pub async fn get_professional_by_user_id(&self, user_id: Uuid) -> StorageResult<Professional> {
        self.storage
            .find_one(Conditions::new().eq("user_id", user_id))
            .await
    }

    /// Professionals employed by `company_id`. Independent ones never match.
    pub async fn list_by_company_id(&self, company_id: Uuid) -> StorageResult<Vec<Professional>> {
        self.storage
            .find_all(Conditions::new().eq("company_id", company_id))
            .await
    }
}
