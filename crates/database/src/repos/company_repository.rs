//! Company repository.

use uuid::Uuid;

use crate::entities::Company;
use crate::storage::{Conditions, SharedStorage, StorageExt};
use crate::types::StorageResult;

#[derive(Clone)]
pub struct CompanyRepository {
    storage: SharedStorage,
}

impl CompanyRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn create_company(&self, company: &Company) -> StorageResult<()> {
        self.storage.create(company).await
    }

    pub async fn get_company_by_id(&self, id: Uuid) -> StorageResult<Company> {
        self.storage.find_one(Conditions::new().eq("id", id)).await
    }

    pub async fn get_company_by_user_id(&self, user_id: Uuid) -> StorageResult<Company> {
        self.storage
            .find_one(Conditions::new().eq("user_id", user_id))
            .await
    }
}
