//! Service catalogue repository.

use uuid::Uuid;

use crate::entities::Service;
use crate::storage::{Conditions, SharedStorage, StorageExt};
use crate::types::StorageResult;

#[derive(Clone)]
pub struct ServiceRepository {
    storage: SharedStorage,
}

impl ServiceRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn create_service(&self, service: &Service) -> StorageResult<()> {
        self.storage.create(service).await
    }

    pub async fn get_service_by_id(&self, id: Uuid) -> StorageResult<Service> {
        self.storage.find_one(Conditions::new().eq("id", id)).await
    }

    pub async fn list_services(&self) -> StorageResult<Vec<Service>> {
        self.storage.find_all(Conditions::new()).await
    }
}
