//! User repository.

use uuid::Uuid;

use crate::entities::User;
use crate::storage::{Conditions, SharedStorage, StorageExt};
use crate::types::StorageResult;

#[derive(Clone)]
pub struct UserRepository {
    storage: SharedStorage,
}

impl UserRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn create(&self, user: &User) -> StorageResult<()> {
        self.storage.create(user).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> StorageResult<User> {
        self.storage.find_one(Conditions::new().eq("id", id)).await
    }

    pub async fn get_by_email(&self, email: &str) -> StorageResult<User> {
        self.storage.find_one(Conditions::new().eq("email", email)).await
    }

    pub async fn delete(&self, id: Uuid) -> StorageResult<u64> {
        self.storage.delete::<User>(Conditions::new().eq("id", id)).await
    }
}
