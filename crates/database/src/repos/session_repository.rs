//! Login session repository.

use crate::entities::Session;
use crate::storage::{Conditions, SharedStorage, StorageExt};
use crate::types::StorageResult;

#[derive(Clone)]
pub struct SessionRepository {
    storage: SharedStorage,
}

impl SessionRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn create_session(&self, session: &Session) -> StorageResult<()> {
        self.storage.create(session).await
    }

    pub async fn get_by_token(&self, token: &str) -> StorageResult<Session> {
        self.storage.find_one(Conditions::new().eq("token", token)).await
    }
}
