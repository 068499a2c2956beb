//! Appointment and availability repositories.

use uuid::Uuid;

use crate::entities::{Appointment, Availability};
use crate::storage::{Conditions, SharedStorage, StorageExt};
use crate::types::StorageResult;

#[derive(Clone)]
pub struct AppointmentRepository {
    storage: SharedStorage,
}

impl AppointmentRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn create_appointment(&self, appointment: &Appointment) -> StorageResult<()> {
        self.storage.create(appointment).await
    }

    pub async fn get_appointment_by_id(&self, id: Uuid) -> StorageResult<Appointment> {
        self.storage.find_one(Conditions::new().eq("id", id)).await
    }

    /// Appointments booked by `client_id`, in storage order.
    pub async fn list_appointments(&self, client_id: Uuid) -> StorageResult<Vec<Appointment>> {
        self.storage
            .filtered(Conditions::new().eq("client_id", client_id))
            .find_all(Conditions::new())
            .await
    }

    pub async fn list_by_professional(
        &self,
        professional_id: Uuid,
    ) -> StorageResult<Vec<Appointment>> {
        self.storage
            .find_all(Conditions::new().eq("professional_id", professional_id))
            .await
    }
}

#[derive(Clone)]
pub struct AvailabilityRepository {
    storage: SharedStorage,
}

impl AvailabilityRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn create_availability(&self, availability: &Availability) -> StorageResult<()> {
        self.storage.create(availability).await
    }

    pub async fn get_by_professional(
        &self,
        professional_id: Uuid,
    ) -> StorageResult<Vec<Availability>> {
        self.storage
            .find_all(Conditions::new().eq("professional_id", professional_id))
            .await
    }
}
