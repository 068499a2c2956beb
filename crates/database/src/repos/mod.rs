//! Repositories: one typed wrapper per aggregate over the shared storage client.
//!
//! Errors are returned exactly as the storage client reports them.

pub mod appointment_repository;
pub mod company_repository;
pub mod professional_repository;
pub mod service_repository;
pub mod session_repository;
pub mod user_repository;

pub use appointment_repository::{AppointmentRepository, AvailabilityRepository};
pub use company_repository::CompanyRepository;
pub use professional_repository::ProfessionalRepository;
pub use service_repository::ServiceRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

/// All repositories over one storage client.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub companies: CompanyRepository,
    pub professionals: ProfessionalRepository,
    pub services: ServiceRepository,
    pub availabilities: AvailabilityRepository,
    pub appointments: AppointmentRepository,
    pub sessions: SessionRepository,
}

impl Repositories {
    pub fn new(storage: crate::storage::SharedStorage) -> Self {
        Self {
            users: UserRepository::new(storage.clone()),
            companies: CompanyRepository::new(storage.clone()),
            professionals: ProfessionalRepository::new(storage.clone()),
            services: ServiceRepository::new(storage.clone()),
            availabilities: AvailabilityRepository::new(storage.clone()),
            appointments: AppointmentRepository::new(storage.clone()),
            sessions: SessionRepository::new(storage),
        }
    }
}
