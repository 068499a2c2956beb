//! YouMeet Database Crate
//!
//! Backend-agnostic persistence for the booking domain: the [`StorageClient`]
//! abstraction with SQLite, PostgreSQL and in-memory backends, the entity
//! definitions and one repository per aggregate.

pub mod connection;
pub mod entities;
pub mod repos;
pub mod storage;
pub mod types;

pub use connection::{connect, initialize_storage};

pub use entities::{
    all_schemas, Appointment, AppointmentStatus, Availability, Company, Professional, Role,
    Service, Session, UnknownRole, User,
};

pub use repos::{
    AppointmentRepository, AvailabilityRepository, CompanyRepository, ProfessionalRepository,
    Repositories, ServiceRepository, SessionRepository, UserRepository,
};

pub use storage::{
    Conditions, MemoryStorage, PostgresStorage, Record, SharedStorage, SqliteStorage,
    StorageClient, StorageExt,
};

pub use types::{StorageError, StorageResult};
