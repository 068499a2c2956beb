//! Domain entities and their table schemas

use chrono::{DateTime, SubsecRound, Utc};

use crate::storage::TableSchema;

pub mod appointment;
pub mod availability;
pub mod company;
pub mod professional;
pub mod service;
pub mod session;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus, APPOINTMENTS};
pub use availability::{Availability, AVAILABILITIES};
pub use company::{Company, COMPANIES};
pub use professional::{Professional, PROFESSIONALS};
pub use service::{Service, SERVICES};
pub use session::{Session, SESSIONS};
pub use user::{Role, UnknownRole, User, USERS};

/// Every table the application needs, in creation order.
pub fn all_schemas() -> [&'static TableSchema; 7] {
    [
        &USERS,
        &COMPANIES,
        &PROFESSIONALS,
        &SERVICES,
        &AVAILABILITIES,
        &APPOINTMENTS,
        &SESSIONS,
    ]
}

/// Current time at microsecond precision, the finest both SQL backends keep.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
