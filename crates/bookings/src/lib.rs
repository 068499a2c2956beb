//! # YouMeet Bookings Crate
//!
//! Appointment booking and schedule listing.
//!
//! Booking does not consult availability windows and does not detect
//! overlapping appointments.

pub mod services;
pub mod types;

pub use services::BookingService;
pub use types::{BookAppointmentRequest, BookingError, BookingResult};
pub use youmeet_database::{Appointment, AppointmentStatus};
