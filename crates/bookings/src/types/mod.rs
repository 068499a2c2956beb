pub mod errors;
pub mod requests;

pub use errors::{BookingError, BookingResult};
pub use requests::BookAppointmentRequest;
