//! Internal utilities.

pub mod password;
pub mod validation;

pub use password::PasswordHasherConfig;
