//! Shared types of the auth service.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{AuthError, AuthResult};
pub use requests::{LoginRequest, RegisterRequest};
pub use responses::AuthResponse;
