//! Business logic layer.

pub mod auth_service;

pub use auth_service::AuthService;
