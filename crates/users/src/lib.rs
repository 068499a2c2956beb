//! # YouMeet Users Crate
//!
//! Account registration, credential login and token validation on top of the
//! storage-agnostic repositories from `youmeet-database`.
//!
//! ## Architecture
//!
//! - **Services**: [`AuthService`]
//! - **Types**: requests, responses and the [`AuthError`] taxonomy
//! - **Utils**: argon2 password hashing and input validation
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use youmeet_config::AuthConfig;
//! use youmeet_database::{all_schemas, MemoryStorage, SharedStorage, StorageExt};
//! use youmeet_users::{AuthService, RegisterRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let storage: SharedStorage = Arc::new(MemoryStorage::new());
//! storage.ensure_schema(&all_schemas()).await?;
//!
//! let auth = AuthService::new(storage, &AuthConfig::default())?;
//! let user = auth
//!     .register(RegisterRequest {
//!         name: "Ada".into(),
//!         email: "ada@example.com".into(),
//!         password: "analytical".into(),
//!         role: "client".into(),
//!     })
//!     .await?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

pub mod services;
pub mod types;
pub mod utils;

pub use services::AuthService;
pub use types::{AuthError, AuthResponse, AuthResult, LoginRequest, RegisterRequest};
pub use youmeet_database::{Role, User};
