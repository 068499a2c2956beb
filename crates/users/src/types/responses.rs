//! Results returned by the auth service.

use serde::{Deserialize, Serialize};
use youmeet_database::User;

/// Successful login: the opaque session token and the account it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
