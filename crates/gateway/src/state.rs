//! Shared application state for the gateway

use std::sync::Arc;

use youmeet_bookings::BookingService;
use youmeet_config::AuthConfig;
use youmeet_database::SharedStorage;
use youmeet_users::AuthService;

use crate::error::{GatewayError, GatewayResult};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct GatewayState {
    pub auth: Arc<AuthService>,
    pub bookings: Arc<BookingService>,
}

impl GatewayState {
    pub fn new(auth: AuthService, bookings: BookingService) -> Self {
        Self {
            auth: Arc::new(auth),
            bookings: Arc::new(bookings),
        }
    }

    /// Build both services over one storage client.
    pub fn from_storage(storage: SharedStorage, auth: &AuthConfig) -> GatewayResult<Self> {
        let auth_service = AuthService::new(storage.clone(), auth)
            .map_err(|err| GatewayError::InternalError(format!("auth service: {err}")))?;
        Ok(Self::new(auth_service, BookingService::new(storage)))
    }

    pub fn auth_service(&self) -> &AuthService {
        &self.auth
    }

    pub fn booking_service(&self) -> &BookingService {
        &self.bookings
    }
}
