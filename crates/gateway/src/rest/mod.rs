//! REST API endpoints for the gateway

pub mod appointments;
pub mod auth;
pub mod health;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::state::GatewayState;

/// Routes that need no bearer token.
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::create_auth_routes())
        .merge(appointments::create_appointment_routes())
}
