//! # YouMeet Gateway Crate
//!
//! HTTP boundary over the auth and booking services. Handlers only bind
//! requests and map domain errors to status codes; all decisions live in
//! `youmeet-users` and `youmeet-bookings`.
//!
//! ## Routes
//!
//! - `GET /health`
//! - `POST /auth/register`, `POST /auth/login`, `GET /auth/me` (bearer token)
//! - `POST /appointments`, `GET /appointments/:client_id`
//! - `GET /professionals/:professional_id/appointments`
//! - `GET /api-docs/openapi.json`
//!
//! ## Usage
//!
//! ```no_run
//! use youmeet_config::AuthConfig;
//! use youmeet_database::MemoryStorage;
//! use youmeet_gateway::{create_router, GatewayState};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let state = GatewayState::from_storage(std::sync::Arc::new(MemoryStorage::new()), &AuthConfig::default())?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, create_router(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use state::GatewayState;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Json, Router};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::health::health_check,
        rest::auth::register,
        rest::auth::login,
        rest::auth::me,
        rest::appointments::book_appointment,
        rest::appointments::list_client_appointments,
        rest::appointments::list_professional_appointments
    ),
    components(
        schemas(
            error::ErrorResponse,
            rest::health::HealthResponse,
            rest::auth::RegisterBody,
            rest::auth::LoginBody,
            rest::auth::UserResponse,
            rest::auth::RegisterResponse,
            rest::auth::LoginResponse,
            rest::appointments::BookAppointmentBody,
            rest::appointments::AppointmentResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration, login and token resolution"),
        (name = "Appointments", description = "Booking and schedule listing")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let state = Arc::new(state);

    let protected = Router::new()
        .route("/auth/me", get(rest::auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(rest::create_rest_routes())
        .merge(protected)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(middleware::create_cors_middleware())
        .layer(middleware::create_trace_middleware())
}
