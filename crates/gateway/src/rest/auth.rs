//! Authentication REST endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use youmeet_database::User;
use youmeet_users::{LoginRequest, RegisterRequest};

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    /// One of `client`, `company`, `professional`.
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Public authentication routes. `/auth/me` is mounted separately behind the
/// auth middleware.
pub fn create_auth_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input, duplicate email or unknown role", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> GatewayResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(body) = payload?;
    let user = state
        .auth_service()
        .register(RegisterRequest {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<LoginBody>, JsonRejection>,
) -> GatewayResult<Json<LoginResponse>> {
    let Json(body) = payload?;
    let session = state
        .auth_service()
        .login(LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        user: session.user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Account behind the bearer token", body = UserResponse),
        (status = 401, description = "Missing or unknown token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}
