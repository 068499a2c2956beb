//! Appointment booking REST endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use youmeet_bookings::{Appointment, BookAppointmentRequest};

use crate::error::{ErrorResponse, GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookAppointmentBody {
    pub service_id: Uuid,
    pub client_id: Uuid,
    /// RFC 3339 timestamp, e.g. `2030-05-17T10:00:00Z`.
    pub start_time: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            client_id: appointment.client_id,
            professional_id: appointment.professional_id,
            service_id: appointment.service_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status.to_string(),
            created_at: appointment.created_at,
        }
    }
}

pub fn create_appointment_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/appointments", post(book_appointment))
        .route("/appointments/:client_id", get(list_client_appointments))
        .route(
            "/professionals/:professional_id/appointments",
            get(list_professional_appointments),
        )
}

fn parse_id(raw: &str, what: &str) -> GatewayResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| GatewayError::InvalidRequest(format!("invalid {what} ID")))
}

#[utoipa::path(
    post,
    path = "/appointments",
    tag = "Appointments",
    request_body = BookAppointmentBody,
    responses(
        (status = 200, description = "Appointment scheduled", body = AppointmentResponse),
        (status = 400, description = "Bad input, unknown service or client", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn book_appointment(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<BookAppointmentBody>, JsonRejection>,
) -> GatewayResult<Json<AppointmentResponse>> {
    let Json(body) = payload?;
    let appointment = state
        .booking_service()
        .book_appointment(BookAppointmentRequest {
            service_id: body.service_id,
            client_id: body.client_id,
            start_time: body.start_time,
        })
        .await?;

    Ok(Json(appointment.into()))
}

#[utoipa::path(
    get,
    path = "/appointments/{client_id}",
    tag = "Appointments",
    params(("client_id" = String, Path, description = "Client account id")),
    responses(
        (status = 200, description = "Appointments booked by the client", body = [AppointmentResponse]),
        (status = 400, description = "Malformed client id", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_client_appointments(
    State(state): State<Arc<GatewayState>>,
    Path(client_id): Path<String>,
) -> GatewayResult<Json<Vec<AppointmentResponse>>> {
    let client_id = parse_id(&client_id, "client")?;
    let appointments = state.booking_service().get_appointments(client_id).await?;
    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/professionals/{professional_id}/appointments",
    tag = "Appointments",
    params(("professional_id" = String, Path, description = "Professional id")),
    responses(
        (status = 200, description = "Appointments assigned to the professional", body = [AppointmentResponse]),
        (status = 400, description = "Malformed professional id", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_professional_appointments(
    State(state): State<Arc<GatewayState>>,
    Path(professional_id): Path<String>,
) -> GatewayResult<Json<Vec<AppointmentResponse>>> {
    let professional_id = parse_id(&professional_id, "professional")?;
    let appointments = state
        .booking_service()
        .get_appointments_by_professional(professional_id)
        .await?;
    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}
