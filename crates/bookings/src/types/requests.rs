//! Inputs accepted by the booking service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `start_time` is kept as text and parsed as RFC 3339 by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: String,
}
