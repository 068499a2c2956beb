//! Booking service for creating and listing appointments.

use chrono::{DateTime, Datelike, SubsecRound, TimeDelta, Utc};
use tracing::info;
use uuid::Uuid;
use youmeet_database::{
    Appointment, AppointmentRepository, Role, ServiceRepository, SharedStorage, StorageError,
    UserRepository,
};

use crate::types::{BookAppointmentRequest, BookingError, BookingResult};

/// Parse a strict RFC 3339 timestamp, e.g. `2030-05-17T10:00:00Z`.
pub fn parse_start_time(raw: &str) -> BookingResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc).trunc_subsecs(6))
        .map_err(|_| BookingError::InvalidTimeFormat(raw.to_string()))
}

/// Stored timestamps are four-digit-year RFC 3339 text; anything outside
/// that range could not be read back.
fn ensure_storable(at: DateTime<Utc>, field: &str) -> BookingResult<()> {
    if (0..=9999).contains(&at.year()) {
        Ok(())
    } else {
        Err(BookingError::Validation(format!(
            "{field} {at} is outside the supported range"
        )))
    }
}

/// `start_time` plus `duration` minutes, or a validation error on overflow.
fn end_time_for(start_time: DateTime<Utc>, duration: i64) -> BookingResult<DateTime<Utc>> {
    if duration < 0 {
        return Err(BookingError::Validation(format!(
            "service duration {duration} is negative"
        )));
    }
    TimeDelta::try_minutes(duration)
        .and_then(|length| start_time.checked_add_signed(length))
        .ok_or_else(|| {
            BookingError::Validation(format!("service duration {duration} is out of range"))
        })
}

#[derive(Clone)]
pub struct BookingService {
    appointments: AppointmentRepository,
    services: ServiceRepository,
    users: UserRepository,
}

impl BookingService {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            appointments: AppointmentRepository::new(storage.clone()),
            services: ServiceRepository::new(storage.clone()),
            users: UserRepository::new(storage),
        }
    }

    /// Book `service_id` for `client_id` starting at `start_time`.
    ///
    /// The appointment is assigned to the first professional offering the
    /// service (none if the service lists nobody) and lasts the service's
    /// duration.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> BookingResult<Appointment> {
        let start_time = parse_start_time(&request.start_time)?;
        ensure_storable(start_time, "start time")?;

        let service = match self.services.get_service_by_id(request.service_id).await {
            Ok(service) => service,
            Err(StorageError::NotFound(_)) => {
                return Err(BookingError::NotFound("service".to_string()))
            }
            Err(err) => return Err(err.into()),
        };

        match self.users.get_by_id(request.client_id).await {
            Ok(client) if client.role == Role::Client => {}
            Ok(_) | Err(StorageError::NotFound(_)) => return Err(BookingError::InvalidClient),
            Err(err) => return Err(err.into()),
        }

        let end_time = end_time_for(start_time, service.duration)?;
        ensure_storable(end_time, "end time")?;

        let appointment = Appointment::scheduled(
            request.client_id,
            service.professional_ids.first().copied(),
            service.id,
            start_time,
            end_time,
        );
        self.appointments
            .create_appointment(&appointment)
            .await
            .map_err(|err| BookingError::Persistence(err.to_string()))?;

        info!(
            appointment_id = %appointment.id,
            client_id = %appointment.client_id,
            service_id = %appointment.service_id,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// All appointments of a client; empty when there are none.
    pub async fn get_appointments(&self, client_id: Uuid) -> BookingResult<Vec<Appointment>> {
        Ok(self.appointments.list_appointments(client_id).await?)
    }

    pub async fn get_appointments_by_professional(
        &self,
        professional_id: Uuid,
    ) -> BookingResult<Vec<Appointment>> {
        Ok(self.appointments.list_by_professional(professional_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use youmeet_database::{
        all_schemas, AppointmentStatus, MemoryStorage, Service, StorageExt, User,
    };

    use super::*;

    struct Fixture {
        bookings: BookingService,
        storage: SharedStorage,
        client: User,
        professional: Uuid,
        service: Service,
    }

    async fn fixture() -> Fixture {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        storage.ensure_schema(&all_schemas()).await.unwrap();

        let client = User::new(
            "Client".to_string(),
            "client@example.com".to_string(),
            "hash".to_string(),
            Role::Client,
        );
        UserRepository::new(storage.clone())
            .create(&client)
            .await
            .unwrap();

        let professional = Uuid::new_v4();
        let service = Service::new(
            "Massage".to_string(),
            "Deep tissue".to_string(),
            60,
            80.0,
            vec![professional, Uuid::new_v4()],
        );
        ServiceRepository::new(storage.clone())
            .create_service(&service)
            .await
            .unwrap();

        Fixture {
            bookings: BookingService::new(storage.clone()),
            storage,
            client,
            professional,
            service,
        }
    }

    fn request(fixture: &Fixture, start_time: &str) -> BookAppointmentRequest {
        BookAppointmentRequest {
            service_id: fixture.service.id,
            client_id: fixture.client.id,
            start_time: start_time.to_string(),
        }
    }

    #[tokio::test]
    async fn malformed_start_time_persists_nothing() {
        let fixture = fixture().await;

        let err = fixture
            .bookings
            .book_appointment(request(&fixture, "not-a-date"))
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::InvalidTimeFormat("not-a-date".to_string()));

        let stored: Vec<Appointment> = fixture.storage.find_all(Default::default()).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn booking_schedules_with_derived_fields() {
        let fixture = fixture().await;

        let appointment = fixture
            .bookings
            .book_appointment(request(&fixture, "2030-05-17T10:00:00+02:00"))
            .await
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.professional_id, Some(fixture.professional));
        assert_eq!(appointment.service_id, fixture.service.id);
        assert_eq!(
            appointment.start_time,
            parse_start_time("2030-05-17T08:00:00Z").unwrap()
        );
        assert_eq!(
            appointment.end_time - appointment.start_time,
            TimeDelta::minutes(60)
        );
    }

    #[tokio::test]
    async fn each_booking_gets_a_fresh_id() {
        let fixture = fixture().await;
        let first = fixture
            .bookings
            .book_appointment(request(&fixture, "2030-05-17T10:00:00Z"))
            .await
            .unwrap();
        let second = fixture
            .bookings
            .book_appointment(request(&fixture, "2030-05-17T10:00:00Z"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn listing_returns_exactly_the_booked_appointments() {
        let fixture = fixture().await;
        let mut booked = Vec::new();
        for hour in 9..12 {
            let appointment = fixture
                .bookings
                .book_appointment(request(&fixture, &format!("2030-05-17T{hour:02}:00:00Z")))
                .await
                .unwrap();
            booked.push(appointment);
        }

        let mut listed = fixture
            .bookings
            .get_appointments(fixture.client.id)
            .await
            .unwrap();
        listed.sort_by_key(|a| a.start_time);
        assert_eq!(listed, booked);

        let by_professional = fixture
            .bookings
            .get_appointments_by_professional(fixture.professional)
            .await
            .unwrap();
        assert_eq!(by_professional.len(), 3);

        assert!(fixture
            .bookings
            .get_appointments(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let fixture = fixture().await;
        let mut req = request(&fixture, "2030-05-17T10:00:00Z");
        req.service_id = Uuid::new_v4();

        let err = fixture.bookings.book_appointment(req).await.unwrap_err();
        assert_eq!(err, BookingError::NotFound("service".to_string()));
    }

    #[tokio::test]
    async fn only_client_accounts_can_book() {
        let fixture = fixture().await;

        let mut unknown = request(&fixture, "2030-05-17T10:00:00Z");
        unknown.client_id = Uuid::new_v4();
        assert_eq!(
            fixture.bookings.book_appointment(unknown).await.unwrap_err(),
            BookingError::InvalidClient
        );

        let company = User::new(
            "Acme".to_string(),
            "acme@example.com".to_string(),
            "hash".to_string(),
            Role::Company,
        );
        UserRepository::new(fixture.storage.clone())
            .create(&company)
            .await
            .unwrap();
        let mut wrong_role = request(&fixture, "2030-05-17T10:00:00Z");
        wrong_role.client_id = company.id;
        assert_eq!(
            fixture.bookings.book_appointment(wrong_role).await.unwrap_err(),
            BookingError::InvalidClient
        );
    }

    #[tokio::test]
    async fn service_without_professionals_leaves_assignment_empty() {
        let fixture = fixture().await;
        let solo = Service::new("Consult".to_string(), String::new(), 15, 0.0, Vec::new());
        ServiceRepository::new(fixture.storage.clone())
            .create_service(&solo)
            .await
            .unwrap();

        let mut req = request(&fixture, "2030-05-17T10:00:00Z");
        req.service_id = solo.id;
        let appointment = fixture.bookings.book_appointment(req).await.unwrap();
        assert_eq!(appointment.professional_id, None);
    }

    #[tokio::test]
    async fn oversized_duration_is_rejected_without_booking() {
        let fixture = fixture().await;
        let endless = Service::new(
            "Endless".to_string(),
            String::new(),
            i64::MAX / 2,
            0.0,
            vec![fixture.professional],
        );
        ServiceRepository::new(fixture.storage.clone())
            .create_service(&endless)
            .await
            .unwrap();

        let mut req = request(&fixture, "2030-05-17T10:00:00Z");
        req.service_id = endless.id;
        let err = fixture.bookings.book_appointment(req).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let stored: Vec<Appointment> = fixture.storage.find_all(Default::default()).await.unwrap();
        assert!(stored.is_empty());
    }

    #[test]
    fn end_time_stays_within_the_storable_range() {
        let start = parse_start_time("9999-12-31T22:00:00Z").unwrap();
        let end = end_time_for(start, 60).unwrap();
        assert!(ensure_storable(end, "end time").is_ok());

        let late = parse_start_time("9999-12-31T23:30:00Z").unwrap();
        let end = end_time_for(late, 60).unwrap();
        assert!(matches!(
            ensure_storable(end, "end time"),
            Err(BookingError::Validation(_))
        ));

        assert!(matches!(end_time_for(start, -5), Err(BookingError::Validation(_))));
        assert!(matches!(
            end_time_for(start, i64::MAX),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn offsets_cannot_push_the_start_before_year_zero() {
        let start = parse_start_time("0000-01-01T00:30:00+01:00").unwrap();
        assert!(ensure_storable(start, "start time").is_err());
    }

    #[test]
    fn start_time_parsing_is_strict() {
        assert!(parse_start_time("2030-05-17T10:00:00Z").is_ok());
        assert!(parse_start_time("2030-05-17T10:00:00.123456+05:30").is_ok());
        assert!(parse_start_time("2030-05-17 10:00").is_err());
        assert!(parse_start_time("2030-05-17").is_err());
        assert!(parse_start_time("").is_err());
    }
}
