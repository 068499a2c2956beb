//! Repository behaviour against the in-memory and SQLite backends.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use youmeet_config::DatabaseConfig;
use youmeet_database::{
    all_schemas, initialize_storage, Appointment, AppointmentStatus, Availability, Company,
    MemoryStorage, Professional, Repositories, Role, Service, Session, SharedStorage, StorageExt,
    User,
};

async fn memory() -> SharedStorage {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    storage.ensure_schema(&all_schemas()).await.unwrap();
    storage
}

async fn sqlite(dir: &TempDir) -> SharedStorage {
    let path = dir.path().join("repos.db");
    initialize_storage(&DatabaseConfig::sqlite(path.display().to_string()))
        .await
        .unwrap()
}

/// Unique address so runs against a shared database never collide.
fn email(local: &str) -> String {
    format!("{local}+{}@example.com", Uuid::new_v4().simple())
}

fn user(email: &str, role: Role) -> User {
    User::new(
        "Test User".to_string(),
        email.to_string(),
        "hash".to_string(),
        role,
    )
}

async fn exercise_users(repos: &Repositories) {
    let address = email("alice");
    let alice = user(&address, Role::Client);
    repos.users.create(&alice).await.unwrap();

    assert_eq!(repos.users.get_by_id(alice.id).await.unwrap(), alice);
    assert_eq!(repos.users.get_by_email(&address).await.unwrap().id, alice.id);

    let err = repos
        .users
        .create(&user(&address, Role::Company))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());

    assert!(repos
        .users
        .get_by_email(&email("nobody"))
        .await
        .unwrap_err()
        .is_not_found());

    assert_eq!(repos.users.delete(alice.id).await.unwrap(), 1);
    assert_eq!(repos.users.delete(alice.id).await.unwrap(), 0);
    assert!(repos.users.get_by_id(alice.id).await.unwrap_err().is_not_found());
}

async fn exercise_profiles(repos: &Repositories) {
    let owner = user(&email("owner"), Role::Company);
    repos.users.create(&owner).await.unwrap();
    let company = Company::new(owner.id, owner.name.clone());
    repos.companies.create_company(&company).await.unwrap();

    assert_eq!(
        repos.companies.get_company_by_user_id(owner.id).await.unwrap(),
        company
    );
    assert_eq!(
        repos.companies.get_company_by_id(company.id).await.unwrap().user_id,
        owner.id
    );

    let solo = Professional::independent(Uuid::new_v4(), "Solo".to_string());
    let staff = Professional::independent(Uuid::new_v4(), "Staff".to_string())
        .with_company(company.id);
    repos.professionals.create_professional(&solo).await.unwrap();
    repos.professionals.create_professional(&staff).await.unwrap();

    let fetched = repos
        .professionals
        .get_professional_by_user_id(solo.user_id)
        .await
        .unwrap();
    assert!(fetched.is_independent());
    assert_eq!(
        repos
            .professionals
            .get_professional_by_id(staff.id)
            .await
            .unwrap()
            .company_id,
        Some(company.id)
    );

    let employed = repos
        .professionals
        .list_by_company_id(company.id)
        .await
        .unwrap();
    assert_eq!(employed, vec![staff]);
}

async fn exercise_catalogue(repos: &Repositories) {
    let professional = Uuid::new_v4();
    let service = Service::new(
        "Haircut".to_string(),
        "Wash and cut".to_string(),
        45,
        30.5,
        vec![professional],
    );
    repos.services.create_service(&service).await.unwrap();
    assert_eq!(
        repos.services.get_service_by_id(service.id).await.unwrap(),
        service
    );
    assert!(repos
        .services
        .list_services()
        .await
        .unwrap()
        .contains(&service));

    let window = Availability::new(
        professional,
        "monday".to_string(),
        "09:00".to_string(),
        "17:00".to_string(),
    );
    repos.availabilities.create_availability(&window).await.unwrap();
    assert_eq!(
        repos
            .availabilities
            .get_by_professional(professional)
            .await
            .unwrap(),
        vec![window]
    );
    assert!(repos
        .availabilities
        .get_by_professional(Uuid::new_v4())
        .await
        .unwrap()
        .is_empty());
}

async fn exercise_appointments(repos: &Repositories) {
    let client = Uuid::new_v4();
    let professional = Uuid::new_v4();
    let start = Utc.with_ymd_and_hms(2030, 5, 17, 10, 0, 0).unwrap();

    let first = Appointment::scheduled(
        client,
        Some(professional),
        Uuid::new_v4(),
        start,
        start + Duration::minutes(30),
    );
    let second = Appointment::scheduled(client, None, Uuid::new_v4(), start, start);
    repos.appointments.create_appointment(&first).await.unwrap();
    repos.appointments.create_appointment(&second).await.unwrap();

    let mut booked = repos.appointments.list_appointments(client).await.unwrap();
    booked.sort_by_key(|a| a.id);
    let mut expected = vec![first.clone(), second.clone()];
    expected.sort_by_key(|a| a.id);
    assert_eq!(booked, expected);

    assert_eq!(
        repos
            .appointments
            .list_by_professional(professional)
            .await
            .unwrap(),
        vec![first.clone()]
    );
    assert!(repos
        .appointments
        .list_appointments(Uuid::new_v4())
        .await
        .unwrap()
        .is_empty());

    let fetched = repos
        .appointments
        .get_appointment_by_id(second.id)
        .await
        .unwrap();
    assert_eq!(fetched.status, AppointmentStatus::Scheduled);
    assert_eq!(fetched.professional_id, None);
}

async fn exercise_sessions(repos: &Repositories) {
    let session = Session::issue(Uuid::new_v4());
    repos.sessions.create_session(&session).await.unwrap();

    assert_eq!(
        repos.sessions.get_by_token(&session.token).await.unwrap(),
        session
    );
    assert!(repos
        .sessions
        .get_by_token("missing")
        .await
        .unwrap_err()
        .is_not_found());
}

async fn exercise_all(storage: SharedStorage) {
    let repos = Repositories::new(storage);
    exercise_users(&repos).await;
    exercise_profiles(&repos).await;
    exercise_catalogue(&repos).await;
    exercise_appointments(&repos).await;
    exercise_sessions(&repos).await;
}

#[tokio::test]
async fn repositories_on_memory_backend() {
    exercise_all(memory().await).await;
}

#[tokio::test]
async fn repositories_on_sqlite_backend() {
    let dir = TempDir::new().unwrap();
    exercise_all(sqlite(&dir).await).await;
}

#[tokio::test]
async fn repositories_on_postgres_backend() {
    let Ok(url) = std::env::var("YOUMEET_TEST_POSTGRES_URL") else {
        return;
    };
    let config = youmeet_config::DatabaseConfig {
        backend: youmeet_config::DatabaseBackend::Postgres,
        url,
        max_connections: 2,
    };
    let storage = initialize_storage(&config).await.unwrap();
    exercise_all(storage).await;
}

#[tokio::test]
async fn sqlite_data_survives_reconnect() {
    let dir = TempDir::new().unwrap();
    let address = email("persist");
    let account = user(&address, Role::Professional);
    {
        let repos = Repositories::new(sqlite(&dir).await);
        repos.users.create(&account).await.unwrap();
    }

    let repos = Repositories::new(sqlite(&dir).await);
    assert_eq!(
        repos.users.get_by_email(&address).await.unwrap(),
        account
    );
}
