use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use youmeet_bookings::BookingService;
use youmeet_config::AppConfig;
use youmeet_database::{initialize_storage, SharedStorage};
use youmeet_gateway::GatewayState;
use youmeet_users::AuthService;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. `RUST_LOG` overrides the `info` default.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Storage plus the services built on top of it.
#[derive(Clone)]
pub struct BackendServices {
    pub storage: SharedStorage,
    pub auth: Arc<AuthService>,
    pub bookings: Arc<BookingService>,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let storage = initialize_storage(&config.database)
            .await
            .context("failed to initialise storage")?;

        let auth = AuthService::new(storage.clone(), &config.auth)
            .context("failed to build auth service")?;
        let bookings = BookingService::new(storage.clone());

        info!(backend = storage.backend_name(), "backend services ready");

        Ok(Self {
            storage,
            auth: Arc::new(auth),
            bookings: Arc::new(bookings),
        })
    }

    pub fn gateway_state(&self) -> GatewayState {
        GatewayState {
            auth: Arc::clone(&self.auth),
            bookings: Arc::clone(&self.bookings),
        }
    }
}

/// Create every table the services need, then drop the connection.
pub async fn migrate(config: &AppConfig) -> Result<()> {
    let storage = initialize_storage(&config.database)
        .await
        .context("failed to migrate storage")?;
    info!(backend = storage.backend_name(), "schema is up to date");
    Ok(())
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
