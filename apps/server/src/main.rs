use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use youmeet_config::load as load_config;
use youmeet_gateway::create_router;
use youmeet_runtime::{telemetry, BackendServices};

#[derive(Parser)]
#[command(name = "youmeet-server")]
#[command(about = "YouMeet booking backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create the database schema and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Migrate => run_migrate().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting YouMeet backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let app = create_router(services.gateway_state());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(youmeet_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn run_migrate() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    info!(backend = config.database.backend.as_str(), "migrating database");

    youmeet_runtime::migrate(&config).await?;

    println!("Database schema is up to date");
    Ok(())
}
