use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skylark_api::{app, state::{AppState, AuthConfig}};
use skylark_core::booking::BookingService;
use skylark_core::flight::FlightCatalog;
use skylark_store::{
    DbClient, PostgresBookingRepository, PostgresFlightRepository, PostgresUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skylark_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = skylark_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Skylark API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;

    let flight_repo = Arc::new(PostgresFlightRepository::new(db.pool.clone()));
    let booking_repo = Arc::new(PostgresBookingRepository::new(db.pool.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(db.pool.clone()));

    let state = AppState {
        catalog: Arc::new(FlightCatalog::new(flight_repo.clone())),
        bookings: Arc::new(BookingService::new(flight_repo, booking_repo)),
        users: user_repo,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            access_ttl: config.auth.access_ttl_seconds,
            refresh_ttl: config.auth.refresh_ttl_seconds,
        },
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
