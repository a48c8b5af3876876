//! Rallypoint server entrypoint.
//!
//! Wires the PostgreSQL adapters, the in-process event bus, the realtime
//! hub, and the HTTP surface together, and runs the periodic completion
//! sweep alongside the server.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rallypoint::adapters::http::{api_router, RequestApi, SessionApi, SubscribeState};
use rallypoint::adapters::{
    InMemoryEventBus, PostgresMatchRequestRepository, PostgresSessionBrowser,
    PostgresSessionRepository, SessionChangeBridge, SessionChangeHub,
};
use rallypoint::application::handlers::match_request::{
    DecideRequestHandler, SubmitRequestHandler, WithdrawRequestHandler,
};
use rallypoint::application::handlers::session::{
    BrowseSessionsHandler, CancelSessionHandler, CompleteElapsedHandler, CompleteSessionHandler,
    CreateSessionHandler,
};
use rallypoint::config::AppConfig;
use rallypoint::domain::foundation::Timestamp;
use rallypoint::ports::{EventPublisher, MatchRequestRepository, SessionRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting rallypoint"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Storage adapters
    let sessions: Arc<dyn SessionRepository> =
        Arc::new(PostgresSessionRepository::new(pool.clone()));
    let requests: Arc<dyn MatchRequestRepository> =
        Arc::new(PostgresMatchRequestRepository::new(pool.clone()));
    let browser = Arc::new(PostgresSessionBrowser::new(pool.clone()));

    // Event bus and realtime fan-out
    let bus = Arc::new(InMemoryEventBus::new());
    let hub = Arc::new(SessionChangeHub::with_default_capacity());
    let bridge = SessionChangeBridge::new_shared(hub.clone());
    bridge.register(bus.as_ref());

    let publisher: Arc<dyn EventPublisher> = bus;

    // Application handlers
    let session_api = SessionApi::new(
        Arc::new(CreateSessionHandler::new(sessions.clone(), publisher.clone())),
        Arc::new(BrowseSessionsHandler::new(browser)),
        Arc::new(CancelSessionHandler::new(sessions.clone(), publisher.clone())),
        Arc::new(CompleteSessionHandler::new(
            sessions.clone(),
            publisher.clone(),
        )),
        sessions.clone(),
        requests.clone(),
    );
    let request_api = RequestApi::new(
        Arc::new(SubmitRequestHandler::new(
            sessions.clone(),
            requests.clone(),
            publisher.clone(),
        )),
        Arc::new(DecideRequestHandler::new(
            sessions.clone(),
            requests.clone(),
            publisher.clone(),
        )),
        Arc::new(WithdrawRequestHandler::new(
            requests.clone(),
            publisher.clone(),
        )),
    );

    spawn_completion_sweep(
        Arc::new(CompleteElapsedHandler::new(sessions, publisher)),
        config.sweeper.interval(),
    );

    let app = api_router(session_api, request_api, SubscribeState::new(hub))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let listener = tokio::net::TcpListener::bind(config.server.socket_addr()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

/// Periodically persist completion for sessions whose scheduled end has
/// passed. Readers already see them as completed; the sweep makes it
/// durable and publishes the completion events.
fn spawn_completion_sweep(handler: Arc<CompleteElapsedHandler>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match handler.handle(Timestamp::now()).await {
                Ok(completed) if !completed.is_empty() => {
                    tracing::info!(count = completed.len(), "Completion sweep finished");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Completion sweep failed: {}", e);
                }
            }
        }
    });
}
