use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playscore_api::config::ServerConfig;
use playscore_api::notifications::NotificationDispatcher;
use playscore_api::router::build_app_router;
use playscore_api::state::AppState;
use playscore_catalog::{CatalogService, RawgClient, RawgConfig};
use playscore_events::{EmailConfig, EmailDelivery, EventBus};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playscore_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = playscore_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    playscore_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    playscore_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // --- Email channel (optional; absent SMTP config disables it) ---
    let email = EmailConfig::from_env().map(EmailDelivery::new);
    if email.is_some() {
        tracing::info!("Email delivery enabled");
    } else {
        tracing::info!("SMTP_HOST not set; email delivery disabled");
    }

    // Spawn the notification dispatcher (persists events, fans out
    // notification rows and emails).
    let dispatcher = NotificationDispatcher::new(pool.clone(), email);
    let _dispatcher_handle = tokio::spawn(dispatcher.run(event_bus.subscribe()));
    tracing::info!("Notification dispatcher started");

    // --- RAWG catalog proxy ---
    let catalog = Arc::new(CatalogService::new(RawgClient::new(RawgConfig::from_env())));
    tracing::info!("Catalog service created");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        catalog,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Resolve on SIGINT (Ctrl+C) or SIGTERM so the server can drain in-flight
/// requests before exiting.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
