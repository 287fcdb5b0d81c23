//! Courant server binary.
//!
//! Bootstraps the real-time notification service: configuration,
//! tracing, the PostgreSQL pool, the connection registry and heartbeat
//! monitor, and the axum server with the WebSocket endpoint.
//!
//! On shutdown the heartbeat monitor stops first, then every open
//! connection is closed, so no pings are sent into a draining registry.

use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Json, Router};
use http::{HeaderValue, StatusCode};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use courant::adapters::websocket::websocket_router;
use courant::adapters::{
    ConnectionRegistry, HeartbeatMonitor, PostgresNotificationStore, SnapshotSender,
    WebSocketState,
};
use courant::config::{AppConfig, ServerConfig};
use courant::ports::NotificationStore;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("courant failed to start: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let registry = Arc::new(ConnectionRegistry::new());
    let store: Arc<dyn NotificationStore> = Arc::new(PostgresNotificationStore::new(pool));
    let snapshot = Arc::new(SnapshotSender::new(
        registry.clone(),
        store.clone(),
        config.websocket.snapshot_limit,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let heartbeat = HeartbeatMonitor::spawn(
        registry.clone(),
        config.websocket.heartbeat_interval(),
        shutdown_rx,
    );

    let ws_state = WebSocketState::new(registry.clone(), store, snapshot);
    let app = Router::new()
        .route("/health", get(health))
        .merge(websocket_router().with_state(ws_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.server)),
        );

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "courant listening");

    let graceful = async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        // Heartbeat first, then the connections.
        let _ = shutdown_tx.send(true);
        let closed = registry.close_all().await;
        tracing::info!(closed, "Closed WebSocket connections");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful)
        .await?;

    let _ = heartbeat.await;
    tracing::info!("courant stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({"status": "ok", "service": "courant"})),
    )
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
