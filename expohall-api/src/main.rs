use std::net::SocketAddr;
use std::sync::Arc;

use expohall_api::{
    app,
    state::{AppState, AuthConfig},
};
use expohall_catalog::repository::ExpoRepository;
use expohall_core::feedback::FeedbackRepository;
use expohall_core::users::UserRepository;
use expohall_store::{DbClient, MemoryStore, PgExpoRepository, PgFeedbackRepository, PgUserRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "expohall_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = expohall_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Expo Hall API on port {}", config.server.port);

    let auth = AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        expiration: config.auth.jwt_expiration_seconds,
    };

    let (app_state, db) = if config.database.url.is_empty() {
        tracing::warn!("No database URL configured, state will not survive a restart");
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            expos: store.clone() as Arc<dyn ExpoRepository>,
            users: store.clone() as Arc<dyn UserRepository>,
            feedback: store as Arc<dyn FeedbackRepository>,
            auth,
        };
        (state, None)
    } else {
        let db = DbClient::new(&config.database.url)
            .await
            .expect("Failed to connect to Postgres");
        db.migrate().await.expect("Failed to run migrations");
        let state = AppState {
            expos: Arc::new(PgExpoRepository::new(db.pool.clone())),
            users: Arc::new(PgUserRepository::new(db.pool.clone())),
            feedback: Arc::new(PgFeedbackRepository::new(db.pool.clone())),
            auth,
        };
        (state, Some(db))
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    if let Some(db) = db {
        db.close().await;
    }
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutdown signal received");
}
