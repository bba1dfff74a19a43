use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};

use storefront_backend::app;
use storefront_backend::config::AppConfig;
use storefront_backend::logging::init_logging;
use storefront_backend::media::CloudinaryUploader;
use storefront_backend::services::auth_service::AccessGate;
use storefront_backend::services::job_scheduler_service::JobSchedulerService;
use storefront_backend::services::session_store::SessionManager;
use storefront_backend::services::settings_service;
use storefront_backend::state::AppState;
use storefront_backend::store::{CatalogStore, MemoryCatalogStore, PgCatalogStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_logging(&config.logging)?;

    let store: Arc<dyn CatalogStore> = if config.uses_memory_store() {
        warn!("⚠️  Using in-memory store, all data is lost on restart");
        Arc::new(MemoryCatalogStore::new())
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("🗄️  Database migrations applied");
        Arc::new(PgCatalogStore::new(pool))
    };

    settings_service::ensure_settings_exists(store.as_ref()).await?;

    let sessions = SessionManager::new(
        &config.session.secret,
        Duration::hours(config.session.ttl_hours),
    );
    let state = AppState {
        store,
        media: Arc::new(CloudinaryUploader::new(&config.media)),
        gate: Arc::new(AccessGate::new(config.admin.clone(), sessions)),
        media_folder: config.media.folder.clone(),
        secure_cookie: config.session.secure_cookie,
        max_upload_bytes: config.max_upload_bytes,
    };
    let app = app::create_app(state);

    let mut scheduler = match config.keepalive.clone() {
        Some(keepalive) => {
            let mut scheduler = JobSchedulerService::new(keepalive).await?;
            scheduler.start().await?;
            Some(scheduler)
        }
        None => None,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Storefront running at http://{}/", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.stop().await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
