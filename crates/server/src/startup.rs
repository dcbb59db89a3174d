use std::{future::Future, net::SocketAddr};

use axum::Router;
use common::env::{ensure_data_dir, ensure_sqlite_parent};
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use service::kv::{repo::seaorm::SeaOrmKvRepository, repository::KvRepository, KeyValueStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Connect, migrate, and build the router. Returns the pool so the caller can
/// close it after the server stops.
pub async fn build_app(cfg: &AppConfig) -> Result<(Router, DatabaseConnection), StartupError> {
    ensure_data_dir(&cfg.store.data_dir).await?;
    ensure_sqlite_parent(&cfg.database.url).await?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Migration(e.to_string()))?;

    let repo: Arc<dyn KvRepository> = Arc::new(SeaOrmKvRepository::new(db.clone()));
    let state = ServerState {
        store: KeyValueStore::new(repo),
        require_namespaced_keys: cfg.store.require_namespaced_keys,
    };
    Ok((routes::build_router(state, build_cors()), db))
}

/// Public entry: build the app and run the HTTP server until Ctrl+C/SIGTERM.
pub async fn run() -> anyhow::Result<()> {
    run_until(shutdown_signal()).await
}

/// Run the HTTP server until `shutdown` resolves, then drain in-flight
/// requests and close the pool.
pub async fn run_until<F>(shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let (app, db) = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, db_url = %redact(&cfg.database.url), "starting server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    db.close().await?;
    info!("database pool closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

/// Hide the password part of a database URL for logging.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let creds = &url[scheme_end + 3..at];
            match creds.find(':') {
                Some(colon) => format!("{}{}:***{}", &url[..scheme_end + 3], &creds[..colon], &url[at..]),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}
