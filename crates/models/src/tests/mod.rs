use std::path::PathBuf;

use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::connect_with_config;


/// Row-level upsert/find/delete tests for the `store` table
pub mod store_tests;

/// Throwaway SQLite file in the temp dir, migrated.
pub(crate) struct TestDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl TestDb {
    pub async fn new() -> anyhow::Result<Self> {
        let path = std::env::temp_dir().join(format!("models_store_{}.db", Uuid::new_v4()));
        let cfg = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 8,
            ..DatabaseConfig::default()
        };
        let db = connect_with_config(&cfg).await?;
        migration::Migrator::up(&db, None).await?;
        Ok(Self { db, path })
    }

    pub async fn cleanup(self) {
        let _ = self.db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = std::fs::remove_file(p);
        }
    }
}
