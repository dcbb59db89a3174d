#![cfg(test)]
use std::path::PathBuf;

use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;

/// A migrated SQLite database in its own temp file.
pub struct TestDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

pub async fn get_db() -> Result<TestDb, anyhow::Error> {
    let path = std::env::temp_dir().join(format!("service_store_{}.db", uuid::Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 16,
        acquire_timeout_secs: 10,
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(TestDb { db, path })
}

impl TestDb {
    pub async fn cleanup(self) {
        let _ = self.db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = std::fs::remove_file(p);
        }
    }
}
