use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::kv::repository::KvRepository;

/// SeaORM-backed repository over the `store` table.
///
/// Holds the pool, not a connection: each call checks one out for a single
/// statement and hands it back when the statement finishes or fails.
#[derive(Clone)]
pub struct SeaOrmKvRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmKvRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl KvRepository for SeaOrmKvRepository {
    async fn upsert(&self, key: &str, value: String) -> Result<models::store::Model, ServiceError> {
        Ok(models::store::upsert(&self.db, key, value).await?)
    }

    async fn find(&self, key: &str) -> Result<Option<models::store::Model>, ServiceError> {
        Ok(models::store::find(&self.db, key).await?)
    }

    async fn delete(&self, key: &str) -> Result<u64, ServiceError> {
        Ok(models::store::delete(&self.db, key).await?)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        models::db::test_connection(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}
