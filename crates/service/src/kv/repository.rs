use async_trait::async_trait;

use crate::errors::ServiceError;

/// Row-level persistence for the key-value store.
///
/// Values cross this boundary as serialized JSON text and are not inspected.
/// Every method is a single statement against the backing table.
#[async_trait]
pub trait KvRepository: Send + Sync {
    /// Insert or replace the row for `key` in one atomic step. `created` is
    /// only written when the row is new.
    async fn upsert(&self, key: &str, value: String) -> Result<models::store::Model, ServiceError>;
    async fn find(&self, key: &str) -> Result<Option<models::store::Model>, ServiceError>;
    /// Returns the number of rows removed.
    async fn delete(&self, key: &str) -> Result<u64, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;

    use chrono::Utc;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MockKvRepository {
        rows: RwLock<HashMap<String, models::store::Model>>,
    }

    #[async_trait]
    impl KvRepository for MockKvRepository {
        async fn upsert(&self, key: &str, value: String) -> Result<models::store::Model, ServiceError> {
            models::store::validate_key(key)?;
            let now = Utc::now();
            let mut rows = self.rows.write().await;
            let row = rows
                .entry(key.to_string())
                .and_modify(|r| {
                    r.value = value.clone();
                    r.updated = now;
                })
                .or_insert_with(|| models::store::Model {
                    key: key.to_string(),
                    value: value.clone(),
                    created: now,
                    updated: now,
                });
            Ok(row.clone())
        }

        async fn find(&self, key: &str) -> Result<Option<models::store::Model>, ServiceError> {
            Ok(self.rows.read().await.get(key).cloned())
        }

        async fn delete(&self, key: &str) -> Result<u64, ServiceError> {
            Ok(self.rows.write().await.remove(key).map_or(0, |_| 1))
        }

        async fn ping(&self) -> Result<(), ServiceError> { Ok(()) }
    }
}
