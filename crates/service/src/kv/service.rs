use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::domain::{DeleteOutcome, Record};
use super::repository::KvRepository;
use crate::errors::{ErrorKind, ServiceError};

/// Key-addressed storage of opaque JSON documents, independent of web framework.
///
/// `put` is an upsert: the first write for a key creates the record, later
/// writes replace its value wholesale and bump `updated_at`.
pub struct KeyValueStore<R: KvRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: KvRepository + ?Sized> Clone for KeyValueStore<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: KvRepository + ?Sized> KeyValueStore<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Examples
    /// ```
    /// use service::kv::{KeyValueStore, repository::mock::MockKvRepository};
    /// use std::sync::Arc;
    /// let store = KeyValueStore::new(Arc::new(MockKvRepository::default()));
    /// let rec = tokio_test::block_on(store.put("group1/users/georgina", &serde_json::json!({"food": "marzipan"}))).unwrap();
    /// assert_eq!(rec.value["food"], "marzipan");
    /// assert_eq!(rec.created_at, rec.updated_at);
    /// ```
    #[instrument(skip_all, fields(key = %key))]
    pub async fn put(&self, key: &str, value: &serde_json::Value) -> Result<Record, ServiceError> {
        models::store::validate_key(key)?;
        let text = serde_json::to_string(value).map_err(|e| ServiceError::Codec(e.to_string()))?;
        let bytes = text.len();
        let row = self.repo.upsert(key, text).await.inspect_err(log_failure)?;
        let record = into_record(row)?;
        info!(bytes, "value_stored");
        Ok(record)
    }

    /// Fetch the record at `key`; `None` when absent.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn get(&self, key: &str) -> Result<Option<Record>, ServiceError> {
        models::store::validate_key(key)?;
        match self.repo.find(key).await.inspect_err(log_failure)? {
            Some(row) => Ok(Some(into_record(row)?)),
            None => {
                debug!("key_not_found");
                Ok(None)
            }
        }
    }

    /// Remove the record at `key`. Removing an absent key reports `NotFound`.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn delete(&self, key: &str) -> Result<DeleteOutcome, ServiceError> {
        models::store::validate_key(key)?;
        let rows_affected = self.repo.delete(key).await.inspect_err(log_failure)?;
        if rows_affected == 0 {
            debug!("key_not_found");
            return Ok(DeleteOutcome::NotFound);
        }
        info!(rows_affected, "value_deleted");
        Ok(DeleteOutcome::Deleted { rows_affected })
    }

    /// Check the backing store is reachable.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.repo.ping().await
    }
}

fn into_record(row: models::store::Model) -> Result<Record, ServiceError> {
    let value = serde_json::from_str(&row.value).map_err(|e| {
        error!(key = %row.key, error = %e, "stored value is not valid JSON");
        ServiceError::Codec(format!("stored value for {} is not valid JSON: {}", row.key, e))
    })?;
    Ok(Record { key: row.key, value, created_at: row.created, updated_at: row.updated })
}

fn log_failure(e: &ServiceError) {
    if e.kind() == ErrorKind::StorageFailure {
        error!(error = %e, "storage operation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::repository::mock::MockKvRepository;
    use serde_json::json;

    fn mock_store() -> KeyValueStore<MockKvRepository> {
        KeyValueStore::new(Arc::new(MockKvRepository::default()))
    }

    #[tokio::test]
    async fn put_then_get_returns_latest_value() -> Result<(), anyhow::Error> {
        let store = mock_store();
        store.put("a/b", &json!({"x": 1, "keep": true})).await?;
        store.put("a/b", &json!({"x": 2})).await?;
        let rec = store.get("a/b").await?.expect("present");
        // replaced, not merged
        assert_eq!(rec.value, json!({"x": 2}));
        Ok(())
    }

    #[tokio::test]
    async fn empty_key_is_invalid_input() {
        let store = mock_store();
        let err = store.put("", &json!(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(store.get("").await.unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(store.delete("").await.unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn delete_distinguishes_missing_keys() -> Result<(), anyhow::Error> {
        let store = mock_store();
        assert_eq!(store.delete("nope").await?, DeleteOutcome::NotFound);
        store.put("yes", &json!(null)).await?;
        assert_eq!(store.delete("yes").await?, DeleteOutcome::Deleted { rows_affected: 1 });
        assert!(store.get("yes").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_row_is_storage_failure() -> Result<(), anyhow::Error> {
        let repo = Arc::new(MockKvRepository::default());
        repo.upsert("bad", "{not json".to_string()).await?;
        let store = KeyValueStore::new(repo);
        let err = store.get("bad").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        Ok(())
    }

    #[tokio::test]
    async fn works_through_trait_object() -> Result<(), anyhow::Error> {
        let repo: Arc<dyn KvRepository> = Arc::new(MockKvRepository::default());
        let store: KeyValueStore<dyn KvRepository> = KeyValueStore::new(repo);
        store.put("k", &json!([1, 2, 3])).await?;
        assert_eq!(store.get("k").await?.map(|r| r.value), Some(json!([1, 2, 3])));
        store.ping().await?;
        Ok(())
    }
}
