use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Barrier;

use super::TestDb;
use crate::errors::ModelError;
use crate::store;

#[tokio::test]
async fn test_insert_sets_both_timestamps() -> Result<()> {
    let t = TestDb::new().await?;
    let row = store::upsert(&t.db, "a/b", r#"{"x":1}"#.to_string()).await?;
    assert_eq!(row.key, "a/b");
    assert_eq!(row.value, r#"{"x":1}"#);
    assert_eq!(row.created, row.updated);
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn test_update_replaces_value_and_keeps_created() -> Result<()> {
    let t = TestDb::new().await?;
    let first = store::upsert(&t.db, "a/b", "1".to_string()).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store::upsert(&t.db, "a/b", "2".to_string()).await?;

    assert_eq!(second.value, "2");
    assert_eq!(second.created, first.created);
    assert!(second.updated >= first.updated);

    let found = store::find(&t.db, "a/b").await?.expect("row present");
    assert_eq!(found, second);
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn test_delete_reports_rows_affected() -> Result<()> {
    let t = TestDb::new().await?;
    assert_eq!(store::delete(&t.db, "missing").await?, 0);

    store::upsert(&t.db, "k", "null".to_string()).await?;
    assert_eq!(store::delete(&t.db, "k").await?, 1);
    assert!(store::find(&t.db, "k").await?.is_none());
    assert_eq!(store::delete(&t.db, "k").await?, 0);
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn test_empty_key_rejected() -> Result<()> {
    let t = TestDb::new().await?;
    let err = store::upsert(&t.db, "", "1".to_string()).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
    t.cleanup().await;
    Ok(())
}

/// Racing first writers on one key: every upsert succeeds and exactly one row
/// remains, holding one of the written values.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_writers() -> Result<()> {
    let t = TestDb::new().await?;
    let n = 16;
    let barrier = Arc::new(Barrier::new(n));
    let mut handles = Vec::with_capacity(n);
    for i in 0..n {
        let db = t.db.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            store::upsert(&db, "race/key", format!("{i}")).await
        }));
    }
    let mut created = Vec::new();
    for h in handles {
        let row = h.await??;
        created.push(row.created);
    }

    let row = store::find(&t.db, "race/key").await?.expect("row present");
    let v: usize = row.value.parse()?;
    assert!(v < n);
    // only the inserting writer set `created`; the rest returned it unchanged
    assert!(created.iter().all(|c| *c == row.created));
    t.cleanup().await;
    Ok(())
}
