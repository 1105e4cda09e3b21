use foodpal_migrate::bootstrap::{FRESH_SCHEMA, init_store, verify_fresh_schema};
use foodpal_migrate::db::{DbExecutor, OpenMode, open_store};
use foodpal_migrate::{TARGET_COLUMNS, check, migrate};
use sqlx::Connection;

#[tokio::test]
async fn test_fresh_schema_satisfies_targets() {
    verify_fresh_schema(TARGET_COLUMNS).await.unwrap();
}

#[tokio::test]
async fn test_init_store_creates_complete_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foodpal.db");

    assert!(init_store(&path).await.unwrap());
    assert!(path.exists());

    assert!(check(&path, TARGET_COLUMNS).await.unwrap().is_empty());
    let report = migrate(&path, TARGET_COLUMNS).await.unwrap();
    assert!(report.is_noop());
}

// init must not touch a store that is already there
#[tokio::test]
async fn test_init_store_keeps_existing_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foodpal.db");

    let mut conn = open_store(&path, OpenMode::Create).await.unwrap();
    DbExecutor::new(&mut conn)
        .execute("CREATE TABLE users (id INTEGER PRIMARY KEY)")
        .await
        .unwrap();
    conn.close().await.unwrap();

    assert!(!init_store(&path).await.unwrap());

    let mut conn = open_store(&path, OpenMode::ReadOnly).await.unwrap();
    let mut db = DbExecutor::new(&mut conn);
    assert!(!db.describe_table("meal_plans").await.unwrap().exists());
    assert_eq!(db.describe_table("users").await.unwrap().columns.len(), 1);
    conn.close().await.unwrap();
}

#[test]
fn test_fresh_schema_declares_both_tables() {
    assert!(FRESH_SCHEMA.contains("CREATE TABLE IF NOT EXISTS users"));
    assert!(FRESH_SCHEMA.contains("CREATE TABLE IF NOT EXISTS meal_plans"));
}
