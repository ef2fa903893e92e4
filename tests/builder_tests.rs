//! Integration tests for building storage data sources, backed by SQLite.

#![cfg(feature = "sqlite")]

use sqlx_storage_builder::{ConnectionTarget, Error, StorageDataSource, StorageEngine};

async fn file_backed_source(temp: &tempfile::NamedTempFile, name: &str) -> StorageDataSource {
   StorageDataSource::builder(StorageEngine::Sqlite)
      .path(temp.path())
      .min_connections(1)
      .max_connections(5)
      .build(name)
      .await
      .unwrap()
}

// ============================================================================
// Successful builds
// ============================================================================

#[tokio::test]
async fn test_build_returns_usable_handle() {
   let temp = tempfile::NamedTempFile::new().unwrap();
   let source = file_backed_source(&temp, "users").await;

   assert_eq!(source.name(), "users");
   assert_eq!(source.engine(), StorageEngine::Sqlite);
   assert!(!source.is_closed());

   source
      .execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
      .await
      .unwrap();
   source
      .execute("INSERT INTO users (name) VALUES ('alice')")
      .await
      .unwrap();

   let pool = source.pool().as_sqlite().unwrap();
   let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
      .fetch_one(pool)
      .await
      .unwrap();
   assert_eq!(count, 1);

   source.close().await;
}

#[tokio::test]
async fn test_build_reports_configured_max_connections() {
   let temp = tempfile::NamedTempFile::new().unwrap();
   let source = StorageDataSource::builder(StorageEngine::Sqlite)
      .path(temp.path())
      .min_connections(1)
      .max_connections(5)
      .build("sized")
      .await
      .unwrap();

   assert_eq!(source.max_connections(), 5);
   assert_eq!(source.pool_config().min_connections, 1);

   source.close().await;
}

#[tokio::test]
async fn test_build_creates_missing_database_file() {
   let dir = tempfile::tempdir().unwrap();
   let path = dir.path().join("fresh.db");
   assert!(!path.exists());

   let source = StorageDataSource::builder(StorageEngine::Sqlite)
      .path(&path)
      .build("fresh")
      .await
      .unwrap();

   assert!(path.exists());
   assert!(matches!(source.target(), ConnectionTarget::File(_)));

   source.close().await;
}

#[tokio::test]
async fn test_build_in_memory_database() {
   let source = StorageDataSource::builder(StorageEngine::Sqlite)
      .memory(true)
      .min_connections(1)
      .max_connections(1)
      .build("scratch")
      .await
      .unwrap();

   assert_eq!(source.target(), &ConnectionTarget::Memory);
   source
      .execute("CREATE TABLE scratch (id INTEGER PRIMARY KEY)")
      .await
      .unwrap();
   source.execute("INSERT INTO scratch VALUES (1)").await.unwrap();

   source.close().await;
}

#[tokio::test]
async fn test_probe_leaves_a_pooled_connection() {
   let temp = tempfile::NamedTempFile::new().unwrap();
   let source = file_backed_source(&temp, "probed").await;

   assert!(source.pool().size() >= 1);

   source.close().await;
}

// ============================================================================
// Configuration validation
// ============================================================================

#[tokio::test]
async fn test_min_above_max_is_rejected() {
   let err = StorageDataSource::builder(StorageEngine::Sqlite)
      .memory(true)
      .min_connections(6)
      .max_connections(5)
      .build("bad-pool")
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Configuration(_)));
}

#[tokio::test]
async fn test_zero_max_connections_is_rejected() {
   let err = StorageDataSource::builder(StorageEngine::Sqlite)
      .memory(true)
      .max_connections(0)
      .build("bad-pool")
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Configuration(_)));
}

#[tokio::test]
async fn test_empty_host_is_rejected_before_connecting() {
   let err = StorageDataSource::builder(StorageEngine::MySql)
      .host("")
      .database("app")
      .username("svc")
      .password("secret")
      .build("remote")
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Configuration(_)));
   assert!(err.to_string().contains("host"));
}

#[tokio::test]
async fn test_empty_database_is_rejected_before_connecting() {
   let err = StorageDataSource::builder(StorageEngine::Postgres)
      .host("db.example.com")
      .username("svc")
      .password("secret")
      .build("remote")
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Configuration(_)));
   assert!(err.to_string().contains("database"));
}

#[tokio::test]
async fn test_empty_pool_name_is_rejected() {
   let err = StorageDataSource::builder(StorageEngine::Sqlite)
      .memory(true)
      .build("")
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Configuration(_)));
}

#[tokio::test]
async fn test_local_engine_without_path_is_rejected() {
   let err = StorageDataSource::builder(StorageEngine::Sqlite)
      .build("no-path")
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Configuration(_)));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_close_is_idempotent() {
   let temp = tempfile::NamedTempFile::new().unwrap();
   let source = file_backed_source(&temp, "closable").await;

   assert!(!source.is_closed());
   source.close().await;
   assert!(source.is_closed());

   // Second close is a no-op
   source.close().await;
   assert!(source.is_closed());
}

#[tokio::test]
async fn test_execute_after_close_fails() {
   let temp = tempfile::NamedTempFile::new().unwrap();
   let source = file_backed_source(&temp, "closed").await;

   source.close().await;
   let err = source.execute("SELECT 1").await.unwrap_err();
   assert!(matches!(err, Error::Closed));
}
