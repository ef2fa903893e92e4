//! Integration tests for the caller-owned storage registry.

#![cfg(feature = "sqlite")]

use std::sync::Arc;

use sqlx_storage_builder::{Error, StorageDataSource, StorageEngine, StorageRegistry};

async fn memory_source(name: &str) -> Arc<StorageDataSource> {
   Arc::new(
      StorageDataSource::builder(StorageEngine::Sqlite)
         .memory(true)
         .min_connections(1)
         .max_connections(1)
         .build(name)
         .await
         .unwrap(),
   )
}

// ============================================================================
// Registration and lookup
// ============================================================================

#[tokio::test]
async fn test_register_and_get() {
   let registry = StorageRegistry::new();
   let source = memory_source("app").await;

   registry.register(source.clone()).unwrap();

   let found = registry.get("app").unwrap();
   assert!(Arc::ptr_eq(&found, &source));

   registry.close_all().await;
}

#[tokio::test]
async fn test_get_unknown_name_returns_none() {
   let registry = StorageRegistry::new();
   assert!(registry.get("missing").is_none());
   assert!(registry.is_empty());
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
   let registry = StorageRegistry::new();
   let first = memory_source("app").await;
   let second = memory_source("app").await;

   registry.register(first.clone()).unwrap();
   let err = registry.register(second.clone()).unwrap_err();
   assert!(matches!(err, Error::AlreadyRegistered(name) if name == "app"));

   // The original registration is left untouched
   let found = registry.get("app").unwrap();
   assert!(Arc::ptr_eq(&found, &first));

   second.close().await;
   registry.close_all().await;
}

#[tokio::test]
async fn test_remove_frees_the_name() {
   let registry = StorageRegistry::new();
   let first = memory_source("app").await;

   registry.register(first.clone()).unwrap();
   let removed = registry.remove("app").unwrap();
   assert!(Arc::ptr_eq(&removed, &first));
   assert!(registry.get("app").is_none());

   // Removing does not close the source
   assert!(!removed.is_closed());

   let second = memory_source("app").await;
   registry.register(second).unwrap();
   assert_eq!(registry.len(), 1);

   first.close().await;
   registry.close_all().await;
}

#[tokio::test]
async fn test_names_lists_registered_sources() {
   let registry = StorageRegistry::new();
   registry.register(memory_source("users").await).unwrap();
   registry.register(memory_source("metrics").await).unwrap();

   let mut names = registry.names();
   names.sort();
   assert_eq!(names, vec!["metrics", "users"]);
   assert_eq!(registry.len(), 2);

   registry.close_all().await;
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_close_all_closes_and_clears() {
   let registry = StorageRegistry::new();
   let users = memory_source("users").await;
   let metrics = memory_source("metrics").await;

   registry.register(users.clone()).unwrap();
   registry.register(metrics.clone()).unwrap();

   registry.close_all().await;

   assert!(registry.is_empty());
   assert!(users.is_closed());
   assert!(metrics.is_closed());
}

#[tokio::test]
async fn test_close_all_on_empty_registry() {
   let registry = StorageRegistry::new();
   registry.close_all().await;
   assert!(registry.is_empty());
}
