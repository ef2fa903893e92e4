//! Caller-owned collection of named data sources

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::datasource::StorageDataSource;
use crate::error::{Error, Result};

/// Holds the named [`StorageDataSource`] handles of an application.
///
/// There is deliberately no process-global instance: create one registry near
/// your application root and pass it (or the `Arc`s it hands out) to the
/// components that need database access.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sqlx_storage_builder::{StorageDataSource, StorageEngine, StorageRegistry};
///
/// # async fn example() -> sqlx_storage_builder::Result<()> {
/// let registry = StorageRegistry::new();
///
/// let source = StorageDataSource::builder(StorageEngine::Sqlite)
///    .path("data/app.db")
///    .build("app")
///    .await?;
/// registry.register(Arc::new(source))?;
///
/// // ... hand `registry` to the rest of the application ...
///
/// registry.close_all().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct StorageRegistry {
   sources: RwLock<HashMap<String, Arc<StorageDataSource>>>,
}

impl StorageRegistry {
   /// Create an empty registry
   pub fn new() -> Self {
      Self::default()
   }

   /// Register a data source under its pool name.
   ///
   /// # Errors
   ///
   /// [`Error::AlreadyRegistered`] if a source with the same name is present.
   /// The existing source is left untouched.
   pub fn register(&self, source: Arc<StorageDataSource>) -> Result<()> {
      let mut sources = self.sources.write().expect("registry lock poisoned");
      let name = source.name().to_string();
      if sources.contains_key(&name) {
         warn!(pool = %name, "data source name is already registered");
         return Err(Error::AlreadyRegistered(name));
      }
      sources.insert(name, source);
      Ok(())
   }

   /// Look up a data source by name
   pub fn get(&self, name: &str) -> Option<Arc<StorageDataSource>> {
      self
         .sources
         .read()
         .expect("registry lock poisoned")
         .get(name)
         .cloned()
   }

   /// Remove a data source from the registry, returning it if present.
   ///
   /// The source itself is not closed; other holders of the `Arc` can keep
   /// using it.
   pub fn remove(&self, name: &str) -> Option<Arc<StorageDataSource>> {
      self
         .sources
         .write()
         .expect("registry lock poisoned")
         .remove(name)
   }

   /// Names of all registered data sources
   pub fn names(&self) -> Vec<String> {
      self
         .sources
         .read()
         .expect("registry lock poisoned")
         .keys()
         .cloned()
         .collect()
   }

   /// Number of registered data sources
   pub fn len(&self) -> usize {
      self.sources.read().expect("registry lock poisoned").len()
   }

   /// Whether the registry is empty
   pub fn is_empty(&self) -> bool {
      self.len() == 0
   }

   /// Close every registered data source and clear the registry.
   ///
   /// The lock is released before the sources are closed, so other threads
   /// are never blocked on a pool shutdown.
   pub async fn close_all(&self) {
      let drained: Vec<_> = {
         let mut sources = self.sources.write().expect("registry lock poisoned");
         sources.drain().map(|(_, source)| source).collect()
      };
      for source in drained {
         source.close().await;
      }
   }
}
