//! Pooled data source handle

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::builder::Builder;
use crate::config::{ConnectionTarget, PoolConfig};
use crate::engine::StorageEngine;
use crate::error::{Error, Result};

/// The engine-specific SQLx pool wrapped by a [`StorageDataSource`].
///
/// Variants exist only when the matching cargo feature is enabled. Use the
/// `as_*` accessors to reach the typed pool for direct SQLx queries.
#[derive(Debug, Clone)]
pub enum StoragePool {
   /// Pool for MySQL and MariaDB servers
   #[cfg(feature = "mysql")]
   MySql(sqlx::MySqlPool),
   /// Pool for PostgreSQL servers
   #[cfg(feature = "postgres")]
   Postgres(sqlx::PgPool),
   /// Pool for SQLite databases
   #[cfg(feature = "sqlite")]
   Sqlite(sqlx::SqlitePool),
}

impl StoragePool {
   /// Acquire and release one connection, proving the endpoint is reachable.
   pub(crate) async fn probe(&self) -> std::result::Result<(), sqlx::Error> {
      match self {
         #[cfg(feature = "mysql")]
         StoragePool::MySql(pool) => {
            pool.acquire().await?;
         }
         #[cfg(feature = "postgres")]
         StoragePool::Postgres(pool) => {
            pool.acquire().await?;
         }
         #[cfg(feature = "sqlite")]
         StoragePool::Sqlite(pool) => {
            pool.acquire().await?;
         }
      }
      Ok(())
   }

   pub(crate) async fn close(&self) {
      match self {
         #[cfg(feature = "mysql")]
         StoragePool::MySql(pool) => pool.close().await,
         #[cfg(feature = "postgres")]
         StoragePool::Postgres(pool) => pool.close().await,
         #[cfg(feature = "sqlite")]
         StoragePool::Sqlite(pool) => pool.close().await,
      }
   }

   /// Number of connections the pool currently holds
   pub fn size(&self) -> u32 {
      match self {
         #[cfg(feature = "mysql")]
         StoragePool::MySql(pool) => pool.size(),
         #[cfg(feature = "postgres")]
         StoragePool::Postgres(pool) => pool.size(),
         #[cfg(feature = "sqlite")]
         StoragePool::Sqlite(pool) => pool.size(),
      }
   }

   /// Number of those connections that are idle
   pub fn num_idle(&self) -> usize {
      match self {
         #[cfg(feature = "mysql")]
         StoragePool::MySql(pool) => pool.num_idle(),
         #[cfg(feature = "postgres")]
         StoragePool::Postgres(pool) => pool.num_idle(),
         #[cfg(feature = "sqlite")]
         StoragePool::Sqlite(pool) => pool.num_idle(),
      }
   }

   /// Execute a single statement, discarding any result rows
   pub async fn execute(&self, sql: &str) -> Result<()> {
      match self {
         #[cfg(feature = "mysql")]
         StoragePool::MySql(pool) => {
            sqlx::query(sql).execute(pool).await?;
         }
         #[cfg(feature = "postgres")]
         StoragePool::Postgres(pool) => {
            sqlx::query(sql).execute(pool).await?;
         }
         #[cfg(feature = "sqlite")]
         StoragePool::Sqlite(pool) => {
            sqlx::query(sql).execute(pool).await?;
         }
      }
      Ok(())
   }

   /// Borrow the typed MySQL pool, if that is what this source wraps
   #[cfg(feature = "mysql")]
   pub fn as_mysql(&self) -> Option<&sqlx::MySqlPool> {
      match self {
         StoragePool::MySql(pool) => Some(pool),
         #[allow(unreachable_patterns)]
         _ => None,
      }
   }

   /// Borrow the typed PostgreSQL pool, if that is what this source wraps
   #[cfg(feature = "postgres")]
   pub fn as_postgres(&self) -> Option<&sqlx::PgPool> {
      match self {
         StoragePool::Postgres(pool) => Some(pool),
         #[allow(unreachable_patterns)]
         _ => None,
      }
   }

   /// Borrow the typed SQLite pool, if that is what this source wraps
   #[cfg(feature = "sqlite")]
   pub fn as_sqlite(&self) -> Option<&sqlx::SqlitePool> {
      match self {
         StoragePool::Sqlite(pool) => Some(pool),
         #[allow(unreachable_patterns)]
         _ => None,
      }
   }
}

/// A named, pooled data source.
///
/// Wraps the engine's connection pool together with the frozen configuration
/// it was built from. The handle is `Send + Sync`; share it across tasks
/// behind an `Arc` and close it exactly once during orderly shutdown (extra
/// [`close`](StorageDataSource::close) calls are no-ops).
#[derive(Debug)]
pub struct StorageDataSource {
   name: String,
   engine: StorageEngine,
   target: ConnectionTarget,
   pool_config: PoolConfig,
   pool: StoragePool,
   closed: AtomicBool,
}

impl StorageDataSource {
   /// Create a new builder for the given engine
   pub fn builder(engine: StorageEngine) -> Builder {
      Builder::new(engine)
   }

   pub(crate) fn new(
      name: String,
      engine: StorageEngine,
      target: ConnectionTarget,
      pool_config: PoolConfig,
      pool: StoragePool,
   ) -> Self {
      Self {
         name,
         engine,
         target,
         pool_config,
         pool,
         closed: AtomicBool::new(false),
      }
   }

   /// The pool name this source was built with
   pub fn name(&self) -> &str {
      &self.name
   }

   /// The engine this source connects to
   pub fn engine(&self) -> StorageEngine {
      self.engine
   }

   /// Password-free description of where this source connects
   pub fn target(&self) -> &ConnectionTarget {
      &self.target
   }

   /// The pool configuration this source was built with
   pub fn pool_config(&self) -> &PoolConfig {
      &self.pool_config
   }

   /// Configured upper bound on the pool size
   pub fn max_connections(&self) -> u32 {
      self.pool_config.max_connections
   }

   /// The wrapped connection pool
   pub fn pool(&self) -> &StoragePool {
      &self.pool
   }

   /// Execute a single statement on the pool.
   ///
   /// # Errors
   ///
   /// [`Error::Closed`] if the source has been closed, otherwise any SQLx
   /// error the statement produced.
   pub async fn execute(&self, sql: &str) -> Result<()> {
      if self.is_closed() {
         return Err(Error::Closed);
      }
      self.pool.execute(sql).await
   }

   /// Whether [`close`](StorageDataSource::close) has been called
   pub fn is_closed(&self) -> bool {
      self.closed.load(Ordering::Acquire)
   }

   /// Close the underlying pool, waiting for borrowed connections to return.
   ///
   /// Concurrent and repeated calls are safe: the first caller performs the
   /// shutdown and every later call returns immediately.
   pub async fn close(&self) {
      if self.closed.swap(true, Ordering::AcqRel) {
         return;
      }
      self.pool.close().await;
      info!(pool = %self.name, "storage pool closed");
   }
}
