//! Fluent construction of pooled storage data sources

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::config::{ConnectionTarget, PoolConfig};
use crate::datasource::{StorageDataSource, StoragePool};
use crate::engine::StorageEngine;
use crate::error::{Error, Result};

/// Statement cache size applied to MySQL-family pools unless
/// [`Builder::no_optimization`] is called.
#[cfg(feature = "mysql")]
const STATEMENT_CACHE_CAPACITY: usize = 250;

/// Fluent builder for [`StorageDataSource`].
///
/// Obtained from [`StorageDataSource::builder`]. All configuration is
/// validated up front: [`Builder::build`] rejects incomplete or inconsistent
/// settings before any connection is attempted.
///
/// # Example
///
/// ```no_run
/// use sqlx_storage_builder::{StorageDataSource, StorageEngine};
///
/// # async fn example() -> sqlx_storage_builder::Result<()> {
/// let source = StorageDataSource::builder(StorageEngine::Sqlite)
///    .path("data/app.db")
///    .max_connections(5)
///    .build("app")
///    .await?;
/// # Ok(())
/// # }
/// ```
#[must_use = "builder does nothing itself, use `.build()` to build a data source"]
pub struct Builder {
   engine: StorageEngine,
   host: String,
   port: Option<u16>,
   database: String,
   username: String,
   password: String,
   path: Option<PathBuf>,
   memory: bool,
   optimize: bool,
   pool: PoolConfig,
}

impl Builder {
   pub(crate) fn new(engine: StorageEngine) -> Self {
      Self {
         engine,
         host: "localhost".to_string(),
         port: None,
         database: String::new(),
         username: String::new(),
         password: String::new(),
         path: None,
         memory: false,
         optimize: matches!(engine, StorageEngine::MySql | StorageEngine::MariaDb),
         pool: PoolConfig::default(),
      }
   }

   /// Set the file path for the connection.
   ///
   /// Only meaningful for local engines. The file is created if it does not
   /// exist yet.
   pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
      self.path = Some(path.into());
      self
   }

   /// Set the host for the connection. Default: `localhost`.
   pub fn host(mut self, host: impl Into<String>) -> Self {
      self.host = host.into();
      self
   }

   /// Set the server port. Defaults to the engine's standard port.
   pub fn port(mut self, port: u16) -> Self {
      self.port = Some(port);
      self
   }

   /// Set the database name for the connection
   pub fn database(mut self, database: impl Into<String>) -> Self {
      self.database = database.into();
      self
   }

   /// Set the username for the connection
   pub fn username(mut self, username: impl Into<String>) -> Self {
      self.username = username.into();
      self
   }

   /// Set the password for the connection
   pub fn password(mut self, password: impl Into<String>) -> Self {
      self.password = password.into();
      self
   }

   /// Store the database in memory instead of a file. Local engines only.
   ///
   /// Each pooled connection opens its own private in-memory database, so
   /// pair this with `max_connections(1)` when statements must observe each
   /// other's writes.
   pub fn memory(mut self, memory: bool) -> Self {
      self.memory = memory;
      self
   }

   /// Skip the statement-cache optimization applied to MySQL-family engines
   pub fn no_optimization(mut self) -> Self {
      self.optimize = false;
      self
   }

   /// Replace the entire pool configuration
   pub fn pool_config(mut self, pool: PoolConfig) -> Self {
      self.pool = pool;
      self
   }

   /// Largest number of connections the pool will open
   pub fn max_connections(mut self, max_connections: u32) -> Self {
      self.pool.max_connections = max_connections;
      self
   }

   /// Number of idle connections the pool tries to keep ready
   pub fn min_connections(mut self, min_connections: u32) -> Self {
      self.pool.min_connections = min_connections;
      self
   }

   /// How long a caller waits for a free connection before giving up
   pub fn acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
      self.pool.acquire_timeout = acquire_timeout;
      self
   }

   /// Connections idle for longer than this are closed automatically
   pub fn idle_timeout(mut self, idle_timeout: Duration) -> Self {
      self.pool.idle_timeout = idle_timeout;
      self
   }

   /// Connections older than this are retired and replaced
   pub fn max_lifetime(mut self, max_lifetime: Duration) -> Self {
      self.pool.max_lifetime = max_lifetime;
      self
   }

   /// Attempt to build a [`StorageDataSource`] named `pool_name`.
   ///
   /// Validates the configuration, creates the connection pool, then acquires
   /// and releases one connection to prove the endpoint is reachable before
   /// handing the pool out.
   ///
   /// # Errors
   ///
   /// - [`Error::Configuration`] when settings are incomplete or inconsistent;
   ///   raised before any connection attempt.
   /// - [`Error::UnsupportedEngine`] when the engine's driver feature is not
   ///   compiled in.
   /// - [`Error::Initialization`] when the pool cannot establish its initial
   ///   connection.
   pub async fn build(self, pool_name: &str) -> Result<StorageDataSource> {
      self.validate(pool_name)?;

      info!(pool = pool_name, engine = %self.engine, "loading storage provider");

      let target = self.target();
      let pool = self.connect().await?;
      pool.probe().await.map_err(Error::Initialization)?;

      info!(
         pool = pool_name,
         engine = %self.engine,
         target = %target,
         max_connections = self.pool.max_connections,
         "storage pool ready"
      );

      Ok(StorageDataSource::new(
         pool_name.to_string(),
         self.engine,
         target,
         self.pool,
         pool,
      ))
   }

   fn validate(&self, pool_name: &str) -> Result<()> {
      if pool_name.trim().is_empty() {
         return Err(Error::Configuration("pool name must not be empty".into()));
      }
      if self.pool.max_connections == 0 {
         return Err(Error::Configuration(
            "max_connections must be greater than zero".into(),
         ));
      }
      if self.pool.min_connections > self.pool.max_connections {
         return Err(Error::Configuration(format!(
            "min_connections ({}) exceeds max_connections ({})",
            self.pool.min_connections, self.pool.max_connections
         )));
      }
      if self.engine.is_local() {
         if self.path.is_none() && !self.memory {
            return Err(Error::Configuration(
               "local engines need a file path or an in-memory database".into(),
            ));
         }
      } else {
         for (field, value) in [
            ("host", &self.host),
            ("database", &self.database),
            ("username", &self.username),
            ("password", &self.password),
         ] {
            if value.is_empty() {
               return Err(Error::Configuration(format!("{field} must not be empty")));
            }
         }
      }
      Ok(())
   }

   fn target(&self) -> ConnectionTarget {
      if self.engine.is_local() {
         match &self.path {
            Some(path) if !self.memory => ConnectionTarget::File(path.clone()),
            _ => ConnectionTarget::Memory,
         }
      } else {
         ConnectionTarget::Server {
            host: self.host.clone(),
            port: self.effective_port(),
            database: self.database.clone(),
            username: self.username.clone(),
         }
      }
   }

   fn effective_port(&self) -> u16 {
      self.port.or(self.engine.default_port()).unwrap_or(0)
   }

   async fn connect(&self) -> Result<StoragePool> {
      match self.engine {
         StorageEngine::MySql | StorageEngine::MariaDb => self.connect_mysql().await,
         StorageEngine::Postgres => self.connect_postgres().await,
         StorageEngine::Sqlite => self.connect_sqlite().await,
      }
   }

   #[cfg(feature = "mysql")]
   async fn connect_mysql(&self) -> Result<StoragePool> {
      use sqlx::mysql::{MySql, MySqlConnectOptions};

      let mut options = MySqlConnectOptions::new()
         .host(&self.host)
         .port(self.effective_port())
         .database(&self.database)
         .username(&self.username)
         .password(&self.password);
      if self.optimize {
         options = options.statement_cache_capacity(STATEMENT_CACHE_CAPACITY);
      }
      let pool = self
         .pool_options::<MySql>()
         .connect_with(options)
         .await
         .map_err(Error::Initialization)?;
      Ok(StoragePool::MySql(pool))
   }

   #[cfg(not(feature = "mysql"))]
   async fn connect_mysql(&self) -> Result<StoragePool> {
      Err(Error::UnsupportedEngine(self.engine))
   }

   #[cfg(feature = "postgres")]
   async fn connect_postgres(&self) -> Result<StoragePool> {
      use sqlx::postgres::{PgConnectOptions, Postgres};

      let options = PgConnectOptions::new()
         .host(&self.host)
         .port(self.effective_port())
         .database(&self.database)
         .username(&self.username)
         .password(&self.password);
      let pool = self
         .pool_options::<Postgres>()
         .connect_with(options)
         .await
         .map_err(Error::Initialization)?;
      Ok(StoragePool::Postgres(pool))
   }

   #[cfg(not(feature = "postgres"))]
   async fn connect_postgres(&self) -> Result<StoragePool> {
      Err(Error::UnsupportedEngine(self.engine))
   }

   #[cfg(feature = "sqlite")]
   async fn connect_sqlite(&self) -> Result<StoragePool> {
      use sqlx::sqlite::{Sqlite, SqliteConnectOptions};

      let options = if self.memory {
         SqliteConnectOptions::new().in_memory(true)
      } else if let Some(path) = &self.path {
         SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
      } else {
         return Err(Error::Configuration(
            "local engines need a file path or an in-memory database".into(),
         ));
      };
      let pool = self
         .pool_options::<Sqlite>()
         .connect_with(options)
         .await
         .map_err(Error::Initialization)?;
      Ok(StoragePool::Sqlite(pool))
   }

   #[cfg(not(feature = "sqlite"))]
   async fn connect_sqlite(&self) -> Result<StoragePool> {
      Err(Error::UnsupportedEngine(self.engine))
   }

   fn pool_options<DB: sqlx::Database>(&self) -> sqlx::pool::PoolOptions<DB> {
      sqlx::pool::PoolOptions::new()
         .max_connections(self.pool.max_connections)
         .min_connections(self.pool.min_connections)
         .acquire_timeout(self.pool.acquire_timeout)
         .idle_timeout(self.pool.idle_timeout)
         .max_lifetime(self.pool.max_lifetime)
   }
}

impl fmt::Debug for Builder {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Builder")
         .field("engine", &self.engine)
         .field("host", &self.host)
         .field("port", &self.port)
         .field("database", &self.database)
         .field("username", &self.username)
         .field("password", &"<redacted>")
         .field("path", &self.path)
         .field("memory", &self.memory)
         .field("optimize", &self.optimize)
         .field("pool", &self.pool)
         .finish()
   }
}
