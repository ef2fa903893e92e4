//! Pool tuning and frozen connection settings

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning knobs forwarded to the pooling engine.
///
/// Timeouts serialize as whole seconds so the struct can be loaded straight
/// from application config files.
///
/// # Examples
///
/// ```
/// use sqlx_storage_builder::PoolConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = PoolConfig::default();
///
/// // Override just one field
/// let config = PoolConfig {
///    max_connections: 10,
///    ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
   /// Largest number of connections the pool will open
   ///
   /// Default: 5
   pub max_connections: u32,

   /// Number of idle connections the pool tries to keep ready
   ///
   /// Default: 3
   pub min_connections: u32,

   /// How long a caller waits for a free connection before giving up
   ///
   /// Default: 10 seconds
   #[serde(with = "duration_secs")]
   pub acquire_timeout: Duration,

   /// Connections idle for longer than this are closed automatically
   ///
   /// Default: 30 seconds
   #[serde(with = "duration_secs")]
   pub idle_timeout: Duration,

   /// Connections older than this are retired and replaced
   ///
   /// Default: 30 minutes
   #[serde(with = "duration_secs")]
   pub max_lifetime: Duration,
}

impl Default for PoolConfig {
   fn default() -> Self {
      Self {
         max_connections: 5,
         min_connections: 3,
         acquire_timeout: Duration::from_secs(10),
         idle_timeout: Duration::from_secs(30),
         max_lifetime: Duration::from_secs(30 * 60),
      }
   }
}

/// Where a data source connects.
///
/// Captured when the pool is built and kept on the handle for logging and
/// introspection. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
   /// Remote server endpoint
   Server {
      host: String,
      port: u16,
      database: String,
      username: String,
   },
   /// Local database file
   File(PathBuf),
   /// Local in-memory database
   Memory,
}

impl fmt::Display for ConnectionTarget {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         ConnectionTarget::Server {
            host,
            port,
            database,
            ..
         } => write!(f, "{host}:{port}/{database}"),
         ConnectionTarget::File(path) => write!(f, "{}", path.display()),
         ConnectionTarget::Memory => f.write_str(":memory:"),
      }
   }
}

mod duration_secs {
   use std::time::Duration;

   use serde::{Deserialize, Deserializer, Serializer};

   pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
      serializer.serialize_u64(value.as_secs())
   }

   pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
      u64::deserialize(deserializer).map(Duration::from_secs)
   }
}
