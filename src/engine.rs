//! Supported storage engines and their connection conventions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Database engines a [`StorageDataSource`](crate::StorageDataSource) can be
/// built for.
///
/// Remote engines connect to a server over the network; the local engine
/// stores data in a file (or in memory) owned by the application. Each engine
/// knows its standard port and the name of the schema script that bootstraps
/// it (see [`crate::script::run_file`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageEngine {
   /// MySQL, remote
   MySql,
   /// MariaDB, remote. Wire-compatible with the MySQL driver.
   MariaDb,
   /// PostgreSQL, remote
   Postgres,
   /// SQLite, local
   Sqlite,
}

impl StorageEngine {
   /// Canonical display name of the engine
   pub fn as_str(&self) -> &'static str {
      match self {
         StorageEngine::MySql => "MySQL",
         StorageEngine::MariaDb => "MariaDB",
         StorageEngine::Postgres => "PostgreSQL",
         StorageEngine::Sqlite => "SQLite",
      }
   }

   /// File name of the schema script for this engine.
   ///
   /// MySQL and MariaDB share a script since they accept the same dialect.
   pub fn schema_file(&self) -> &'static str {
      match self {
         StorageEngine::MySql | StorageEngine::MariaDb => "mariadb.sql",
         StorageEngine::Postgres => "postgres.sql",
         StorageEngine::Sqlite => "sqlite.sql",
      }
   }

   /// Whether this engine stores data locally instead of connecting to a server
   pub fn is_local(&self) -> bool {
      matches!(self, StorageEngine::Sqlite)
   }

   /// Standard server port for remote engines; `None` for local engines
   pub fn default_port(&self) -> Option<u16> {
      match self {
         StorageEngine::MySql | StorageEngine::MariaDb => Some(3306),
         StorageEngine::Postgres => Some(5432),
         StorageEngine::Sqlite => None,
      }
   }
}

impl fmt::Display for StorageEngine {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.as_str())
   }
}

impl FromStr for StorageEngine {
   type Err = Error;

   /// Case-insensitive. Accepts the canonical names plus the spellings
   /// commonly found in config files ("postgres", "postgresql").
   fn from_str(value: &str) -> Result<Self, Error> {
      match value.to_ascii_lowercase().as_str() {
         "mysql" => Ok(StorageEngine::MySql),
         "mariadb" => Ok(StorageEngine::MariaDb),
         "postgres" | "postgresql" => Ok(StorageEngine::Postgres),
         "sqlite" => Ok(StorageEngine::Sqlite),
         other => Err(Error::Configuration(format!(
            "unknown storage engine: {other}"
         ))),
      }
   }
}
