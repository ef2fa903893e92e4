//! Error types for sqlx-storage-builder

use thiserror::Error;

use crate::engine::StorageEngine;

/// Errors that may occur when building or using a storage data source
#[derive(Error, Debug)]
pub enum Error {
   /// Invalid or missing configuration. Raised before any connection attempt
   /// is made, so a configuration failure never touches the network.
   #[error("invalid configuration: {0}")]
   Configuration(String),

   /// The pooling engine failed to establish its initial state, e.g. the
   /// endpoint was unreachable or rejected the credentials.
   #[error("failed to initialize connection pool: {0}")]
   Initialization(#[source] sqlx::Error),

   /// Driver support for the requested engine was not compiled in. Enable
   /// the matching cargo feature (`sqlite`, `mysql` or `postgres`).
   #[error("support for {0} is not enabled at compile time")]
   UnsupportedEngine(StorageEngine),

   /// The data source has been closed and cannot be used
   #[error("data source has been closed")]
   Closed,

   /// A registry already holds a data source under this name
   #[error("a data source named `{0}` is already registered")]
   AlreadyRegistered(String),

   /// IO error when reading a schema script
   #[error("io error: {0}")]
   Io(#[from] std::io::Error),

   /// Error from the SQLx library while executing statements
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
