//! # sqlx-storage-builder
//!
//! A utility library to easily build and wrap SQLx connection pools.
//!
//! ## Core Types
//!
//! - **[`StorageEngine`]**: Supported database engines and their connection
//!   conventions
//! - **[`Builder`]**: Fluent, validated construction of a pooled data source
//! - **[`StorageDataSource`]**: Named handle wrapping the engine's connection
//!   pool, with explicit, idempotent shutdown
//! - **[`StorageRegistry`]**: Caller-owned collection of named data sources
//! - **[`Error`]**: Error type for build, registry and script operations
//!
//! ## Architecture
//!
//! - **Validation first**: configuration problems are rejected before any
//!   connection is attempted
//! - **Pooling stays in SQLx**: the library only translates configuration
//!   into pool options and wraps the result; borrow/return coordination,
//!   timeouts and eviction all belong to the pool itself
//! - **Explicit lifecycle**: the caller owns each handle and closes it once
//!   during shutdown; there is no process-global state
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqlx_storage_builder::{StorageDataSource, StorageEngine, StorageRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!    let source = StorageDataSource::builder(StorageEngine::Sqlite)
//!       .path("data/app.db")
//!       .max_connections(5)
//!       .build("app")
//!       .await?;
//!
//!    let registry = StorageRegistry::new();
//!    registry.register(Arc::new(source))?;
//!
//!    let source = registry.get("app").expect("registered above");
//!    source
//!       .execute("CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY)")
//!       .await?;
//!
//!    registry.close_all().await;
//!    Ok(())
//! }
//! ```

#[cfg(not(any(feature = "sqlite", feature = "mysql", feature = "postgres")))]
compile_error!("at least one engine feature (`sqlite`, `mysql`, `postgres`) must be enabled");

mod builder;
mod config;
mod datasource;
mod engine;
mod error;
mod registry;
pub mod script;

// Re-export public types
pub use builder::Builder;
pub use config::{ConnectionTarget, PoolConfig};
pub use datasource::{StorageDataSource, StoragePool};
pub use engine::StorageEngine;
pub use error::{Error, Result};
pub use registry::StorageRegistry;
