//! Database connectors and utilities.
//!
//! PostgreSQL (with the `vector` extension) is the only backend:
//!
//! - `postgres` (default) - pooled SeaORM connections, retrying connect,
//!   migration runner and a `SELECT 1` health probe
//! - `config` - `PostgresConfig: core_config::FromEnv`
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "access_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
