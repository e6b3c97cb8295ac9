//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the claims platform using SQLx.
//!
//! # Architecture
//!
//! - `repositories`: SQL for each table family, returning row structs
//! - `adapters`: implementations of the domain ports built on the repositories
//! - `pool`: connection pool configuration and embedded migrations
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresClaimStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::{PostgresClaimStore, PostgresNotificationAdapter};
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
