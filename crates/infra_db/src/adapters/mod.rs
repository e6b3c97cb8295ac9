//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports. Each adapter:
//! - Implements the domain's port traits
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::{PostgresClaimStore, PostgresNotificationAdapter};
//! use domain_claims::ClaimLifecycleService;
//!
//! let store = Arc::new(PostgresClaimStore::new(pool.clone()));
//! let notifications = Arc::new(PostgresNotificationAdapter::new(pool));
//! let service = ClaimLifecycleService::new(store.clone(), store, notifications);
//! ```

pub mod claims;
pub mod mapping;
pub mod notifications;

pub use claims::PostgresClaimStore;
pub use notifications::PostgresNotificationAdapter;
