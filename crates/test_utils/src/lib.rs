//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims platform test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built plans, policies, actors and amounts
//! - `builders`: Claim builder and an in-memory service stack
//! - `database`: PostgreSQL testcontainer with migrations applied
//! - `assertions`: Assertion helpers for claims, policies and money
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
