//! Core Kernel - Foundational types shared by every crate of the claims platform
//!
//! This crate provides the building blocks used across the domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port infrastructure (errors, health checks) for the hexagonal layout

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    ClaimId, PolicyId, PlanId, UserId, HospitalId, NotificationId,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
