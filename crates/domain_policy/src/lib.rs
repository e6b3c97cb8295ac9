//! Policy Domain
//!
//! Insurance plans and the policies issued against them. From the claims
//! side a policy is read-mostly: the lifecycle service only needs its status
//! and remaining coverage, and debits that balance when a claim is approved.
//!
//! # Policy Lifecycle
//!
//! ```text
//! Active -> Suspended -> Active
//!        \-> Expired
//!        \-> Cancelled
//! ```

pub mod plan;
pub mod aggregate;
pub mod coverage;
pub mod error;

pub use plan::InsurancePlan;
pub use aggregate::{Policy, PolicyStatus};
pub use coverage::PolicyCoverage;
pub use error::PolicyError;
