//! Request handlers, one module per resource

pub mod claims;
pub mod health;
pub mod notifications;
pub mod policy;
pub mod reports;
