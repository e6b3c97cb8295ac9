//! Repository implementations
//!
//! Repositories own the SQL for one table family and map rows to plain
//! structs. Conversion to domain types happens in `adapters`.
//!
//! Queries are checked at runtime (`sqlx::query_as::<_, Row>`) so the crate
//! builds without a live database. Methods that must run inside a caller's
//! transaction take a `&mut PgConnection` instead of using the pool.

pub mod claims;
pub mod notifications;
pub mod policy;
pub mod users;

pub use claims::ClaimsRepository;
pub use notifications::NotificationRepository;
pub use policy::PolicyRepository;
pub use users::UserRepository;
