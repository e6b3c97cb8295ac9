//! Claims Domain
//!
//! The claim aggregate and the lifecycle service that moves it through review
//! and payment.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> InReview -> Approved -> Paid
//!          \            \-> Rejected
//!           \-> Approved / Rejected
//! ```
//!
//! Rejected and Paid are terminal. Every committed transition emits a
//! [`ClaimEvent`] to the notification dispatcher.

pub mod claim;
pub mod capability;
pub mod decision;
pub mod events;
pub mod ports;
pub mod report;
pub mod service;
pub mod error;

pub use claim::{Claim, ClaimStatus};
pub use capability::{authorize, Actor, Capability, Role};
pub use decision::ReviewDecision;
pub use events::{ClaimEvent, ClaimEventKind, Recipient};
pub use ports::{
    ClaimQuery, ClaimStore, ClaimTransition, CoverageChecker, CoverageDebit,
    NotificationDispatcher,
};
pub use report::{ClaimsSummary, CurrencyTotals, StatusTotals};
pub use service::{ClaimLifecycleService, NewClaimRequest};
pub use error::ClaimError;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{FailingDispatcher, MockClaimStore, RecordingDispatcher};
