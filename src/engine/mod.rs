//! engine
//!
//! The lending policy engine: borrow, reserve, and return.
//!
//! # Architecture
//!
//! The engine is the only component that makes lending decisions. Each
//! operation runs a uniform lifecycle against the book named by the caller:
//!
//! ```text
//! Lock -> Load -> Gate -> Apply -> Verify -> Persist
//! ```
//!
//! - **Lock**: take the per-book lock ([`lock`]), serializing the
//!   read-modify-write cycle per book id
//! - **Load**: fetch the book through the store port; a missing book is a
//!   fault, not a policy outcome
//! - **Gate**: check the policy rules in order; a violation becomes a
//!   rejection outcome ([`outcome`]) before anything is mutated
//! - **Apply**: perform the state transition on the aggregate
//! - **Verify**: re-check the aggregate invariants; failure indicates a bug
//! - **Persist**: save through the store port
//!
//! # Invariants
//!
//! - Rejected operations persist nothing
//! - Policy rejections are values; faults are errors; the two never mix
//! - Operations against one book id never interleave

pub mod lock;
pub mod outcome;
pub mod service;

// Re-exports for convenience
pub use lock::{BookLockGuard, BookLockTable};
pub use outcome::{BorrowOutcome, RejectReason, ReserveOutcome, ReturnOutcome};
pub use service::{EngineError, LendingEngine};
