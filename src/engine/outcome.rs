//! engine::outcome
//!
//! Tagged operation outcomes.
//!
//! Policy rejections are ordinary values, not errors: callers inspect the
//! outcome instead of catching a fault. Every rejection carries a
//! [`RejectReason`] with a stable string token ([`RejectReason::code`]) for
//! logs and wire surfaces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::types::MemberId;

/// Why an operation was rejected.
///
/// Serializes as its stable code (`"BOOK_LOANED"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// The book already has a borrower.
    BookLoaned,

    /// Someone else heads the reservation queue.
    QueueExists,

    /// The member already occupies the queue, or already borrows the book.
    AlreadyReserved,

    /// The caller is not the current borrower.
    NotBorrower,

    /// The member is at the active-loan cap.
    LoanLimit,
}

impl RejectReason {
    /// The stable string token for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::BookLoaned => "BOOK_LOANED",
            RejectReason::QueueExists => "QUEUE_EXISTS",
            RejectReason::AlreadyReserved => "ALREADY_RESERVED",
            RejectReason::NotBorrower => "NOT_BORROWER",
            RejectReason::LoanLimit => "LOAN_LIMIT",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            RejectReason::BookLoaned => "book is already on loan",
            RejectReason::QueueExists => "another member heads the reservation queue",
            RejectReason::AlreadyReserved => "member already holds a reservation or the loan",
            RejectReason::NotBorrower => "caller is not the current borrower",
            RejectReason::LoanLimit => "member is at the active-loan limit",
        };
        write!(f, "{msg}")
    }
}

/// Outcome of a borrow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowOutcome {
    /// The loan was granted.
    Loaned {
        /// Due date of the new loan.
        due_date: NaiveDate,
    },

    /// The borrow was rejected by policy.
    Rejected(RejectReason),
}

impl BorrowOutcome {
    /// Whether the loan was granted.
    pub fn is_loaned(&self) -> bool {
        matches!(self, BorrowOutcome::Loaned { .. })
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            BorrowOutcome::Rejected(reason) => Some(*reason),
            BorrowOutcome::Loaned { .. } => None,
        }
    }
}

/// Outcome of a reserve operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The book was available, so reserving loaned it immediately.
    Loaned {
        /// Due date of the new loan.
        due_date: NaiveDate,
    },

    /// The member joined the reservation queue.
    Queued {
        /// 1-based position in the queue after joining.
        position: usize,
    },

    /// The reservation was rejected by policy.
    Rejected(RejectReason),
}

impl ReserveOutcome {
    /// Whether the reservation was accepted (immediate loan or queued).
    pub fn is_accepted(&self) -> bool {
        !matches!(self, ReserveOutcome::Rejected(_))
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ReserveOutcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Outcome of a return operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// The book went straight to the next eligible reserved member.
    HandedOff {
        /// The new borrower.
        next: MemberId,
        /// Due date of the new loan.
        due_date: NaiveDate,
    },

    /// No eligible reservation; the book is back on the shelf.
    Shelved,

    /// The return was rejected by policy.
    Rejected(RejectReason),
}

impl ReturnOutcome {
    /// Whether the return was accepted.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, ReturnOutcome::Rejected(_))
    }

    /// The new borrower after a hand-off, if any.
    pub fn next_member(&self) -> Option<&MemberId> {
        match self {
            ReturnOutcome::HandedOff { next, .. } => Some(next),
            _ => None,
        }
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ReturnOutcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}
