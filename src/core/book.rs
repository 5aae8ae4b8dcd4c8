//! core::book
//!
//! The book aggregate: loan state plus the FIFO reservation queue.
//!
//! # Invariants
//!
//! - `loaned_to` is present exactly when `due_date` is present
//! - The reservation queue holds no duplicate member ids
//! - The current borrower never appears in the reservation queue
//!
//! Mutation goes through [`Book::loan_to`], [`Book::clear_loan`], and the
//! queue helpers, all of which preserve these invariants. [`Book::verify`]
//! re-checks them explicitly; the engine runs it before every persist, so a
//! violation indicates a bug rather than a policy rejection.
//!
//! # Example
//!
//! ```
//! use circulate::core::book::Book;
//! use circulate::core::types::{BookId, MemberId};
//! use chrono::NaiveDate;
//!
//! let id = BookId::new("b1").unwrap();
//! let mut book = Book::new(id, "The Pragmatic Programmer");
//! assert!(!book.is_on_loan());
//!
//! let member = MemberId::new("m1").unwrap();
//! let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! book.loan_to(member.clone(), due);
//! assert!(book.is_on_loan());
//! assert_eq!(book.loaned_to.as_ref(), Some(&member));
//! book.verify().unwrap();
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{BookId, MemberId};

/// Errors from book invariant verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookStateError {
    /// `loaned_to` and `due_date` must be set together.
    #[error("borrower and due date must be set together")]
    LoanDateMismatch,

    /// A member id appears more than once in the reservation queue.
    #[error("duplicate reservation for member {0}")]
    DuplicateReservation(MemberId),

    /// The current borrower appears in the reservation queue.
    #[error("borrower {0} appears in the reservation queue")]
    BorrowerQueued(MemberId),
}

/// A library book: identity, loan state, and reservation queue.
///
/// The queue is FIFO: insertion order is significant, and the head is the
/// next member entitled to the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// The book's identity.
    pub id: BookId,

    /// Display title.
    pub title: String,

    /// The current borrower, absent when the book is on the shelf.
    pub loaned_to: Option<MemberId>,

    /// Due date of the current loan, present iff `loaned_to` is present.
    pub due_date: Option<NaiveDate>,

    /// FIFO waitlist of members wishing to borrow the book.
    #[serde(default)]
    pub reservation_queue: Vec<MemberId>,
}

impl Book {
    /// Create an available book with an empty reservation queue.
    pub fn new(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            loaned_to: None,
            due_date: None,
            reservation_queue: Vec::new(),
        }
    }

    /// Check whether the book currently has a borrower.
    pub fn is_on_loan(&self) -> bool {
        self.loaned_to.is_some()
    }

    /// Check whether a member occupies the reservation queue.
    pub fn is_queued(&self, member: &MemberId) -> bool {
        self.reservation_queue.contains(member)
    }

    /// The member at the head of the reservation queue, if any.
    pub fn queue_head(&self) -> Option<&MemberId> {
        self.reservation_queue.first()
    }

    /// Grant the loan to a member.
    ///
    /// Sets borrower and due date together, and removes the member's queue
    /// entry if one exists (a member claiming an earned turn, or an immediate
    /// loan to someone who had reserved). Other queue entries are untouched.
    pub fn loan_to(&mut self, member: MemberId, due_date: NaiveDate) {
        self.reservation_queue.retain(|m| m != &member);
        self.loaned_to = Some(member);
        self.due_date = Some(due_date);
    }

    /// Clear the loan state, making the book available.
    pub fn clear_loan(&mut self) {
        self.loaned_to = None;
        self.due_date = None;
    }

    /// Append a member to the tail of the reservation queue.
    pub fn push_reservation(&mut self, member: MemberId) {
        self.reservation_queue.push(member);
    }

    /// Remove and return the head of the reservation queue.
    pub fn pop_reservation(&mut self) -> Option<MemberId> {
        if self.reservation_queue.is_empty() {
            None
        } else {
            Some(self.reservation_queue.remove(0))
        }
    }

    /// Check whether a loan is overdue as of the given date.
    ///
    /// An available book is never overdue.
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        matches!(self.due_date, Some(due) if due < as_of)
    }

    /// Verify the aggregate invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant:
    /// - [`BookStateError::LoanDateMismatch`] if borrower and due date disagree
    /// - [`BookStateError::DuplicateReservation`] on a repeated queue entry
    /// - [`BookStateError::BorrowerQueued`] if the borrower is also queued
    pub fn verify(&self) -> Result<(), BookStateError> {
        if self.loaned_to.is_some() != self.due_date.is_some() {
            return Err(BookStateError::LoanDateMismatch);
        }

        for (i, member) in self.reservation_queue.iter().enumerate() {
            if self.reservation_queue[..i].contains(member) {
                return Err(BookStateError::DuplicateReservation(member.clone()));
            }
        }

        if let Some(borrower) = &self.loaned_to {
            if self.reservation_queue.contains(borrower) {
                return Err(BookStateError::BorrowerQueued(borrower.clone()));
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.loaned_to {
            Some(member) => write!(
                f,
                "{} \"{}\" (loaned to {}, {} waiting)",
                self.id,
                self.title,
                member,
                self.reservation_queue.len()
            ),
            None => write!(f, "{} \"{}\" (available)", self.id, self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(s: &str) -> BookId {
        BookId::new(s).unwrap()
    }

    fn mid(s: &str) -> MemberId {
        MemberId::new(s).unwrap()
    }

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    mod loan_state {
        use super::*;

        #[test]
        fn new_book_is_available() {
            let book = Book::new(bid("b1"), "Title");
            assert!(!book.is_on_loan());
            assert!(book.loaned_to.is_none());
            assert!(book.due_date.is_none());
            assert!(book.reservation_queue.is_empty());
            book.verify().expect("fresh book is valid");
        }

        #[test]
        fn loan_to_sets_both_fields() {
            let mut book = Book::new(bid("b1"), "Title");
            book.loan_to(mid("m1"), due());
            assert!(book.is_on_loan());
            assert_eq!(book.loaned_to, Some(mid("m1")));
            assert_eq!(book.due_date, Some(due()));
            book.verify().expect("loaned book is valid");
        }

        #[test]
        fn clear_loan_clears_both_fields() {
            let mut book = Book::new(bid("b1"), "Title");
            book.loan_to(mid("m1"), due());
            book.clear_loan();
            assert!(!book.is_on_loan());
            assert!(book.due_date.is_none());
            book.verify().expect("cleared book is valid");
        }

        #[test]
        fn loan_to_removes_grantee_from_queue() {
            let mut book = Book::new(bid("b1"), "Title");
            book.push_reservation(mid("m2"));
            book.push_reservation(mid("m3"));
            book.loan_to(mid("m2"), due());
            assert_eq!(book.reservation_queue, vec![mid("m3")]);
            book.verify().expect("grantee stripped from queue");
        }
    }

    mod queue {
        use super::*;

        #[test]
        fn push_and_pop_are_fifo() {
            let mut book = Book::new(bid("b1"), "Title");
            book.push_reservation(mid("m1"));
            book.push_reservation(mid("m2"));
            assert_eq!(book.queue_head(), Some(&mid("m1")));
            assert_eq!(book.pop_reservation(), Some(mid("m1")));
            assert_eq!(book.pop_reservation(), Some(mid("m2")));
            assert_eq!(book.pop_reservation(), None);
        }

        #[test]
        fn is_queued_checks_membership() {
            let mut book = Book::new(bid("b1"), "Title");
            book.push_reservation(mid("m1"));
            assert!(book.is_queued(&mid("m1")));
            assert!(!book.is_queued(&mid("m2")));
        }
    }

    mod overdue {
        use super::*;

        #[test]
        fn available_book_is_never_overdue() {
            let book = Book::new(bid("b1"), "Title");
            assert!(!book.is_overdue(due()));
        }

        #[test]
        fn loan_is_overdue_after_due_date() {
            let mut book = Book::new(bid("b1"), "Title");
            book.loan_to(mid("m1"), due());
            assert!(!book.is_overdue(due()));
            assert!(book.is_overdue(due() + chrono::Duration::days(1)));
        }
    }

    mod verify {
        use super::*;

        #[test]
        fn borrower_without_due_date_rejected() {
            let mut book = Book::new(bid("b1"), "Title");
            book.loaned_to = Some(mid("m1"));
            assert_eq!(book.verify(), Err(BookStateError::LoanDateMismatch));
        }

        #[test]
        fn due_date_without_borrower_rejected() {
            let mut book = Book::new(bid("b1"), "Title");
            book.due_date = Some(due());
            assert_eq!(book.verify(), Err(BookStateError::LoanDateMismatch));
        }

        #[test]
        fn duplicate_queue_entry_rejected() {
            let mut book = Book::new(bid("b1"), "Title");
            book.reservation_queue = vec![mid("m1"), mid("m2"), mid("m1")];
            assert_eq!(
                book.verify(),
                Err(BookStateError::DuplicateReservation(mid("m1")))
            );
        }

        #[test]
        fn queued_borrower_rejected() {
            let mut book = Book::new(bid("b1"), "Title");
            book.loan_to(mid("m1"), due());
            book.reservation_queue.push(mid("m1"));
            assert_eq!(book.verify(), Err(BookStateError::BorrowerQueued(mid("m1"))));
        }
    }

    mod serde_format {
        use super::*;

        #[test]
        fn roundtrip() {
            let mut book = Book::new(bid("b1"), "Title");
            book.loan_to(mid("m1"), due());
            book.push_reservation(mid("m2"));

            let json = serde_json::to_string(&book).unwrap();
            let parsed: Book = serde_json::from_str(&json).unwrap();
            assert_eq!(book, parsed);
        }

        #[test]
        fn queue_defaults_to_empty() {
            let json = r#"{
                "id": "b1",
                "title": "Title",
                "loaned_to": null,
                "due_date": null
            }"#;
            let book: Book = serde_json::from_str(json).unwrap();
            assert!(book.reservation_queue.is_empty());
        }
    }
}
