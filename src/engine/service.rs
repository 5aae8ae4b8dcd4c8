//! engine::service
//!
//! The lending policy engine.
//!
//! # Operation lifecycle
//!
//! Every operation follows a uniform lifecycle:
//!
//! ```text
//! Lock -> Load -> Gate -> Apply -> Verify -> Persist
//! ```
//!
//! The per-book lock is held for the whole cycle, so the effective sequence
//! of operations on one book id is linearizable. Gating checks the policy
//! rules in their specified order and turns a violation into a rejection
//! outcome before anything is mutated; a rejected operation therefore never
//! persists. Verification re-checks the aggregate invariants just before
//! persisting; a failure there is a bug, not a policy matter, and surfaces
//! as [`EngineError::Invariant`].
//!
//! # Invariants
//!
//! - A rejection leaves the book and its queue exactly as loaded
//! - A grant always sets borrower and due date together
//! - Hand-off consumes every visited queue entry and preserves the relative
//!   order of the rest

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::core::book::{Book, BookStateError};
use crate::core::policy::LendingPolicy;
use crate::core::types::{BookId, MemberId};
use crate::store::{BookStore, MemberStore, StoreError};

use super::lock::BookLockTable;
use super::outcome::{BorrowOutcome, RejectReason, ReserveOutcome, ReturnOutcome};

/// Errors from engine operations.
///
/// These are faults, kept distinct from policy rejections: a rejection is an
/// ordinary `Ok` outcome, an `EngineError` means the operation could not be
/// evaluated at all.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The book id does not resolve to a stored book.
    #[error("book not found: {0}")]
    BookNotFound(BookId),

    /// A storage port failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The mutated aggregate failed invariant verification. Indicates a bug.
    #[error("book {book} failed invariant check: {source}")]
    Invariant {
        book: BookId,
        #[source]
        source: BookStateError,
    },
}

/// The lending policy engine.
///
/// Owns the two store ports, the policy, an injected clock, and the per-book
/// lock table. All lending decisions flow through its three operations.
///
/// # Example
///
/// ```
/// use circulate::core::book::Book;
/// use circulate::core::types::{BookId, MemberId};
/// use circulate::engine::LendingEngine;
/// use circulate::store::{BookStore, InMemoryBookStore, InMemoryMemberStore};
///
/// let books = InMemoryBookStore::new();
/// let book_id = BookId::new("b1").unwrap();
/// books.save(Book::new(book_id.clone(), "A City on Mars")).unwrap();
///
/// let engine = LendingEngine::new(books, InMemoryMemberStore::new());
/// let outcome = engine.borrow_book(&book_id, &MemberId::new("m1").unwrap()).unwrap();
/// assert!(outcome.is_loaned());
/// ```
pub struct LendingEngine<B, M> {
    books: B,
    members: M,
    policy: LendingPolicy,
    clock: Arc<dyn Clock>,
    locks: BookLockTable,
}

impl<B: BookStore, M: MemberStore> LendingEngine<B, M> {
    /// Create an engine with the default policy and the system clock.
    pub fn new(books: B, members: M) -> Self {
        Self {
            books,
            members,
            policy: LendingPolicy::default(),
            clock: Arc::new(SystemClock),
            locks: BookLockTable::new(),
        }
    }

    /// Replace the lending policy.
    pub fn with_policy(mut self, policy: LendingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The active lending policy.
    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Borrow a book directly.
    ///
    /// Rules, checked in order: the book must exist; it must not already be
    /// on loan; if anyone is waiting, the caller must head the queue; the
    /// caller must be under the loan cap. A grant to the queue head consumes
    /// that head entry.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookNotFound`] for an unknown book id; store faults
    /// propagate.
    pub fn borrow_book(
        &self,
        book_id: &BookId,
        member_id: &MemberId,
    ) -> Result<BorrowOutcome, EngineError> {
        let _guard = self.locks.acquire(book_id);
        let mut book = self.load_book(book_id)?;

        if book.is_on_loan() {
            return Ok(BorrowOutcome::Rejected(self.reject(
                &book,
                member_id,
                RejectReason::BookLoaned,
            )));
        }
        if let Some(head) = book.queue_head() {
            if head != member_id {
                return Ok(BorrowOutcome::Rejected(self.reject(
                    &book,
                    member_id,
                    RejectReason::QueueExists,
                )));
            }
        }
        if self.at_loan_limit(member_id)? {
            return Ok(BorrowOutcome::Rejected(self.reject(
                &book,
                member_id,
                RejectReason::LoanLimit,
            )));
        }

        let due_date = self.policy.due_date(self.clock.today());
        book.loan_to(member_id.clone(), due_date);
        self.persist(book)?;

        info!(book = %book_id, member = %member_id, due = %due_date, "loan granted");
        Ok(BorrowOutcome::Loaned { due_date })
    }

    /// Reserve a book.
    ///
    /// Reserving an available book loans it immediately, under the same cap
    /// as a direct borrow; no queue entry is created. Reserving a loaned
    /// book appends the member to the queue tail, unless the member already
    /// occupies the queue or already borrows the book.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookNotFound`] for an unknown book id; store faults
    /// propagate.
    pub fn reserve_book(
        &self,
        book_id: &BookId,
        member_id: &MemberId,
    ) -> Result<ReserveOutcome, EngineError> {
        let _guard = self.locks.acquire(book_id);
        let mut book = self.load_book(book_id)?;

        if !book.is_on_loan() {
            if self.at_loan_limit(member_id)? {
                return Ok(ReserveOutcome::Rejected(self.reject(
                    &book,
                    member_id,
                    RejectReason::LoanLimit,
                )));
            }
            let due_date = self.policy.due_date(self.clock.today());
            book.loan_to(member_id.clone(), due_date);
            self.persist(book)?;

            info!(book = %book_id, member = %member_id, due = %due_date,
                "reservation loaned immediately");
            Ok(ReserveOutcome::Loaned { due_date })
        } else {
            if book.loaned_to.as_ref() == Some(member_id) || book.is_queued(member_id) {
                return Ok(ReserveOutcome::Rejected(self.reject(
                    &book,
                    member_id,
                    RejectReason::AlreadyReserved,
                )));
            }
            book.push_reservation(member_id.clone());
            let position = book.reservation_queue.len();
            self.persist(book)?;

            info!(book = %book_id, member = %member_id, position, "reservation queued");
            Ok(ReserveOutcome::Queued { position })
        }
    }

    /// Return a book, handing it off to the next eligible reservation.
    ///
    /// Only the current borrower may return. The queue is walked head to
    /// tail, consuming every visited entry: members that no longer exist and
    /// members at the loan cap are skipped; the first remaining candidate
    /// becomes the new borrower. With no eligible candidate the book goes
    /// back on the shelf and the consumed entries stay consumed.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookNotFound`] for an unknown book id; store faults
    /// propagate.
    pub fn return_book(
        &self,
        book_id: &BookId,
        member_id: &MemberId,
    ) -> Result<ReturnOutcome, EngineError> {
        let _guard = self.locks.acquire(book_id);
        let mut book = self.load_book(book_id)?;

        if book.loaned_to.as_ref() != Some(member_id) {
            return Ok(ReturnOutcome::Rejected(self.reject(
                &book,
                member_id,
                RejectReason::NotBorrower,
            )));
        }

        let next = self.next_eligible(&mut book)?;
        match next {
            Some(next) => {
                let due_date = self.policy.due_date(self.clock.today());
                book.loan_to(next.clone(), due_date);
                self.persist(book)?;

                info!(book = %book_id, from = %member_id, to = %next, due = %due_date,
                    "returned with hand-off");
                Ok(ReturnOutcome::HandedOff { next, due_date })
            }
            None => {
                book.clear_loan();
                self.persist(book)?;

                info!(book = %book_id, member = %member_id, "returned to shelf");
                Ok(ReturnOutcome::Shelved)
            }
        }
    }

    /// A member's active-loan count (derived from the book store).
    pub fn active_loans(&self, member_id: &MemberId) -> Result<u64, EngineError> {
        Ok(self.books.count_by_loaned_to(member_id)?)
    }

    /// All books whose loan is overdue as of the clock's today.
    pub fn overdue_loans(&self) -> Result<Vec<Book>, EngineError> {
        let today = self.clock.today();
        let mut overdue: Vec<Book> = self
            .books
            .find_all()?
            .into_iter()
            .filter(|b| b.is_overdue(today))
            .collect();
        overdue.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(overdue)
    }

    /// Walk the queue and consume entries up to the first eligible member.
    ///
    /// Eligible means: the member id resolves in the member store and the
    /// member is under the loan cap.
    fn next_eligible(&self, book: &mut Book) -> Result<Option<MemberId>, EngineError> {
        while let Some(candidate) = book.pop_reservation() {
            if !self.members.exists_by_id(&candidate)? {
                debug!(book = %book.id, member = %candidate,
                    "skipping reservation: member not found");
                continue;
            }
            if self.at_loan_limit(&candidate)? {
                debug!(book = %book.id, member = %candidate,
                    "skipping reservation: member at loan limit");
                continue;
            }
            return Ok(Some(candidate));
        }
        Ok(None)
    }

    fn at_loan_limit(&self, member_id: &MemberId) -> Result<bool, EngineError> {
        let active = self.books.count_by_loaned_to(member_id)?;
        Ok(active >= u64::from(self.policy.max_loans))
    }

    fn load_book(&self, book_id: &BookId) -> Result<Book, EngineError> {
        self.books
            .find_by_id(book_id)?
            .ok_or_else(|| EngineError::BookNotFound(book_id.clone()))
    }

    fn persist(&self, book: Book) -> Result<(), EngineError> {
        if let Err(source) = book.verify() {
            return Err(EngineError::Invariant {
                book: book.id,
                source,
            });
        }
        self.books.save(book)?;
        Ok(())
    }

    fn reject(&self, book: &Book, member_id: &MemberId, reason: RejectReason) -> RejectReason {
        debug!(book = %book.id, member = %member_id, code = reason.code(), "operation rejected");
        reason
    }
}
