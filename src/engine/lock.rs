//! engine::lock
//!
//! Per-book serialization for lending operations.
//!
//! # Architecture
//!
//! Every lending operation is a read-modify-write cycle on a shared book
//! aggregate. Two concurrent operations against the same book id must not
//! interleave their read and write phases, or one update is lost. The lock
//! table hands out an exclusive guard per book id; operations against
//! distinct ids proceed independently.
//!
//! # Invariants
//!
//! - The guard must be held for the entire load-mutate-persist cycle
//! - The guard is released on drop (RAII pattern)
//! - [`BookLockTable::acquire`] blocks until the id is free;
//!   [`BookLockTable::try_acquire`] fails fast with `None`
//!
//! # Example
//!
//! ```
//! use circulate::engine::lock::BookLockTable;
//! use circulate::core::types::BookId;
//!
//! let table = BookLockTable::new();
//! let id = BookId::new("b1").unwrap();
//!
//! let guard = table.acquire(&id);
//! assert!(table.try_acquire(&id).is_none());
//!
//! drop(guard);
//! assert!(table.try_acquire(&id).is_some());
//! ```

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};

use crate::core::types::BookId;

/// An in-process lock table keyed by book id.
#[derive(Debug, Default)]
pub struct BookLockTable {
    held: Mutex<HashSet<BookId>>,
    released: Condvar,
}

impl BookLockTable {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a book id, blocking until it is free.
    ///
    /// An operation holds exactly one lock at a time, so lock order cannot
    /// deadlock.
    pub fn acquire(&self, id: &BookId) -> BookLockGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(id) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(id.clone());
        BookLockGuard {
            table: self,
            id: id.clone(),
        }
    }

    /// Acquire the lock for a book id, returning `None` if it is held.
    pub fn try_acquire(&self, id: &BookId) -> Option<BookLockGuard<'_>> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if held.contains(id) {
            return None;
        }
        held.insert(id.clone());
        Some(BookLockGuard {
            table: self,
            id: id.clone(),
        })
    }

    /// Check whether a book id is currently locked.
    pub fn is_held(&self, id: &BookId) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }
}

/// An exclusive lock on one book id.
///
/// The lock is released when this guard is dropped.
#[derive(Debug)]
pub struct BookLockGuard<'a> {
    table: &'a BookLockTable,
    id: BookId,
}

impl BookLockGuard<'_> {
    /// The locked book id.
    pub fn id(&self) -> &BookId {
        &self.id
    }
}

impl Drop for BookLockGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .table
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.id);
        self.table.released.notify_all();
    }
}
