//! store
//!
//! Storage ports for the lending engine.
//!
//! # Architecture
//!
//! The engine never talks to a concrete backend: it sees two narrow ports,
//! [`BookStore`] and [`MemberStore`]. The stores are dumb key-value
//! containers with one derived aggregate query
//! ([`BookStore::count_by_loaned_to`], the number of books currently loaned
//! to a member). All lending policy stays on the engine side of this seam.
//!
//! Port failures are infrastructure faults ([`StoreError`]), a category kept
//! strictly separate from policy rejections: a store error propagates to the
//! caller, a rejection is an ordinary engine outcome.
//!
//! [`memory`] provides the in-memory adapters used by embedding applications
//! and throughout the test suite.

pub mod memory;

use thiserror::Error;

use crate::core::book::Book;
use crate::core::member::Member;
use crate::core::types::{BookId, MemberId};

// Re-exports for convenience
pub use memory::{InMemoryBookStore, InMemoryMemberStore};

/// Errors from storage ports.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// A store-internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Port for the book store.
///
/// `save` is an upsert and returns the stored value. Implementations must be
/// shareable across threads; the engine serializes per-book access itself.
pub trait BookStore: Send + Sync {
    /// Look up a book by id.
    fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError>;

    /// All books, in no particular order.
    fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Insert or replace a book, returning the stored value.
    fn save(&self, book: Book) -> Result<Book, StoreError>;

    /// Remove a book.
    fn delete(&self, book: &Book) -> Result<(), StoreError>;

    /// Check whether a book id is stored.
    fn exists_by_id(&self, id: &BookId) -> Result<bool, StoreError>;

    /// Number of books currently loaned to a member (the member's active
    /// loan count).
    fn count_by_loaned_to(&self, member: &MemberId) -> Result<u64, StoreError>;
}

/// Port for the member store.
pub trait MemberStore: Send + Sync {
    /// Look up a member by id.
    fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, StoreError>;

    /// Check whether a member id is stored.
    fn exists_by_id(&self, id: &MemberId) -> Result<bool, StoreError>;

    /// All members, in no particular order.
    fn find_all(&self) -> Result<Vec<Member>, StoreError>;

    /// Insert or replace a member, returning the stored value.
    fn save(&self, member: Member) -> Result<Member, StoreError>;

    /// Remove a member.
    fn delete(&self, member: &Member) -> Result<(), StoreError>;
}
