//! store::memory
//!
//! In-memory store adapters.
//!
//! Both adapters are cheap cloneable handles over a shared map: cloning a
//! store yields a second handle to the *same* underlying data, so a test (or
//! an embedding application) can keep a handle for seeding and inspection
//! while the engine owns another.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::book::Book;
use crate::core::member::Member;
use crate::core::types::{BookId, MemberId};

use super::{BookStore, MemberStore, StoreError};

/// An in-memory book store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookStore {
    inner: Arc<RwLock<HashMap<BookId, Book>>>,
}

impl InMemoryBookStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookStore for InMemoryBookStore {
    fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn save(&self, book: Book) -> Result<Book, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(book.id.clone(), book.clone());
        Ok(book)
    }

    fn delete(&self, book: &Book) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.remove(&book.id);
        Ok(())
    }

    fn exists_by_id(&self, id: &BookId) -> Result<bool, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.contains_key(id))
    }

    fn count_by_loaned_to(&self, member: &MemberId) -> Result<u64, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .values()
            .filter(|b| b.loaned_to.as_ref() == Some(member))
            .count() as u64)
    }
}

/// An in-memory member store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberStore {
    inner: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemberStore for InMemoryMemberStore {
    fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(id).cloned())
    }

    fn exists_by_id(&self, id: &MemberId) -> Result<bool, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.contains_key(id))
    }

    fn find_all(&self) -> Result<Vec<Member>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn save(&self, member: Member) -> Result<Member, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    fn delete(&self, member: &Member) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.remove(&member.id);
        Ok(())
    }
}
