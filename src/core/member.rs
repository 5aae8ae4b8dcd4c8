//! core::member
//!
//! The member entity.
//!
//! Members carry no mutable lending state: a member's active-loan count is
//! derived by querying the book store, never stored here.

use serde::{Deserialize, Serialize};

use crate::core::types::MemberId;

/// A library member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's identity.
    pub id: MemberId,

    /// Display name.
    pub name: String,
}

impl Member {
    /// Create a member.
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
