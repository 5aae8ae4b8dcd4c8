//! core::types
//!
//! Strong identifier types for the lending domain.
//!
//! # Types
//!
//! - [`BookId`] - Validated book identifier
//! - [`MemberId`] - Validated member identifier
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use circulate::core::types::{BookId, MemberId};
//!
//! // Valid constructions
//! let book = BookId::new("b1").unwrap();
//! let member = MemberId::new("m42").unwrap();
//! assert_eq!(book.as_str(), "b1");
//! assert_eq!(member.as_str(), "m42");
//!
//! // Invalid constructions fail at creation time
//! assert!(BookId::new("").is_err());
//! assert!(MemberId::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of an identifier, in characters.
const MAX_ID_LEN: usize = 64;

/// Errors from identifier validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid book id: {0}")]
    InvalidBookId(String),

    #[error("invalid member id: {0}")]
    InvalidMemberId(String),
}

/// Validate an identifier against the shared id rules.
///
/// Identifiers cannot be empty, cannot exceed [`MAX_ID_LEN`] characters, and
/// cannot contain whitespace or control characters.
fn validate_id(raw: &str) -> Result<(), String> {
    if raw.is_empty() {
        return Err("id cannot be empty".into());
    }
    if raw.chars().count() > MAX_ID_LEN {
        return Err(format!("id cannot exceed {MAX_ID_LEN} characters"));
    }
    for c in raw.chars() {
        if c.is_whitespace() {
            return Err("id cannot contain whitespace".into());
        }
        if c.is_control() {
            return Err("id cannot contain control characters".into());
        }
    }
    Ok(())
}

/// A validated book identifier.
///
/// # Example
///
/// ```
/// use circulate::core::types::BookId;
///
/// let id = BookId::new("b1").unwrap();
/// assert_eq!(id.as_str(), "b1");
///
/// assert!(BookId::new("").is_err());
/// assert!(BookId::new("b\t1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    /// Create a new validated book id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBookId` if the id violates the id rules.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_id(&id).map_err(TypeError::InvalidBookId)?;
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BookId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated member identifier.
///
/// # Example
///
/// ```
/// use circulate::core::types::MemberId;
///
/// let id = MemberId::new("m1").unwrap();
/// assert_eq!(id.as_str(), "m1");
///
/// assert!(MemberId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Create a new validated member id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidMemberId` if the id violates the id rules.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_id(&id).map_err(TypeError::InvalidMemberId)?;
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MemberId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
