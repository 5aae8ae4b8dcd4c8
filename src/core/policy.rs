//! core::policy
//!
//! Lending policy configuration.
//!
//! # Schema
//!
//! ```toml
//! loan_days = 14
//! max_loans = 5
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: both fields must be at least 1.
//! Unknown fields are rejected so a typo cannot silently fall back to a
//! default.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default length of a loan, in days.
pub const DEFAULT_LOAN_DAYS: u32 = 14;

/// Default cap on simultaneous active loans per member.
pub const DEFAULT_MAX_LOANS: u32 = 5;

/// Errors from policy configuration.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The TOML could not be parsed.
    #[error("failed to parse policy: {0}")]
    Parse(String),

    /// A parsed value is out of range.
    #[error("invalid policy value: {0}")]
    InvalidValue(String),

    /// The policy file could not be read.
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
}

/// The lending policy: loan term and per-member loan cap.
///
/// # Example
///
/// ```
/// use circulate::core::policy::LendingPolicy;
///
/// let policy = LendingPolicy::default();
/// assert_eq!(policy.loan_days, 14);
/// assert_eq!(policy.max_loans, 5);
///
/// let custom = LendingPolicy::from_toml_str("loan_days = 7").unwrap();
/// assert_eq!(custom.loan_days, 7);
/// assert_eq!(custom.max_loans, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LendingPolicy {
    /// Length of a loan, in days.
    pub loan_days: u32,

    /// Maximum simultaneous active loans per member.
    pub max_loans: u32,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_days: DEFAULT_LOAN_DAYS,
            max_loans: DEFAULT_MAX_LOANS,
        }
    }
}

impl LendingPolicy {
    /// Validate the policy values.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidValue` if either field is zero.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.loan_days == 0 {
            return Err(PolicyError::InvalidValue(
                "loan_days must be at least 1".to_string(),
            ));
        }
        if self.max_loans == 0 {
            return Err(PolicyError::InvalidValue(
                "max_loans must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a policy from TOML text.
    ///
    /// Omitted fields take their defaults; unknown fields are rejected.
    pub fn from_toml_str(raw: &str) -> Result<Self, PolicyError> {
        let policy: Self = toml::from_str(raw).map_err(|e| PolicyError::Parse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load a policy from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Compute the due date for a loan granted today.
    pub fn due_date(&self, today: NaiveDate) -> NaiveDate {
        today + chrono::Duration::days(i64::from(self.loan_days))
    }
}
