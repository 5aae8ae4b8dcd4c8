//! clock
//!
//! Injected day-granularity time source.
//!
//! The engine never reads the wall clock directly: it asks a [`Clock`] for
//! "today" when stamping due dates. Production code uses [`SystemClock`];
//! tests use [`FixedClock`] to pin and advance the date deterministically.

use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, Utc};

/// A source of the current date.
pub trait Clock: Send + Sync {
    /// The current date.
    fn today(&self) -> NaiveDate;
}

/// The wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A settable clock for deterministic tests.
///
/// # Example
///
/// ```
/// use circulate::clock::{Clock, FixedClock};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let clock = FixedClock::new(date);
/// assert_eq!(clock.today(), date);
///
/// clock.advance_days(3);
/// assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
/// ```
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    /// Create a clock pinned to the given date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Pin the clock to a new date.
    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = today;
    }

    /// Move the clock forward by a number of days.
    pub fn advance_days(&self, days: u32) {
        let mut today = self.today.lock().unwrap_or_else(PoisonError::into_inner);
        *today = *today + chrono::Duration::days(i64::from(days));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
