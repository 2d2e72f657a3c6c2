//! Calendar clock abstraction
//!
//! Day rollover and streak logic depend on "today", so the clock is injected
//! rather than read from ambient globals. Tests pin it to a fixed date.

use std::sync::Mutex;

use chrono::{Local, NaiveDate, Utc};

/// Source of the current calendar date and timestamp
pub trait Clock: Send + Sync {
    /// Current calendar date (no time component)
    fn today(&self) -> NaiveDate;

    /// Current timestamp in milliseconds since the epoch
    fn now_ms(&self) -> i64;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Wall-clock implementation used by the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock for tests; the date can be advanced mid-test
pub struct FixedClock {
    state: Mutex<(NaiveDate, i64)>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            state: Mutex::new((date, 0)),
        }
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.state.lock().expect("clock lock").0 = date;
    }

    /// Move the date forward by `days`
    pub fn advance_days(&self, days: i64) {
        let mut state = self.state.lock().expect("clock lock");
        state.0 = state.0 + chrono::Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.state.lock().expect("clock lock").0
    }

    fn now_ms(&self) -> i64 {
        self.state.lock().expect("clock lock").1
    }
}
