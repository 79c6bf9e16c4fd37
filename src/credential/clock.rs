//! UTC calendar source for the daily quota reset
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Current UTC calendar date.
    fn today_utc(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today_utc(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Settable clock for tests and replay tooling.
#[derive(Debug)]
pub struct ManualClock {
    date: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.date.lock().unwrap_or_else(|e| e.into_inner()) = date;
    }

    pub fn advance_days(&self, days: u64) {
        let mut guard = self.date.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = guard.checked_add_days(chrono::Days::new(days)) {
            *guard = next;
        }
    }
}

impl Clock for ManualClock {
    fn today_utc(&self) -> NaiveDate {
        *self.date.lock().unwrap_or_else(|e| e.into_inner())
    }
}
