//! Calendar-day clock abstraction.
//!
//! "Same day" everywhere in yinian means the same local calendar day, not a
//! rolling 24-hour window. The engine takes a `&dyn Clock` so reconciliation
//! tests can pin the date.

use chrono::{Local, NaiveDate};

pub trait Clock {
    /// Today's date in the local timezone, truncated to day granularity.
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Fixed-date clock for tests and day-rollover simulations.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
