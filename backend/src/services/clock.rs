//! Wall clock used for "same calendar day" decisions.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now". Day comparisons use the server's local calendar.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Local calendar date of a stored timestamp.
pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}
