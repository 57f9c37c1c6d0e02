//! Time source and calendar-day arithmetic.
//!
//! Check-in deduplication works on the event-local calendar date, not on a
//! rolling 24 hour window. Two scans a minute apart across local midnight
//! fall on different days.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The calendar date of `instant` in the event's time zone.
pub fn local_day(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// The UTC instant at which the local day containing `instant` began.
pub fn local_day_start(instant: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = local_day(instant, offset).and_time(NaiveTime::MIN);
    (local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

pub fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>, offset: FixedOffset) -> bool {
    local_day(a, offset) == local_day(b, offset)
}

#[cfg(any(test, feature = "test-utils"))]
pub use fixed::FixedClock;

#[cfg(any(test, feature = "test-utils"))]
mod fixed {
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{DateTime, TimeDelta, Utc};

    use super::Clock;

    /// A clock that only moves when told to.
    #[derive(Debug)]
    pub struct FixedClock {
        millis: AtomicI64,
    }

    impl FixedClock {
        pub fn new(at: DateTime<Utc>) -> Self {
            Self {
                millis: AtomicI64::new(at.timestamp_millis()),
            }
        }

        pub fn set(&self, at: DateTime<Utc>) {
            self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
        }

        pub fn advance(&self, by: TimeDelta) {
            self.millis
                .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
        }
    }
}
