use chrono::{DateTime, FixedOffset, Local, NaiveDate};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the host's wall clock in its local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// A clock stopped at `hour:00` UTC on an arbitrary day, or `None` for an
    /// hour outside `0..24`.
    pub fn at_hour(hour: u32) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)?.and_hms_opt(hour, 0, 0)?;
        Some(Self(naive.and_utc().fixed_offset()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
