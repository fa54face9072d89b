//! Suppression rules applied to each alert before it is formatted.

use chrono::Timelike;
use std::fmt;
use std::sync::Arc;

use crate::alert::Alert;
use crate::clock::Clock;

pub const DO_NOT_SEND_RESOLVED: &str = "do_not_send_resolved";
pub const ONLY_WORKING_HOURS: &str = "only_working_hours";

/// First and last local hour (inclusive) considered working hours.
pub const WORKING_HOURS: (u32, u32) = (8, 22);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    ResolvedNotWanted,
    OutsideWorkingHours,
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuppressReason::ResolvedNotWanted => write!(f, "{}", DO_NOT_SEND_RESOLVED),
            SuppressReason::OutsideWorkingHours => write!(f, "{}", ONLY_WORKING_HOURS),
        }
    }
}

#[derive(Clone)]
pub struct SuppressionPolicy {
    clock: Arc<dyn Clock>,
}

impl SuppressionPolicy {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn should_suppress(&self, alert: &Alert) -> bool {
        self.suppress_reason(alert).is_some()
    }

    /// Returns the first rule that drops this alert, if any.
    pub fn suppress_reason(&self, alert: &Alert) -> Option<SuppressReason> {
        if alert.is_resolved() && alert.flag(DO_NOT_SEND_RESOLVED) {
            return Some(SuppressReason::ResolvedNotWanted);
        }
        if alert.flag(ONLY_WORKING_HOURS) && !self.in_working_hours() {
            return Some(SuppressReason::OutsideWorkingHours);
        }
        None
    }

    pub fn in_working_hours(&self) -> bool {
        let hour = self.clock.now().hour();
        (WORKING_HOURS.0..=WORKING_HOURS.1).contains(&hour)
    }
}
