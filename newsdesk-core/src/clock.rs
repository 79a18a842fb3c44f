//! Injected time source
//!
//! Date-window filtering and cache freshness both depend on "now", so the
//! services take a clock instead of calling `Utc::now()` inline. Tests
//! substitute a fixed clock to pin boundary behavior.

use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside of tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
