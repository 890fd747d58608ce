//! Session clock: owns the simulated wall time of one session.
//!
//! Time only moves forward, so event timestamps within a session
//! are non-decreasing.

use crate::{config::IntRange, rng::SessionRng};
use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    now: NaiveDateTime,
}

impl SessionClock {
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Advance by a fixed number of seconds. Returns the new time.
    pub fn advance_secs(&mut self, secs: u64) -> NaiveDateTime {
        self.now += Duration::seconds(secs as i64);
        self.now
    }

    /// Advance by a uniform draw from `range` seconds.
    pub fn advance_random(&mut self, range: IntRange, rng: &mut SessionRng) -> NaiveDateTime {
        let secs = rng.range_inclusive(range.min, range.max);
        self.advance_secs(secs)
    }
}
