//! Absolute deadlines for the timed send/receive calls.
//!
//! The kernel's timed variants take an absolute `CLOCK_REALTIME` instant rather
//! than a duration. A [`Deadline`] is built from the wall clock immediately
//! before each timed call and is never reused, so a retried call cannot
//! inherit a stale deadline.

use chrono::Utc;
use nix::sys::time::TimeSpec;
use std::time::Duration;

/// An absolute wall-clock instant with whole-second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    epoch_secs: i64,
}

impl Deadline {
    /// Deadline `timeout` from now
    ///
    /// Both the current time and the timeout are truncated to whole seconds,
    /// so a one-second timeout waits somewhere between zero and one second.
    /// A zero timeout yields a deadline that has already passed, which makes
    /// the timed call a non-blocking attempt.
    pub fn after(timeout: Duration) -> Self {
        Self::from_epoch(Utc::now().timestamp(), timeout)
    }

    /// Deadline `timeout` after the given epoch second
    pub fn from_epoch(now_secs: i64, timeout: Duration) -> Self {
        let secs = i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX);
        Self {
            epoch_secs: now_secs.saturating_add(secs),
        }
    }

    /// Seconds since the Unix epoch
    pub fn epoch_secs(&self) -> i64 {
        self.epoch_secs
    }

    /// The deadline in the form the timed syscalls expect
    pub fn to_timespec(self) -> TimeSpec {
        TimeSpec::new(self.epoch_secs as libc::time_t, 0)
    }
}
