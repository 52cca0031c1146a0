// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Monotonic high-resolution clocks behind a trait seam, so sessions and
//! samplers can run on deterministic time when needed.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Nanoseconds in a millisecond, as a float.
pub const NANOS_PER_MILLI: f64 = 1e6;

/// A monotonic high-resolution time source.
///
/// Readings are nanoseconds since an arbitrary fixed epoch chosen by the
/// implementation; only differences between readings are meaningful.
pub trait MonotonicClock: Debug + Send + Sync {
    /// Returns the current reading in nanoseconds since the clock's epoch.
    fn now_nanos(&self) -> u64;

    /// Returns the current reading in milliseconds since the clock's epoch.
    #[inline]
    fn now_millis(&self) -> f64 {
        self.now_nanos() as f64 / NANOS_PER_MILLI
    }
}

/// The default wall-machine clock, backed by [`std::time::Instant`].
///
/// The epoch is the instant the clock was constructed.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a new clock whose epoch is "now".
    #[inline]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }
}

/// A clock that only moves when told to.
///
/// Useful for embedders and tests that need deterministic timing; the
/// interior atomic lets a shared handle advance time while readers hold
/// `&dyn MonotonicClock`.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a new clock at reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new clock starting at the given millisecond reading.
    pub fn starting_at_millis(millis: u64) -> Self {
        Self {
            nanos: AtomicU64::new(millis * 1_000_000),
        }
    }

    /// Advances the clock by the given number of nanoseconds.
    pub fn advance_nanos(&self, nanos: u64) {
        self.nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance_nanos(millis * 1_000_000);
    }
}

impl MonotonicClock for ManualClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    const SMALL_DURATION_MS: f64 = 15.0;

    #[test]
    fn system_clock_starts_near_zero() {
        let clock = SystemClock::new();
        assert!(
            clock.now_millis() < SMALL_DURATION_MS,
            "Initial reading ({}) should be very small",
            clock.now_millis()
        );
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_nanos();
        thread::sleep(Duration::from_millis(5));
        let second = clock.now_nanos();
        assert!(
            second > first,
            "Second reading ({second}) should exceed first ({first})"
        );
    }

    #[test]
    fn manual_clock_advances_only_when_told() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_nanos(), 0);

        clock.advance_millis(250);
        assert_eq!(clock.now_nanos(), 250_000_000);
        assert_eq!(clock.now_millis(), 250.0);

        // A second read without advancing reports the same instant.
        assert_eq!(clock.now_millis(), 250.0);
    }

    #[test]
    fn manual_clock_starting_offset() {
        let clock = ManualClock::starting_at_millis(1_000);
        assert_eq!(clock.now_millis(), 1_000.0);
        clock.advance_nanos(500_000);
        assert_eq!(clock.now_millis(), 1_000.5);
    }

    #[test]
    fn shared_handles_observe_the_same_clock() {
        let clock = Arc::new(ManualClock::new());
        let shared: Arc<dyn MonotonicClock> = clock.clone();

        clock.advance_millis(30);
        assert_eq!(shared.now_millis(), 30.0);
        assert_eq!(shared.now_nanos(), clock.now_nanos());
    }
}
