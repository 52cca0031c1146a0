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

//! The fixed reference instant all reported offsets are measured from.

use crate::time::clock::{MonotonicClock, NANOS_PER_MILLI};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// An immutable (monotonic reading, wall-clock timestamp) pair captured once
/// per session.
///
/// Every millisecond offset reported to observers is measured against the
/// monotonic half; the wall-clock half exists so external consumers can
/// anchor those offsets to calendar time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOrigin {
    origin_nanos: u64,
    wall_clock_millis: f64,
}

impl TimeOrigin {
    /// Captures the origin from the given monotonic clock and the system
    /// wall clock.
    pub fn capture(clock: &dyn MonotonicClock) -> Self {
        let wall_clock_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1_000.0)
            .unwrap_or(0.0);
        Self {
            origin_nanos: clock.now_nanos(),
            wall_clock_millis,
        }
    }

    /// The monotonic reading at the origin, in nanoseconds.
    #[inline]
    pub fn origin_nanos(&self) -> u64 {
        self.origin_nanos
    }

    /// The monotonic reading at the origin, in milliseconds.
    #[inline]
    pub fn origin_millis(&self) -> f64 {
        self.origin_nanos as f64 / NANOS_PER_MILLI
    }

    /// The wall-clock timestamp at the origin, in milliseconds since the
    /// Unix epoch.
    #[inline]
    pub fn wall_clock_millis(&self) -> f64 {
        self.wall_clock_millis
    }

    /// Converts an absolute monotonic reading to a millisecond offset from
    /// the origin. Readings taken before the origin clamp to zero.
    #[inline]
    pub fn offset_millis(&self, now_nanos: u64) -> f64 {
        now_nanos.saturating_sub(self.origin_nanos) as f64 / NANOS_PER_MILLI
    }
}
