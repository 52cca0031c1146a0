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

//! Running summary statistics over recorded timing deltas.

use serde::{Deserialize, Serialize};

/// Online count/min/max/mean/stddev over a stream of recorded deltas.
///
/// Mean and variance use Welford's single-pass update, so the statistics
/// stay numerically stable under arbitrarily high sample counts. An empty
/// histogram reads zero for every statistic.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeltaHistogram {
    count: u64,
    min: f64,
    max: f64,
    mean: f64,
    m2: f64,
}

impl DeltaHistogram {
    /// Creates a new, empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one delta.
    pub fn record(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            if value < self.min {
                self.min = value;
            }
            if value > self.max {
                self.max = value;
            }
        }

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Number of deltas recorded since creation or the last reset.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Smallest recorded delta, or 0.0 when empty.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest recorded delta, or 0.0 when empty.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Mean of the recorded deltas, or 0.0 when empty.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation of the recorded deltas, or 0.0 when
    /// fewer than two deltas have been recorded.
    pub fn stddev(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }

    /// Returns every statistic to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
