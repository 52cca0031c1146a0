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

//! Reentrancy-guarded timing of garbage-collection cycles.
//!
//! The hosted engine invokes the prologue/epilogue hooks from inside its own
//! collection machinery, where callbacks of different cycle kinds can nest.
//! The tracker times exactly one cycle at a time: a prologue that arrives
//! while another cycle is in flight is ignored, and an epilogue completes a
//! measurement only if its kind matches the cycle being timed.

use log;
use vesper_core::telemetry::GcKind;
use vesper_core::time::NANOS_PER_MILLI;

/// What the tracker is currently timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcPhase {
    /// No cycle is being timed.
    Idle,
    /// A cycle of the given kind started at the given monotonic reading.
    InProgress {
        /// Kind of the in-flight cycle.
        kind: GcKind,
        /// Monotonic reading at the cycle's prologue, in nanoseconds.
        start_nanos: u64,
    },
}

/// Raw timing of one completed cycle, before entry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcTiming {
    /// Monotonic reading at the prologue, in nanoseconds.
    pub start_nanos: u64,
    /// Monotonic reading at the epilogue, in nanoseconds.
    pub end_nanos: u64,
}

impl GcTiming {
    /// The cycle's duration in milliseconds.
    pub fn duration_millis(&self) -> f64 {
        self.end_nanos.saturating_sub(self.start_nanos) as f64 / NANOS_PER_MILLI
    }
}

/// The GC start/end state machine for one session.
#[derive(Debug)]
pub struct GcCycleTracker {
    phase: GcPhase,
    installed: bool,
}

impl GcCycleTracker {
    /// Creates a tracker with no hooks installed.
    pub fn new() -> Self {
        Self {
            phase: GcPhase::Idle,
            installed: false,
        }
    }

    /// Marks the engine hooks as installed and clears any stale in-flight
    /// marker. Idempotent.
    pub fn install(&mut self) {
        self.phase = GcPhase::Idle;
        if !self.installed {
            self.installed = true;
            log::trace!("GC cycle tracking installed.");
        }
    }

    /// Marks the engine hooks as removed and clears the in-flight marker.
    /// Idempotent, and safe to call even if `install` never ran; teardown
    /// paths call this unconditionally.
    pub fn remove(&mut self) {
        self.phase = GcPhase::Idle;
        if self.installed {
            self.installed = false;
            log::trace!("GC cycle tracking removed.");
        }
    }

    /// Whether hooks are currently installed.
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// The current phase, for external inspection.
    pub fn phase(&self) -> GcPhase {
        self.phase
    }

    /// Prologue hook: a cycle of `kind` is starting at `now_nanos`.
    ///
    /// Ignored while another cycle is already being timed. The in-flight
    /// start time and kind are never overwritten.
    pub fn begin(&mut self, kind: GcKind, now_nanos: u64) {
        if !self.installed {
            return;
        }
        match self.phase {
            GcPhase::Idle => {
                self.phase = GcPhase::InProgress {
                    kind,
                    start_nanos: now_nanos,
                };
            }
            GcPhase::InProgress { kind: active, .. } => {
                log::trace!(
                    "Ignoring nested GC prologue ({}) while timing a {} cycle.",
                    kind.label(),
                    active.label()
                );
            }
        }
    }

    /// Epilogue hook: a cycle of `kind` finished at `now_nanos`.
    ///
    /// Returns the cycle's timing when `kind` matches the cycle being timed;
    /// a stale or mismatched epilogue is ignored and leaves the in-flight
    /// marker untouched.
    pub fn complete(&mut self, kind: GcKind, now_nanos: u64) -> Option<GcTiming> {
        match self.phase {
            GcPhase::InProgress {
                kind: active,
                start_nanos,
            } if active == kind => {
                self.phase = GcPhase::Idle;
                Some(GcTiming {
                    start_nanos,
                    end_nanos: now_nanos,
                })
            }
            _ => None,
        }
    }
}

impl Default for GcCycleTracker {
    fn default() -> Self {
        Self::new()
    }
}
