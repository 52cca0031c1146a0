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

//! The per-session telemetry context.
//!
//! A [`PerfSession`] owns every piece of the subsystem's state: clock,
//! origin, the shared timing region, the GC tracker, the deferred ready
//! queue, and the observer dispatcher. Hosts that run several independent
//! execution contexts construct one session per context; nothing here is
//! process-global.

use crate::config::SessionConfig;
use crate::dispatch::ObserverDispatch;
use crate::gc::GcCycleTracker;
use crate::interval::IntervalHistogram;
use crate::snapshot;
use crate::state::TimingState;
use std::sync::Arc;
use uuid::Uuid;
use vesper_core::event::DeferredQueue;
use vesper_core::telemetry::{
    EntryType, GcFlags, GcKind, Milestone, PerformanceEntry, TelemetryResult,
};
use vesper_core::time::{MonotonicClock, SystemClock, TimeOrigin};

/// The performance telemetry context for one execution session.
#[derive(Debug)]
pub struct PerfSession {
    id: Uuid,
    clock: Arc<dyn MonotonicClock>,
    origin: TimeOrigin,
    state: TimingState,
    gc: GcCycleTracker,
    deferred: DeferredQueue<PerformanceEntry>,
    dispatch: ObserverDispatch,
}

impl PerfSession {
    /// Creates a session on the system clock. The origin is fixed here and
    /// never moves for the session's lifetime.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Creates a session on the given clock.
    pub fn with_clock(clock: Arc<dyn MonotonicClock>) -> Self {
        let origin = TimeOrigin::capture(clock.as_ref());
        let id = Uuid::new_v4();
        log::info!(
            "Performance session {id} started (wall-clock origin {:.3}ms).",
            origin.wall_clock_millis()
        );
        Self {
            id,
            clock,
            origin,
            state: TimingState::new(),
            gc: GcCycleTracker::new(),
            deferred: DeferredQueue::new(),
            dispatch: ObserverDispatch::new(),
        }
    }

    /// Creates a session on the given clock and applies a boot
    /// configuration: GC tracking installation and seeded observer
    /// interest. Interest labels that do not name an entry type are ignored
    /// with a warning.
    pub fn with_config(clock: Arc<dyn MonotonicClock>, config: &SessionConfig) -> Self {
        let mut session = Self::with_clock(clock);
        if config.track_gc {
            session.install_gc_tracking();
        }
        for (label, count) in &config.observer_interest {
            match EntryType::from_label(label) {
                Some(entry_type) => {
                    for _ in 0..*count {
                        session.add_interest(entry_type);
                    }
                }
                None => {
                    log::warn!("Ignoring configured interest for unknown entry type {label:?}.");
                }
            }
        }
        session
    }

    /// Creates a session from a snapshot blob: observer-interest counters
    /// are restored verbatim, milestones start unset, and a fresh origin is
    /// captured from `clock`.
    pub fn restore(blob: &[u8], clock: Arc<dyn MonotonicClock>) -> TelemetryResult<Self> {
        let state = snapshot::deserialize(blob)?;
        let mut session = Self::with_clock(clock);
        session.state = state;
        Ok(session)
    }

    /// The session's unique id, as it appears in log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The session's fixed time origin.
    pub fn origin(&self) -> &TimeOrigin {
        &self.origin
    }

    /// Read-only view of the shared timing region (milestone slots and
    /// observer-interest counters).
    pub fn state(&self) -> &TimingState {
        &self.state
    }

    // --- Milestones -------------------------------------------------------

    /// Records a lifecycle milestone at the current clock reading.
    ///
    /// Recording the same milestone twice overwrites with the later
    /// timestamp. [`Milestone::Invalid`] is a silent no-op: callers
    /// enumerate kinds from the shared constants table, and an invalid value
    /// means "do nothing" rather than a bug.
    pub fn record_milestone(&mut self, milestone: Milestone) {
        let offset = self.origin.offset_millis(self.clock.now_nanos());
        self.state.mark(milestone, offset);
    }

    /// Records the bootstrap-complete milestone.
    pub fn mark_bootstrap_complete(&mut self) {
        self.record_milestone(Milestone::BootstrapComplete);
    }

    // --- Observer interest and dispatch -----------------------------------

    /// Registers one more observer interested in the given entry type.
    pub fn add_interest(&mut self, entry_type: EntryType) {
        self.state.add_interest(entry_type);
    }

    /// Deregisters one observer for the given entry type.
    pub fn remove_interest(&mut self, entry_type: EntryType) {
        self.state.remove_interest(entry_type);
    }

    /// Registers the observer callback, silently replacing any previous one.
    pub fn set_observer_callback(&mut self, callback: impl FnMut(&PerformanceEntry) + 'static) {
        self.dispatch.set_callback(callback);
    }

    /// Removes the observer callback.
    pub fn clear_observer_callback(&mut self) {
        self.dispatch.clear_callback();
    }

    /// Delivers an externally built entry to the observer, synchronously,
    /// if its type resolves and carries nonzero interest. Returns whether
    /// the callback was invoked.
    pub fn notify(&mut self, type_label: &str, entry: &PerformanceEntry) -> bool {
        self.dispatch.notify(&self.state, type_label, entry)
    }

    // --- GC instrumentation ------------------------------------------------

    /// Installs GC cycle tracking. The embedder wires the engine's
    /// prologue/epilogue callbacks to [`gc_prologue`](Self::gc_prologue) and
    /// [`gc_epilogue`](Self::gc_epilogue) while tracking is installed.
    /// Idempotent.
    pub fn install_gc_tracking(&mut self) {
        self.gc.install();
    }

    /// Removes GC cycle tracking and clears the in-flight marker.
    /// Idempotent, and safe to call even if tracking was never installed.
    pub fn remove_gc_tracking(&mut self) {
        self.gc.remove();
    }

    /// Whether GC cycle tracking is currently installed.
    pub fn gc_tracking_installed(&self) -> bool {
        self.gc.is_installed()
    }

    /// Engine prologue event: a GC cycle of `kind` is starting.
    pub fn gc_prologue(&mut self, kind: GcKind) {
        let now = self.clock.now_nanos();
        self.gc.begin(kind, now);
    }

    /// Engine epilogue event: a GC cycle of `kind` finished.
    ///
    /// When the epilogue matches the cycle being timed and someone is
    /// interested in GC entries, builds the measurement and posts it to the
    /// deferred queue. Delivery never happens inline here, because the
    /// engine is still inside its collection machinery. With zero interest
    /// no entry is built at all.
    pub fn gc_epilogue(&mut self, kind: GcKind, flags: GcFlags) {
        let now = self.clock.now_nanos();
        let Some(timing) = self.gc.complete(kind, now) else {
            return;
        };
        if self.state.interest_count(EntryType::Gc) == 0 {
            return;
        }
        let entry = PerformanceEntry::gc(
            self.origin.offset_millis(timing.start_nanos),
            timing.duration_millis(),
            kind,
            flags,
        );
        self.deferred.post(entry);
    }

    /// Number of entries waiting for the next deferred turn.
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Drains the deferred queue on a safe cooperative turn, pushing each
    /// queued entry through the normal notify path. Interest is re-checked
    /// at delivery time; an observer that deregistered in the meantime
    /// turns the delivery into a no-op. Returns the number of entries the
    /// observer actually received.
    pub fn run_deferred(&mut self) -> usize {
        let mut delivered = 0;
        for entry in self.deferred.drain() {
            let label = entry.entry_type.label();
            if self.dispatch.notify(&self.state, label, &entry) {
                delivered += 1;
            }
        }
        delivered
    }

    // --- Sampling ----------------------------------------------------------

    /// Creates a scheduler-delay sampler on this session's clock. The
    /// sampler is owned by the caller; see [`IntervalHistogram`].
    pub fn create_interval_histogram(
        &self,
        interval_millis: u64,
    ) -> TelemetryResult<IntervalHistogram> {
        IntervalHistogram::create(Arc::clone(&self.clock), interval_millis)
    }

    // --- Snapshot persistence ----------------------------------------------

    /// Encodes the shared timing region into an opaque blob.
    pub fn serialize(&self) -> TelemetryResult<Vec<u8>> {
        snapshot::serialize(&self.state)
    }

    /// Replaces the shared timing region from a blob: counters verbatim,
    /// milestones reset to unset. Fails without mutating anything if the
    /// blob does not decode.
    pub fn deserialize(&mut self, blob: &[u8]) -> TelemetryResult<()> {
        self.state = snapshot::deserialize(blob)?;
        Ok(())
    }
}

impl Default for PerfSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PerfSession {
    fn drop(&mut self) {
        let pending = self.deferred.clear();
        if pending > 0 {
            log::trace!(
                "Performance session {} ended with {pending} undelivered entries.",
                self.id
            );
        }
    }
}
