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

//! A restart-safe periodic sampler of scheduler delay.
//!
//! The embedder arms a recurring timer at the sampler's interval and calls
//! [`IntervalHistogram::on_timer_tick`] from its callback. Each tick records
//! how late the timer actually fired relative to its ideal schedule; the
//! ideal schedule advances by exactly one interval per tick, regardless of
//! drift, so sustained delay accumulates visibly instead of being absorbed.

use std::fmt;
use std::sync::Arc;
use vesper_core::telemetry::{DeltaHistogram, TelemetryError, TelemetryResult};
use vesper_core::time::MonotonicClock;

/// Callback invoked with the updated statistics after every recorded tick.
/// Runs synchronously on the timer's cooperative turn, so it must not block.
pub type SampleFn = Box<dyn FnMut(&DeltaHistogram)>;

/// A scheduler-delay histogram fed by a recurring timer.
///
/// Owned exclusively by the caller that created it; nothing inside the
/// session keeps a reference.
pub struct IntervalHistogram {
    clock: Arc<dyn MonotonicClock>,
    interval_millis: u64,
    expected_millis: f64,
    histogram: DeltaHistogram,
    on_sample: Option<SampleFn>,
    enabled: bool,
}

impl IntervalHistogram {
    /// Creates a sampler armed at the given period.
    ///
    /// Fails with [`TelemetryError::InvalidInterval`] for a zero interval;
    /// nothing is allocated in that case. The sampler starts enabled, with
    /// the first tick expected one interval from now.
    pub fn create(
        clock: Arc<dyn MonotonicClock>,
        interval_millis: u64,
    ) -> TelemetryResult<Self> {
        if interval_millis == 0 {
            return Err(TelemetryError::InvalidInterval(interval_millis));
        }
        let expected_millis = clock.now_millis() + interval_millis as f64;
        Ok(Self {
            clock,
            interval_millis,
            expected_millis,
            histogram: DeltaHistogram::new(),
            on_sample: None,
            enabled: true,
        })
    }

    /// The sampler's period in milliseconds.
    #[inline]
    pub fn interval_millis(&self) -> u64 {
        self.interval_millis
    }

    /// Installs the per-tick observer, replacing any previous one.
    pub fn set_on_sample(&mut self, callback: impl FnMut(&DeltaHistogram) + 'static) {
        self.on_sample = Some(Box::new(callback));
    }

    /// Removes the per-tick observer.
    pub fn clear_on_sample(&mut self) {
        self.on_sample = None;
    }

    /// The per-tick unit of work: records how late the timer fired relative
    /// to the ideal schedule and advances the schedule by one interval.
    /// Returns the recorded delta in milliseconds (early fires clamp to 0).
    pub fn record_delta(&mut self) -> f64 {
        let now = self.clock.now_millis();
        let delta = (now - self.expected_millis).max(0.0);
        self.histogram.record(delta);
        self.expected_millis += self.interval_millis as f64;
        delta
    }

    /// Recurring-timer callback entry point. No-op while disabled;
    /// otherwise records the tick's delta and hands the updated statistics
    /// to the `on_sample` observer.
    pub fn on_timer_tick(&mut self) {
        if !self.enabled {
            return;
        }
        self.record_delta();
        if let Some(callback) = self.on_sample.as_mut() {
            callback(&self.histogram);
        }
    }

    /// Re-arms a disabled sampler. The next tick is expected one interval
    /// from now. Missed ticks are not caught up, and time spent disabled
    /// does not inflate the next delta. Returns whether the state changed.
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        self.expected_millis = self.clock.now_millis() + self.interval_millis as f64;
        true
    }

    /// Halts future ticks. Returns whether the state changed.
    pub fn disable(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.enabled = false;
        true
    }

    /// Whether ticks are currently being recorded.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clears the accumulated statistics. The tick schedule is unaffected.
    pub fn reset(&mut self) {
        self.histogram.reset();
    }

    /// The accumulated statistics.
    #[inline]
    pub fn histogram(&self) -> &DeltaHistogram {
        &self.histogram
    }

    /// Number of recorded ticks.
    #[inline]
    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    /// Smallest recorded delay, in milliseconds.
    #[inline]
    pub fn min(&self) -> f64 {
        self.histogram.min()
    }

    /// Largest recorded delay, in milliseconds.
    #[inline]
    pub fn max(&self) -> f64 {
        self.histogram.max()
    }

    /// Mean recorded delay, in milliseconds.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.histogram.mean()
    }

    /// Population standard deviation of the recorded delays.
    #[inline]
    pub fn stddev(&self) -> f64 {
        self.histogram.stddev()
    }
}

impl fmt::Debug for IntervalHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalHistogram")
            .field("interval_millis", &self.interval_millis)
            .field("expected_millis", &self.expected_millis)
            .field("histogram", &self.histogram)
            .field("enabled", &self.enabled)
            .field("has_on_sample", &self.on_sample.is_some())
            .finish()
    }
}

impl Drop for IntervalHistogram {
    fn drop(&mut self) {
        self.enabled = false;
        log::trace!(
            "Interval histogram released (interval {}ms, {} tick(s) recorded).",
            self.interval_millis,
            self.histogram.count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vesper_core::time::ManualClock;

    fn sampler_at(interval_millis: u64) -> (Arc<ManualClock>, IntervalHistogram) {
        let clock = Arc::new(ManualClock::new());
        let shared: Arc<dyn MonotonicClock> = clock.clone();
        let sampler = IntervalHistogram::create(shared, interval_millis)
            .expect("positive interval must be accepted");
        (clock, sampler)
    }

    #[test]
    fn zero_interval_is_rejected() {
        let clock: Arc<dyn MonotonicClock> = Arc::new(ManualClock::new());
        match IntervalHistogram::create(clock, 0) {
            Err(TelemetryError::InvalidInterval(0)) => {}
            other => panic!("Expected InvalidInterval, got {other:?}"),
        }
    }

    #[test]
    fn on_time_ticks_record_zero_delay() {
        let (clock, mut sampler) = sampler_at(1_000);

        for _ in 0..3 {
            clock.advance_millis(1_000);
            sampler.on_timer_tick();
        }

        assert_eq!(sampler.count(), 3);
        assert_eq!(sampler.min(), 0.0);
        assert_eq!(sampler.max(), 0.0);
        assert_eq!(sampler.mean(), 0.0);
    }

    #[test]
    fn a_late_tick_shows_up_in_max_and_mean() {
        let (clock, mut sampler) = sampler_at(1_000);

        // First tick fires 50ms late; the ideal schedule still advances by
        // exactly one interval, so an on-time second fire is 50ms late too;
        // make it genuinely on-schedule instead.
        clock.advance_millis(1_050);
        sampler.on_timer_tick();
        clock.advance_millis(950);
        sampler.on_timer_tick();

        assert_eq!(sampler.count(), 2);
        assert!(sampler.max() >= 50.0);
        assert!(sampler.mean() > 0.0);
        assert_eq!(sampler.min(), 0.0);
    }

    #[test]
    fn sustained_delay_accumulates_against_the_ideal_schedule() {
        let (clock, mut sampler) = sampler_at(100);

        // Every fire is 10ms later than the previous one; against a
        // monotonically advancing schedule the lag compounds.
        for tick in 1..=3u64 {
            clock.advance_millis(110);
            let delta = sampler.record_delta();
            assert_eq!(delta, 10.0 * tick as f64);
        }
    }

    #[test]
    fn early_fires_clamp_to_zero() {
        let (clock, mut sampler) = sampler_at(1_000);
        clock.advance_millis(900);
        assert_eq!(sampler.record_delta(), 0.0);
        assert_eq!(sampler.min(), 0.0);
    }

    #[test]
    fn on_sample_sees_the_updated_view_each_tick() {
        let (clock, mut sampler) = sampler_at(1_000);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        sampler.set_on_sample(move |view| sink.borrow_mut().push(view.count()));

        clock.advance_millis(1_000);
        sampler.on_timer_tick();
        clock.advance_millis(1_000);
        sampler.on_timer_tick();

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn disabled_sampler_ignores_ticks_and_reenable_restarts_cleanly() {
        let (clock, mut sampler) = sampler_at(1_000);

        assert!(sampler.disable());
        assert!(!sampler.disable(), "Second disable reports no change");

        // A long, idle gap while disabled.
        clock.advance_millis(60_000);
        sampler.on_timer_tick();
        assert_eq!(sampler.count(), 0);

        assert!(sampler.enable());
        assert!(!sampler.enable(), "Second enable reports no change");

        // Fresh schedule: an on-time tick after re-enabling reads zero, the
        // disabled gap is not charged as delay.
        clock.advance_millis(1_000);
        sampler.on_timer_tick();
        assert_eq!(sampler.count(), 1);
        assert_eq!(sampler.max(), 0.0);
    }

    #[test]
    fn reset_clears_statistics_but_keeps_the_schedule() {
        let (clock, mut sampler) = sampler_at(1_000);
        clock.advance_millis(1_200);
        sampler.on_timer_tick();
        assert_eq!(sampler.count(), 1);

        sampler.reset();
        assert_eq!(sampler.count(), 0);
        assert_eq!(sampler.max(), 0.0);

        // Next on-schedule fire still measures against the advanced schedule.
        clock.advance_millis(800);
        sampler.on_timer_tick();
        assert_eq!(sampler.count(), 1);
        assert_eq!(sampler.max(), 0.0);
    }
}
