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

//! The shared timing region of a session: one timestamp slot per lifecycle
//! milestone, plus one observer-interest counter per entry type.
//!
//! All mutation happens on the session's single cooperative control flow,
//! so the state is a plain owned struct with no interior locking.

use serde_json::json;
use vesper_core::telemetry::{EntryType, Milestone};

/// Value of a milestone slot that has never been recorded.
pub const UNSET_MILESTONE: f64 = -1.0;

/// Milestone timestamps and observer-interest counters for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingState {
    milestones: [f64; Milestone::COUNT],
    observers: [u32; EntryType::COUNT],
}

impl TimingState {
    /// Creates a fresh state: every milestone unset, every counter zero.
    pub fn new() -> Self {
        Self {
            milestones: [UNSET_MILESTONE; Milestone::COUNT],
            observers: [0; EntryType::COUNT],
        }
    }

    pub(crate) fn from_parts(
        milestones: [f64; Milestone::COUNT],
        observers: [u32; EntryType::COUNT],
    ) -> Self {
        Self {
            milestones,
            observers,
        }
    }

    /// Writes a milestone timestamp (milliseconds since the session origin).
    ///
    /// Last write wins; no history is kept. [`Milestone::Invalid`] is a
    /// silent no-op. Emits a best-effort instantaneous trace signal tagged
    /// with the milestone's name; the signal can never fail the call.
    pub fn mark(&mut self, milestone: Milestone, offset_millis: f64) {
        if milestone == Milestone::Invalid {
            return;
        }
        self.milestones[milestone.index()] = offset_millis;
        tracing::trace!(
            target: "vesper::milestones",
            milestone = milestone.label(),
            offset_millis,
            "milestone recorded"
        );
    }

    /// Reads one milestone slot. [`Milestone::Invalid`] reads as unset.
    pub fn milestone(&self, milestone: Milestone) -> f64 {
        if milestone == Milestone::Invalid {
            UNSET_MILESTONE
        } else {
            self.milestones[milestone.index()]
        }
    }

    /// Read-only view of the milestone slots, in [`Milestone::ALL`] order.
    pub fn milestones(&self) -> &[f64] {
        &self.milestones
    }

    /// Iterates `(milestone, recorded offset)` pairs for external inspection.
    pub fn iter_milestones(&self) -> impl Iterator<Item = (Milestone, f64)> + '_ {
        Milestone::ALL
            .iter()
            .map(move |&m| (m, self.milestones[m.index()]))
    }

    /// Returns every milestone slot to the unset state.
    pub fn reset_milestones(&mut self) {
        self.milestones = [UNSET_MILESTONE; Milestone::COUNT];
    }

    /// How many observers currently want entries of the given type.
    /// [`EntryType::Invalid`] always reads zero.
    pub fn interest_count(&self, entry_type: EntryType) -> u32 {
        if entry_type == EntryType::Invalid {
            0
        } else {
            self.observers[entry_type.index()]
        }
    }

    /// Registers one more observer interested in the given entry type.
    /// Saturating; [`EntryType::Invalid`] is a silent no-op.
    pub fn add_interest(&mut self, entry_type: EntryType) {
        if entry_type == EntryType::Invalid {
            return;
        }
        let slot = &mut self.observers[entry_type.index()];
        *slot = slot.saturating_add(1);
    }

    /// Deregisters one observer for the given entry type. Saturating at
    /// zero; [`EntryType::Invalid`] is a silent no-op.
    pub fn remove_interest(&mut self, entry_type: EntryType) {
        if entry_type == EntryType::Invalid {
            return;
        }
        let slot = &mut self.observers[entry_type.index()];
        *slot = slot.saturating_sub(1);
    }

    /// Read-only view of the interest counters, in [`EntryType::ALL`] order.
    pub fn observer_counts(&self) -> &[u32] {
        &self.observers
    }

    /// Renders the whole region as JSON for external inspection.
    pub fn inspect_json(&self) -> serde_json::Value {
        let milestones: serde_json::Map<String, serde_json::Value> = self
            .iter_milestones()
            .map(|(m, v)| (m.label().to_string(), json!(v)))
            .collect();
        let observers: serde_json::Map<String, serde_json::Value> = EntryType::ALL
            .iter()
            .map(|&t| (t.label().to_string(), json!(self.observers[t.index()])))
            .collect();
        json!({
            "milestones": milestones,
            "observers": observers,
        })
    }
}

impl Default for TimingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_unset() {
        let state = TimingState::new();
        for (_, value) in state.iter_milestones() {
            assert_eq!(value, UNSET_MILESTONE);
        }
        for &count in state.observer_counts() {
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn mark_overwrites_with_the_later_value() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();

        let mut state = TimingState::new();
        state.mark(Milestone::LoopStart, 10.0);
        assert_eq!(state.milestone(Milestone::LoopStart), 10.0);

        state.mark(Milestone::LoopStart, 25.0);
        assert_eq!(state.milestone(Milestone::LoopStart), 25.0);
    }

    #[test]
    fn mark_invalid_leaves_every_slot_unchanged() {
        let mut state = TimingState::new();
        state.mark(Milestone::Environment, 3.0);
        let before = state.clone();

        state.mark(Milestone::Invalid, 99.0);
        assert_eq!(state, before);
        assert_eq!(state.milestone(Milestone::Invalid), UNSET_MILESTONE);
    }

    #[test]
    fn interest_counts_saturate_in_both_directions() {
        let mut state = TimingState::new();
        assert_eq!(state.interest_count(EntryType::Gc), 0);

        state.add_interest(EntryType::Gc);
        state.add_interest(EntryType::Gc);
        assert_eq!(state.interest_count(EntryType::Gc), 2);

        state.remove_interest(EntryType::Gc);
        state.remove_interest(EntryType::Gc);
        state.remove_interest(EntryType::Gc);
        assert_eq!(state.interest_count(EntryType::Gc), 0);

        state.add_interest(EntryType::Invalid);
        assert_eq!(state.interest_count(EntryType::Invalid), 0);
    }

    #[test]
    fn reset_milestones_keeps_interest() {
        let mut state = TimingState::new();
        state.mark(Milestone::BootstrapComplete, 5.5);
        state.add_interest(EntryType::Http);

        state.reset_milestones();
        assert_eq!(state.milestone(Milestone::BootstrapComplete), UNSET_MILESTONE);
        assert_eq!(state.interest_count(EntryType::Http), 1);
    }

    #[test]
    fn inspect_json_names_every_kind() {
        let mut state = TimingState::new();
        state.mark(Milestone::Environment, 1.25);
        state.add_interest(EntryType::Gc);

        let dump = state.inspect_json();
        assert_eq!(dump["milestones"]["environment"], 1.25);
        assert_eq!(dump["milestones"]["loopExit"], UNSET_MILESTONE);
        assert_eq!(dump["observers"]["gc"], 1);
        assert_eq!(dump["observers"]["net"], 0);
    }
}
