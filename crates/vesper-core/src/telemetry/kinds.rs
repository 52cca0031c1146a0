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

//! Closed kind enumerations for lifecycle milestones and performance-entry
//! types. Both carry an `Invalid` sentinel so callers enumerating kinds from
//! the shared constants table have a well-defined "do nothing" value.

use serde::{Deserialize, Serialize};

/// A named, one-shot lifecycle timestamp slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    /// Session environment set up.
    Environment = 0,
    /// Runtime entry point reached.
    RuntimeStart = 1,
    /// Hosted script engine initialized.
    EngineStart = 2,
    /// Cooperative loop began running.
    LoopStart = 3,
    /// Cooperative loop exited.
    LoopExit = 4,
    /// Bootstrap finished; user code can run.
    BootstrapComplete = 5,
    /// Sentinel: not a milestone. Recording it is a no-op.
    Invalid = 6,
}

impl Milestone {
    /// Number of real milestones, excluding [`Milestone::Invalid`].
    pub const COUNT: usize = 6;

    /// Every real milestone, in slot order.
    pub const ALL: [Milestone; Milestone::COUNT] = [
        Milestone::Environment,
        Milestone::RuntimeStart,
        Milestone::EngineStart,
        Milestone::LoopStart,
        Milestone::LoopExit,
        Milestone::BootstrapComplete,
    ];

    /// The milestone's slot index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The milestone's external name.
    pub fn label(self) -> &'static str {
        match self {
            Milestone::Environment => "environment",
            Milestone::RuntimeStart => "runtimeStart",
            Milestone::EngineStart => "engineStart",
            Milestone::LoopStart => "loopStart",
            Milestone::LoopExit => "loopExit",
            Milestone::BootstrapComplete => "bootstrapComplete",
            Milestone::Invalid => "invalid",
        }
    }

    /// Maps a raw index back to a milestone. Out-of-range values map to
    /// [`Milestone::Invalid`].
    pub fn from_index(index: u32) -> Milestone {
        Milestone::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(Milestone::Invalid)
    }
}

/// The type of a completed performance entry, as observers subscribe to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// A garbage-collection cycle.
    Gc = 0,
    /// A DNS lookup.
    Dns = 1,
    /// A timed callable invocation.
    Function = 2,
    /// An HTTP exchange.
    Http = 3,
    /// A socket-level operation.
    Net = 4,
    /// A user mark.
    Mark = 5,
    /// A user measure between marks.
    Measure = 6,
    /// A resource fetch.
    Resource = 7,
    /// Sentinel: not an entry type. Carries no interest counter.
    Invalid = 8,
}

impl EntryType {
    /// Number of real entry types, excluding [`EntryType::Invalid`].
    pub const COUNT: usize = 8;

    /// Every real entry type, in counter order.
    pub const ALL: [EntryType; EntryType::COUNT] = [
        EntryType::Gc,
        EntryType::Dns,
        EntryType::Function,
        EntryType::Http,
        EntryType::Net,
        EntryType::Mark,
        EntryType::Measure,
        EntryType::Resource,
    ];

    /// The entry type's counter index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The entry type's external name.
    pub fn label(self) -> &'static str {
        match self {
            EntryType::Gc => "gc",
            EntryType::Dns => "dns",
            EntryType::Function => "function",
            EntryType::Http => "http",
            EntryType::Net => "net",
            EntryType::Mark => "mark",
            EntryType::Measure => "measure",
            EntryType::Resource => "resource",
            EntryType::Invalid => "invalid",
        }
    }

    /// Resolves an external name to an entry type. Unknown names resolve to
    /// `None` rather than [`EntryType::Invalid`] so callers can distinguish
    /// "unknown" from an explicit sentinel.
    pub fn from_label(label: &str) -> Option<EntryType> {
        EntryType::ALL.iter().copied().find(|t| t.label() == label)
    }

    /// Maps a raw index back to an entry type. Out-of-range values map to
    /// [`EntryType::Invalid`].
    pub fn from_index(index: u32) -> EntryType {
        EntryType::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(EntryType::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestone_indices_match_slot_order() {
        for (slot, milestone) in Milestone::ALL.iter().enumerate() {
            assert_eq!(milestone.index(), slot);
            assert_eq!(Milestone::from_index(slot as u32), *milestone);
        }
        assert_eq!(Milestone::Invalid.index(), Milestone::COUNT);
    }

    #[test]
    fn milestone_out_of_range_is_invalid() {
        assert_eq!(Milestone::from_index(6), Milestone::Invalid);
        assert_eq!(Milestone::from_index(u32::MAX), Milestone::Invalid);
    }

    #[test]
    fn entry_type_labels_round_trip() {
        for entry_type in EntryType::ALL {
            assert_eq!(EntryType::from_label(entry_type.label()), Some(entry_type));
        }
    }

    #[test]
    fn unknown_labels_do_not_resolve() {
        assert_eq!(EntryType::from_label("frame"), None);
        assert_eq!(EntryType::from_label(""), None);
        assert_eq!(EntryType::from_label("invalid"), None);
    }

    #[test]
    fn entry_type_out_of_range_is_invalid() {
        assert_eq!(EntryType::from_index(8), EntryType::Invalid);
        assert_eq!(EntryType::from_index(1), EntryType::Dns);
    }
}
