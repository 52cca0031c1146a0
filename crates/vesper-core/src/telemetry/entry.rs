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

//! Completed-measurement records delivered to performance observers.

use crate::telemetry::gc::{GcFlags, GcKind};
use crate::telemetry::kinds::EntryType;
use serde::{Deserialize, Serialize};

/// An immutable record describing one completed timed event, delivered at
/// most once to interested observers.
///
/// Offsets and durations are milliseconds; `start_millis` is measured from
/// the session's [`TimeOrigin`](crate::time::TimeOrigin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    /// The entry's name (for GC cycles, always `"gc"`).
    pub name: String,
    /// The entry's type, as observers subscribe to it.
    pub entry_type: EntryType,
    /// Millisecond offset of the event's start from the session origin.
    pub start_millis: f64,
    /// The event's duration in milliseconds.
    pub duration_millis: f64,
    /// Type-specific detail payload, when the entry carries one.
    pub details: Option<GcDetails>,
}

impl PerformanceEntry {
    /// Creates an entry with no detail payload.
    pub fn new(
        name: impl Into<String>,
        entry_type: EntryType,
        start_millis: f64,
        duration_millis: f64,
    ) -> Self {
        Self {
            name: name.into(),
            entry_type,
            start_millis,
            duration_millis,
            details: None,
        }
    }

    /// Creates a garbage-collection entry carrying kind and flag details.
    pub fn gc(start_millis: f64, duration_millis: f64, kind: GcKind, flags: GcFlags) -> Self {
        Self {
            name: "gc".to_string(),
            entry_type: EntryType::Gc,
            start_millis,
            duration_millis,
            details: Some(GcDetails { kind, flags }),
        }
    }
}

/// Detail payload of a garbage-collection entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcDetails {
    /// The cycle kind reported by the engine.
    pub kind: GcKind,
    /// The flag bits reported by the engine.
    pub flags: GcFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_entries_carry_kind_and_flags() {
        let entry = PerformanceEntry::gc(12.5, 3.25, GcKind::Major, GcFlags::FORCED);
        assert_eq!(entry.name, "gc");
        assert_eq!(entry.entry_type, EntryType::Gc);
        assert_eq!(entry.start_millis, 12.5);
        assert_eq!(entry.duration_millis, 3.25);

        let details = entry.details.expect("GC entries carry details");
        assert_eq!(details.kind, GcKind::Major);
        assert!(details.flags.contains(GcFlags::FORCED));
    }

    #[test]
    fn plain_entries_have_no_details() {
        let entry = PerformanceEntry::new("lookup", EntryType::Dns, 1.0, 2.0);
        assert_eq!(entry.entry_type, EntryType::Dns);
        assert!(entry.details.is_none());
    }
}
