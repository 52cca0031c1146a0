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

//! The constants table exposed to calling code: GC kind bits, GC flag bits,
//! and the index of every entry type and milestone. Callers that enumerate
//! kinds do it from this table rather than hard-coding values.

use std::collections::BTreeMap;
use vesper_core::telemetry::{EntryType, GcFlags, GcKind, Milestone};

/// Builds the full constants table.
pub fn constants() -> BTreeMap<&'static str, u32> {
    let mut table = BTreeMap::new();

    table.insert("GC_MINOR", GcKind::Minor.bits());
    table.insert("GC_MAJOR", GcKind::Major.bits());
    table.insert("GC_INCREMENTAL", GcKind::Incremental.bits());
    table.insert("GC_WEAK_CALLBACK", GcKind::WeakCallback.bits());

    table.insert("GC_FLAGS_NO", GcFlags::NONE.bits());
    table.insert(
        "GC_FLAGS_CONSTRUCT_RETAINED",
        GcFlags::CONSTRUCT_RETAINED.bits(),
    );
    table.insert("GC_FLAGS_FORCED", GcFlags::FORCED.bits());
    table.insert(
        "GC_FLAGS_SYNCHRONOUS_PHANTOM_PROCESSING",
        GcFlags::SYNCHRONOUS_PHANTOM_PROCESSING.bits(),
    );
    table.insert(
        "GC_FLAGS_ALL_AVAILABLE_GARBAGE",
        GcFlags::ALL_AVAILABLE_GARBAGE.bits(),
    );
    table.insert(
        "GC_FLAGS_ALL_EXTERNAL_MEMORY",
        GcFlags::ALL_EXTERNAL_MEMORY.bits(),
    );
    table.insert("GC_FLAGS_SCHEDULE_IDLE", GcFlags::SCHEDULE_IDLE.bits());

    table.insert("ENTRY_TYPE_GC", EntryType::Gc.index() as u32);
    table.insert("ENTRY_TYPE_DNS", EntryType::Dns.index() as u32);
    table.insert("ENTRY_TYPE_FUNCTION", EntryType::Function.index() as u32);
    table.insert("ENTRY_TYPE_HTTP", EntryType::Http.index() as u32);
    table.insert("ENTRY_TYPE_NET", EntryType::Net.index() as u32);
    table.insert("ENTRY_TYPE_MARK", EntryType::Mark.index() as u32);
    table.insert("ENTRY_TYPE_MEASURE", EntryType::Measure.index() as u32);
    table.insert("ENTRY_TYPE_RESOURCE", EntryType::Resource.index() as u32);
    table.insert("ENTRY_TYPE_INVALID", EntryType::Invalid.index() as u32);

    table.insert("MILESTONE_ENVIRONMENT", Milestone::Environment.index() as u32);
    table.insert(
        "MILESTONE_RUNTIME_START",
        Milestone::RuntimeStart.index() as u32,
    );
    table.insert(
        "MILESTONE_ENGINE_START",
        Milestone::EngineStart.index() as u32,
    );
    table.insert("MILESTONE_LOOP_START", Milestone::LoopStart.index() as u32);
    table.insert("MILESTONE_LOOP_EXIT", Milestone::LoopExit.index() as u32);
    table.insert(
        "MILESTONE_BOOTSTRAP_COMPLETE",
        Milestone::BootstrapComplete.index() as u32,
    );
    table.insert("MILESTONE_INVALID", Milestone::Invalid.index() as u32);

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_values_match_the_engine_bit_assignments() {
        let table = constants();
        assert_eq!(table["GC_MINOR"], 1);
        assert_eq!(table["GC_MAJOR"], 2);
        assert_eq!(table["GC_INCREMENTAL"], 4);
        assert_eq!(table["GC_WEAK_CALLBACK"], 8);

        assert_eq!(table["GC_FLAGS_NO"], 0);
        assert_eq!(table["GC_FLAGS_CONSTRUCT_RETAINED"], 2);
        assert_eq!(table["GC_FLAGS_FORCED"], 4);
        assert_eq!(table["GC_FLAGS_SYNCHRONOUS_PHANTOM_PROCESSING"], 8);
        assert_eq!(table["GC_FLAGS_ALL_AVAILABLE_GARBAGE"], 16);
        assert_eq!(table["GC_FLAGS_ALL_EXTERNAL_MEMORY"], 32);
        assert_eq!(table["GC_FLAGS_SCHEDULE_IDLE"], 64);
    }

    #[test]
    fn sentinel_indices_close_the_enumerations() {
        let table = constants();
        assert_eq!(table["ENTRY_TYPE_INVALID"], EntryType::COUNT as u32);
        assert_eq!(table["MILESTONE_INVALID"], Milestone::COUNT as u32);
    }

    #[test]
    fn indices_round_trip_through_the_kind_enums() {
        let table = constants();
        assert_eq!(
            EntryType::from_index(table["ENTRY_TYPE_FUNCTION"]),
            EntryType::Function
        );
        assert_eq!(
            Milestone::from_index(table["MILESTONE_LOOP_EXIT"]),
            Milestone::LoopExit
        );
    }
}
