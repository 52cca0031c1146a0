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

//! Snapshot persistence for [`TimingState`].
//!
//! The blob is a structured serialization of the two logical maps, not a raw
//! memory capture. Observer-interest counters survive a snapshot boundary
//! verbatim; milestone timestamps are session-relative and are therefore
//! reset to unset on restore, whatever the blob recorded.

use crate::state::{TimingState, UNSET_MILESTONE};
use serde::{Deserialize, Serialize};
use vesper_core::telemetry::{EntryType, Milestone, TelemetryError, TelemetryResult};

#[derive(Debug, Serialize, Deserialize)]
struct StateSnapshot {
    observers: Vec<u32>,
    milestones: Vec<f64>,
}

/// Encodes the whole timing region into an opaque blob.
pub fn serialize(state: &TimingState) -> TelemetryResult<Vec<u8>> {
    let snapshot = StateSnapshot {
        observers: state.observer_counts().to_vec(),
        milestones: state.milestones().to_vec(),
    };
    bincode::serde::encode_to_vec(&snapshot, bincode::config::standard())
        .map_err(|e| TelemetryError::Snapshot(e.to_string()))
}

/// Decodes a blob produced by [`serialize`] into a fresh timing region.
///
/// Counters are restored verbatim. The milestone array in the blob is
/// validated for shape but its values are discarded: every slot reads as
/// unset afterwards.
pub fn deserialize(blob: &[u8]) -> TelemetryResult<TimingState> {
    let (snapshot, _): (StateSnapshot, usize) =
        bincode::serde::decode_from_slice(blob, bincode::config::standard())
            .map_err(|e| TelemetryError::Snapshot(e.to_string()))?;

    if snapshot.observers.len() != EntryType::COUNT
        || snapshot.milestones.len() != Milestone::COUNT
    {
        return Err(TelemetryError::Snapshot(format!(
            "Unexpected region shape: {} observer counter(s), {} milestone slot(s)",
            snapshot.observers.len(),
            snapshot.milestones.len()
        )));
    }

    let mut observers = [0u32; EntryType::COUNT];
    observers.copy_from_slice(&snapshot.observers);

    Ok(TimingState::from_parts(
        [UNSET_MILESTONE; Milestone::COUNT],
        observers,
    ))
}
