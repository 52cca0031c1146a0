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

//! Error taxonomy for the telemetry subsystem.
//!
//! Only genuine caller mistakes and codec failures surface as errors.
//! Expected races between producers and consumers of observer interest
//! (invalid kinds, unknown entry-type names, zero interest counts,
//! mismatched GC epilogues, deferred work after teardown) are silent no-ops
//! and never construct a value of this type.

use std::fmt::Display;

/// A specialized `Result` type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// An error that can occur within the telemetry subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// A sampler was requested with a non-positive interval. Construction
    /// fails synchronously and no resource is allocated.
    InvalidInterval(u64),
    /// A snapshot blob could not be encoded or decoded.
    Snapshot(String),
}

impl Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryError::InvalidInterval(interval) => {
                write!(f, "Sampling interval must be positive, got {interval}ms")
            }
            TelemetryError::Snapshot(msg) => write!(f, "Snapshot error: {msg}"),
        }
    }
}

impl std::error::Error for TelemetryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_interval() {
        let err = TelemetryError::InvalidInterval(0);
        assert_eq!(err.to_string(), "Sampling interval must be positive, got 0ms");
    }

    #[test]
    fn display_carries_the_snapshot_message() {
        let err = TelemetryError::Snapshot("truncated blob".to_string());
        assert_eq!(err.to_string(), "Snapshot error: truncated blob");
    }
}
