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

//! Core measurement types shared by the performance telemetry subsystem:
//! kind enumerations, GC cycle descriptors, completed-measurement entries,
//! and running delta statistics.

pub mod entry;
pub mod error;
pub mod gc;
pub mod histogram;
pub mod kinds;

pub use entry::{GcDetails, PerformanceEntry};
pub use error::{TelemetryError, TelemetryResult};
pub use gc::{GcFlags, GcKind};
pub use histogram::DeltaHistogram;
pub use kinds::{EntryType, Milestone};
