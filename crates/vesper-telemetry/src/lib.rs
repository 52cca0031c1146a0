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

//! # Vesper Telemetry
//!
//! Performance telemetry for the Vesper runtime: lifecycle milestone
//! recording, garbage-collection instrumentation, scheduler-delay sampling,
//! and interest-gated observer dispatch.
//!
//! All of it hangs off an explicitly owned [`PerfSession`]. There is no
//! process-wide singleton, so a host embedding several independent execution
//! contexts gives each one its own session.

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod gc;
pub mod interval;
pub mod session;
pub mod snapshot;
pub mod state;

pub use config::SessionConfig;
pub use interval::IntervalHistogram;
pub use session::PerfSession;
pub use state::{TimingState, UNSET_MILESTONE};
