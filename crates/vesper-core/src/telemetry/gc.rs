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

//! Garbage-collection cycle kinds and flag bits, matching the hosted
//! engine's callback payloads bit-for-bit.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// The kind of a garbage-collection cycle. Values are the engine's own
/// single-bit identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GcKind {
    /// A young-generation scavenge.
    Minor = 1,
    /// A full mark-sweep-compact cycle.
    Major = 2,
    /// An incremental marking step.
    Incremental = 4,
    /// Weak-callback processing.
    WeakCallback = 8,
}

impl GcKind {
    /// The engine's bit value for this kind.
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Maps an engine bit value back to a kind.
    pub fn from_bits(bits: u32) -> Option<GcKind> {
        match bits {
            1 => Some(GcKind::Minor),
            2 => Some(GcKind::Major),
            4 => Some(GcKind::Incremental),
            8 => Some(GcKind::WeakCallback),
            _ => None,
        }
    }

    /// The kind's external name.
    pub fn label(self) -> &'static str {
        match self {
            GcKind::Minor => "minor",
            GcKind::Major => "major",
            GcKind::Incremental => "incremental",
            GcKind::WeakCallback => "weakCallback",
        }
    }
}

/// Flag bits attached to a garbage-collection cycle by the engine.
///
/// Kept as a plain `u32` newtype with associated constants; the set is
/// closed and the bit values are the engine's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GcFlags(u32);

impl GcFlags {
    /// No flags.
    pub const NONE: GcFlags = GcFlags(0);
    /// Retained-object info was constructed during the cycle.
    pub const CONSTRUCT_RETAINED: GcFlags = GcFlags(1 << 1);
    /// The cycle was explicitly forced.
    pub const FORCED: GcFlags = GcFlags(1 << 2);
    /// Phantom callbacks were processed synchronously.
    pub const SYNCHRONOUS_PHANTOM_PROCESSING: GcFlags = GcFlags(1 << 3);
    /// The engine attempted to collect all available garbage.
    pub const ALL_AVAILABLE_GARBAGE: GcFlags = GcFlags(1 << 4);
    /// The engine attempted to reclaim all external memory.
    pub const ALL_EXTERNAL_MEMORY: GcFlags = GcFlags(1 << 5);
    /// Idle-time garbage collection was scheduled.
    pub const SCHEDULE_IDLE: GcFlags = GcFlags(1 << 6);

    /// Builds flags from a raw engine value, keeping unknown bits verbatim.
    #[inline]
    pub const fn from_bits(bits: u32) -> GcFlags {
        GcFlags(bits)
    }

    /// The raw flag bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit in `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: GcFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for GcFlags {
    type Output = GcFlags;

    fn bitor(self, rhs: GcFlags) -> GcFlags {
        GcFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for GcFlags {
    fn bitor_assign(&mut self, rhs: GcFlags) {
        self.0 |= rhs.0;
    }
}
