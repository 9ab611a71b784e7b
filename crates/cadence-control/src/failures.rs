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

//! Per-subsystem failure accounting.

use cadence_core::Subsystem;
use serde::Serialize;

/// Monotonic failure counters, one per [`Subsystem`].
///
/// Counts only go down through [`FailureLedger::reset`].
#[derive(Debug, Clone, Default)]
pub struct FailureLedger {
    counts: [u32; Subsystem::COUNT],
}

impl FailureLedger {
    /// Creates a ledger with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter of `subsystem` and returns its new value.
    pub fn record(&mut self, subsystem: Subsystem) -> u32 {
        let slot = &mut self.counts[subsystem.index()];
        *slot = slot.saturating_add(1);
        log::trace!("Failure recorded for {}: {}", subsystem, *slot);
        *slot
    }

    /// Current count for `subsystem`.
    pub fn count(&self, subsystem: Subsystem) -> u32 {
        self.counts[subsystem.index()]
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        self.counts = [0; Subsystem::COUNT];
    }

    /// An owned copy of the counters.
    pub fn snapshot(&self) -> FailureCounts {
        FailureCounts {
            rendering: self.count(Subsystem::Rendering),
            audio: self.count(Subsystem::Audio),
            input: self.count(Subsystem::Input),
            frame_render: self.count(Subsystem::FrameRender),
        }
    }
}

/// A point-in-time copy of the failure counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureCounts {
    /// Failed rendering bring-up attempts.
    pub rendering: u32,
    /// Failed audio bring-ups.
    pub audio: u32,
    /// Failed input bring-ups.
    pub input: u32,
    /// Failed per-frame renders.
    pub frame_render: u32,
}

impl FailureCounts {
    /// Count for `subsystem`.
    pub fn get(&self, subsystem: Subsystem) -> u32 {
        match subsystem {
            Subsystem::Rendering => self.rendering,
            Subsystem::Audio => self.audio,
            Subsystem::Input => self.input,
            Subsystem::FrameRender => self.frame_render,
        }
    }

    /// Sum over every subsystem.
    pub fn total(&self) -> u32 {
        Subsystem::ALL.iter().map(|s| self.get(*s)).sum()
    }
}
