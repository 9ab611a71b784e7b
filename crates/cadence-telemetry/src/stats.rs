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

//! Serializable snapshot of the execution engine.

use anyhow::Result;
use cadence_control::FailureCounts;
use cadence_core::EngineStatus;
use serde::Serialize;
use std::fmt;

/// A point-in-time view of the engine, suitable for export.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// Lifecycle status at capture time.
    pub status: EngineStatus,
    /// Frames processed since the loop first started.
    pub frame_index: u64,
    /// Rate published at the end of the last FPS window.
    pub current_fps: f32,
    /// Rate the engine currently aims for.
    pub target_fps: f32,
    /// Mean over the retained frame-time window.
    pub average_frame_time_ms: f32,
    /// Standard deviation of the retained frame times.
    pub frame_jitter_ms: f32,
    /// Slowest retained frame.
    pub worst_frame_time_ms: f32,
    /// Whether the sticky degraded mode is on.
    pub degraded: bool,
    /// Per-subsystem failure counters.
    pub failures: FailureCounts,
    /// Loop-level failures caught at the tick boundary.
    pub loop_errors: u64,
}

impl EngineStats {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compact one-line summary for periodic logging.
    pub fn summary_line(&self) -> String {
        format!(
            "{} | fps {:.1}/{:.0} | avg {:.2} ms ±{:.2} (worst {:.2}) | frame {} | failures {}{}",
            self.status,
            self.current_fps,
            self.target_fps,
            self.average_frame_time_ms,
            self.frame_jitter_ms,
            self.worst_frame_time_ms,
            self.frame_index,
            self.failures.total(),
            if self.degraded { " | degraded" } else { "" },
        )
    }
}

impl fmt::Display for EngineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_line())
    }
}
