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

//! Lifecycle status of the execution engine.

use serde::Serialize;
use std::fmt;

/// The externally observable lifecycle of the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EngineStatus {
    /// Built, subsystems not yet brought up.
    #[default]
    Constructed,
    /// Subsystem bring-up in progress.
    Initializing,
    /// The frame loop is scheduled and running at full quality.
    Running,
    /// The frame loop is running in the sticky reduced-quality mode.
    Degraded,
    /// The frame loop is stopped; it may be started again.
    Stopped,
    /// Mandatory subsystem bring-up failed; the loop never started.
    Failed,
    /// Subsystems torn down. Terminal.
    ShutDown,
}

impl EngineStatus {
    /// Returns `true` while the frame loop is scheduled.
    pub fn is_running(self) -> bool {
        matches!(self, EngineStatus::Running | EngineStatus::Degraded)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
