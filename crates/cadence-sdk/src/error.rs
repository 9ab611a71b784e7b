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

//! Error types surfaced by the runtime.

use cadence_core::{EngineStatus, HookPhase};
use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error carried out of screen hooks and subsystem collaborators.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A transition the state manager refused or could not complete cleanly.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// No target state was supplied.
    #[error("transition refused: no target state")]
    MissingTarget,

    /// An installed guard vetoed the transition.
    #[error("transition from '{from}' to '{to}' rejected by guard '{guard}'")]
    Rejected {
        /// Name of the current state, `<none>` before the first transition.
        from: String,
        /// Name of the refused target.
        to: String,
        /// Name the guard was installed under.
        guard: String,
    },

    /// `go_back` was called with an empty history.
    #[error("no previous state to go back to")]
    NoHistory,

    /// A lifecycle hook failed. The transition itself still completed.
    #[error("state '{state}' failed during {phase}")]
    Hook {
        /// Name of the failing state.
        state: String,
        /// Which hook failed.
        phase: HookPhase,
        /// The hook's error.
        #[source]
        source: BoxError,
    },
}

/// Errors returned by the execution engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The rendering surface could not be brought up within the retry ceiling.
    #[error("rendering unavailable after {attempts} attempt(s)")]
    RenderingUnavailable {
        /// Attempts made.
        attempts: u32,
        /// Error from the last attempt.
        #[source]
        source: BoxError,
    },

    /// The operation is not valid in the current lifecycle status.
    #[error("cannot {operation} while {status}")]
    InvalidLifecycle {
        /// The refused operation.
        operation: &'static str,
        /// Status at the time of the call.
        status: EngineStatus,
    },

    /// The supplied configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating an [`crate::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the runtime cannot work with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field, dotted for nested tables.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
