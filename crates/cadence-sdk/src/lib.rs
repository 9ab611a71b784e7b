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

//! The public-facing runtime for Cadence applications.
//!
//! An application supplies a rendering surface (plus optional audio and
//! input), a factory for its safe default state, and then drives the
//! [`Engine`] once per frame from its host loop.

pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
mod panic_guard;
pub mod state_manager;

pub use config::{EngineConfig, FallbackConfig, SurfaceConfig};
pub use engine::{Engine, ResizeHandle, StateRequest, StateRequester, Subsystems};
pub use error::{BoxError, ConfigError, EngineError, TransitionError};
pub use state_manager::{StateManager, DEFAULT_HISTORY_CAPACITY};

pub mod prelude {
    //! The types most applications need.
    pub use crate::{Engine, EngineConfig, EngineError, StateRequester, Subsystems};
    pub use cadence_core::{
        AudioSystem, Color, EngineStatus, InputEvent, InputSystem, Rect, RenderSurface,
        RenderTarget, RendererKind, Screen, State, SurfaceSize, TextAlign, TextStyle,
    };
    pub use cadence_telemetry::{init_logging, EngineStats};
}
