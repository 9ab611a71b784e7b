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

//! # Cadence Core
//!
//! Foundational crate containing the state lifecycle contract, the
//! collaborator traits the runtime drives (rendering, audio, input) and the
//! small vocabulary types shared by every other crate.

#![warn(missing_docs)]

pub mod input;
pub mod render;
pub mod state;
pub mod status;
pub mod subsystem;

pub use input::{InputEvent, MouseButton};
pub use render::{Color, Rect, RenderTarget, RendererKind, SurfaceSize, TextAlign, TextStyle};
pub use state::{HookPhase, Screen, State, StateId, StateRecord};
pub use status::EngineStatus;
pub use subsystem::{AudioSystem, InputSystem, RenderSurface, Subsystem};
