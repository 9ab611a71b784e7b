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

//! Abstract contracts for the subsystems the runtime owns.
//!
//! These traits are the boundary between the runtime and platform-specific
//! infrastructure. The runtime is single-threaded and cooperative, so the
//! async bring-up methods do not require `Send` futures.

use crate::input::InputEvent;
use crate::render::{RenderTarget, RendererKind, SurfaceSize};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// The closed set of subsystems whose failures the runtime tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Subsystem {
    /// Rendering surface bring-up.
    Rendering,
    /// Audio bring-up.
    Audio,
    /// Input bring-up.
    Input,
    /// Per-frame rendering of the active state.
    FrameRender,
}

impl Subsystem {
    /// Number of variants.
    pub const COUNT: usize = 4;

    /// Every variant, in bring-up order.
    pub const ALL: [Subsystem; Self::COUNT] = [
        Subsystem::Rendering,
        Subsystem::Audio,
        Subsystem::Input,
        Subsystem::FrameRender,
    ];

    /// Dense index, suitable for fixed-size tables.
    pub const fn index(self) -> usize {
        match self {
            Subsystem::Rendering => 0,
            Subsystem::Audio => 1,
            Subsystem::Input => 2,
            Subsystem::FrameRender => 3,
        }
    }

    /// Short name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Subsystem::Rendering => "rendering",
            Subsystem::Audio => "audio",
            Subsystem::Input => "input",
            Subsystem::FrameRender => "frame-render",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rendering surface the runtime draws into.
///
/// `clear` and `render_target` must be safe to call before `initialize`
/// has succeeded; a backend may hand out a no-op target in that case.
#[async_trait(?Send)]
pub trait RenderSurface {
    /// Brings the surface up. May await device or context creation.
    async fn initialize(&mut self) -> Result<()>;

    /// Clears the surface ahead of a new frame.
    fn clear(&mut self);

    /// Returns the target states draw into.
    fn render_target(&mut self) -> &mut dyn RenderTarget;

    /// Reports the renderer backing this surface.
    fn renderer_kind(&self) -> RendererKind;

    /// Switches to a cheaper quality mode, if one exists.
    fn enable_cheap_mode(&mut self);

    /// Called when the container changes size.
    fn on_resize(&mut self, size: SurfaceSize);

    /// Releases the surface.
    fn shutdown(&mut self) -> Result<()>;
}

/// The audio subsystem. Optional: the runtime continues without it.
#[async_trait(?Send)]
pub trait AudioSystem {
    /// Brings audio up. May await device negotiation.
    async fn initialize(&mut self) -> Result<()>;

    /// Releases audio resources.
    fn shutdown(&mut self) -> Result<()>;
}

/// The input subsystem. Best-effort: the runtime continues with degraded
/// input when bring-up fails.
pub trait InputSystem {
    /// Attaches device listeners.
    fn initialize(&mut self) -> Result<()>;

    /// Moves pending normalized events into `out`.
    ///
    /// Called once per frame before the active state updates.
    fn poll_events(&mut self, _out: &mut Vec<InputEvent>) {}

    /// Detaches device listeners.
    fn shutdown(&mut self) -> Result<()>;
}
