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

//! Frame delta clamping and the windowed frames-per-second counter.

use std::time::Duration;

/// Clamps a raw frame delta to `max_ms`, returning milliseconds.
///
/// Long stalls (backgrounded tabs, debugger pauses) otherwise make the next
/// simulation step jump arbitrarily far.
pub fn clamp_frame_delta(raw: Duration, max_ms: f32) -> f32 {
    let ms = raw.as_secs_f32() * 1000.0;
    ms.clamp(0.0, max_ms.max(0.0))
}

/// Counts frames over a fixed window and publishes the rate once per window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_ms: f32,
    frames: u32,
    elapsed_ms: f32,
    fps: f32,
}

impl FpsCounter {
    /// Creates a counter publishing every `window_ms` milliseconds.
    pub fn new(window_ms: f32) -> Self {
        Self {
            window_ms: window_ms.max(1.0),
            frames: 0,
            elapsed_ms: 0.0,
            fps: 0.0,
        }
    }

    /// Accounts for one frame lasting `dt_ms`.
    ///
    /// Returns the freshly computed rate when the window closed on this frame.
    pub fn record(&mut self, dt_ms: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms < self.window_ms {
            return None;
        }
        self.fps = self.frames as f32 * 1000.0 / self.elapsed_ms;
        self.frames = 0;
        self.elapsed_ms = 0.0;
        Some(self.fps)
    }

    /// The rate published at the end of the last complete window.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Frames accumulated in the open window.
    pub fn pending_frames(&self) -> u32 {
        self.frames
    }

    /// Forgets the published rate and the open window.
    pub fn reset(&mut self) {
        self.frames = 0;
        self.elapsed_ms = 0.0;
        self.fps = 0.0;
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1000.0)
    }
}
