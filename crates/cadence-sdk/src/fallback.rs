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

//! The minimal screen drawn when the active state cannot render.

use crate::config::FallbackConfig;
use cadence_core::{Color, RenderTarget, TextAlign, TextStyle};

const TITLE_SIZE_PX: f32 = 28.0;
const MESSAGE_SIZE_PX: f32 = 18.0;

/// Draws a flat background with a centered apology and recovery hint.
///
/// Uses only infallible primitives, so it cannot itself fail.
pub fn draw_fallback(target: &mut dyn RenderTarget, content: &FallbackConfig) {
    let size = target.size();
    let (cx, cy) = size.center();

    target.fill(content.background);
    target.draw_text(
        &content.title,
        cx,
        cy - TITLE_SIZE_PX,
        &TextStyle {
            size_px: TITLE_SIZE_PX,
            color: Color::WHITE,
            align: TextAlign::Center,
        },
    );
    target.draw_text(
        &content.message,
        cx,
        cy + MESSAGE_SIZE_PX,
        &TextStyle {
            size_px: MESSAGE_SIZE_PX,
            color: Color::rgb(0.75, 0.77, 0.8),
            align: TextAlign::Center,
        },
    );
}
