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

//! Drawing vocabulary shared between states and the rendering surface.

use serde::{Deserialize, Serialize};

/// A linear RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// The dark grey used behind the fallback screen.
    pub const SLATE: Color = Color::rgb(0.13, 0.14, 0.17);

    /// Creates an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with an explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The size of the drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a new surface size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scales a logical container size to physical pixels.
    ///
    /// Each dimension is rounded and never drops below one pixel, so a
    /// collapsed container still yields a drawable surface.
    pub fn from_logical(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let scale = |v: u32| ((v as f32 * ratio).round() as u32).max(1);
        Self {
            width: scale(width),
            height: scale(height),
        }
    }

    /// Returns the center point of the surface.
    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Horizontal alignment of a text run relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// The anchor is the left edge of the run.
    #[default]
    Left,
    /// The anchor is the center of the run.
    Center,
    /// The anchor is the right edge of the run.
    Right,
}

/// Styling for [`RenderTarget::draw_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Fill color.
    pub color: Color,
    /// Alignment relative to the anchor.
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 16.0,
            color: Color::WHITE,
            align: TextAlign::Left,
        }
    }
}

/// The kind of renderer backing a [`crate::RenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendererKind {
    /// Hardware-accelerated renderer with effects that can be switched off.
    Accelerated,
    /// Plain software rasterizer.
    Software,
    /// No visible output (tests, servers, capture).
    Headless,
}

impl RendererKind {
    /// Returns `true` if the renderer offers a cheaper quality mode.
    pub fn supports_cheap_mode(self) -> bool {
        matches!(self, RendererKind::Accelerated)
    }
}

/// The drawing handle a state renders into.
///
/// Primitives are infallible: a backend that cannot honour a call degrades
/// it to a no-op. This keeps the fallback screen free of failure paths.
pub trait RenderTarget {
    /// Returns the current size of the target.
    fn size(&self) -> SurfaceSize;

    /// Fills the whole target with a flat color.
    fn fill(&mut self, color: Color);

    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws a single line of text anchored at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
}
