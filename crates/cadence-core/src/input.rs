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

//! Normalized input events delivered to the active state.
//!
//! Device normalization happens inside the input subsystem; the runtime only
//! ever sees these backend-agnostic values.

/// An engine-internal representation of a user input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keyboard key was pressed.
    KeyPressed {
        /// A string representation of the key (e.g. `"Enter"`, `"KeyA"`).
        key: String,
    },
    /// A keyboard key was released.
    KeyReleased {
        /// A string representation of the key.
        key: String,
    },
    /// A pointer button was pressed at the given surface position.
    PointerPressed {
        /// The button that was pressed.
        button: MouseButton,
        /// Horizontal position in surface pixels.
        x: f32,
        /// Vertical position in surface pixels.
        y: f32,
    },
    /// A pointer button was released at the given surface position.
    PointerReleased {
        /// The button that was released.
        button: MouseButton,
        /// Horizontal position in surface pixels.
        x: f32,
        /// Vertical position in surface pixels.
        y: f32,
    },
    /// The pointer moved.
    PointerMoved {
        /// The new horizontal position.
        x: f32,
        /// The new vertical position.
        y: f32,
    },
    /// Committed text input (already composed by the platform).
    Text(String),
}

impl InputEvent {
    /// Convenience constructor for a key press.
    pub fn key_pressed(key: impl Into<String>) -> Self {
        Self::KeyPressed { key: key.into() }
    }

    /// Returns `true` if this is a press of the given key.
    pub fn is_key_press(&self, expected: &str) -> bool {
        matches!(self, Self::KeyPressed { key } if key == expected)
    }
}

/// An engine-internal representation of a pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The primary button (left mouse button, touch contact).
    Primary,
    /// The secondary button.
    Secondary,
    /// The middle button.
    Middle,
    /// Another button, identified by a numeric code.
    Other(u16),
}
