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

//! The lifecycle contract every screen or mode of the application follows.
//!
//! A [`Screen`] supplies the behaviour; a [`State`] wraps it with the activity
//! gate and timing bookkeeping, so every screen gets the same guarantees:
//!
//! * `update`, `render` and `handle_input` are no-ops outside the window
//!   between `enter` and `exit`;
//! * `exit` clears the activity flag *before* the teardown hook runs, so
//!   anything the hook triggers already observes the state as inactive.

use crate::input::InputEvent;
use crate::render::RenderTarget;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static NEXT_STATE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a constructed [`State`] instance.
///
/// Two states built from the same screen type still get distinct ids; the
/// state manager compares history entries by this identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(u64);

impl StateId {
    fn next() -> Self {
        Self(NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The lifecycle phase a hook belongs to, used when reporting hook failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HookPhase {
    /// `Screen::on_enter`.
    Enter,
    /// `Screen::on_update`.
    Update,
    /// `Screen::on_render`.
    Render,
    /// `Screen::on_input`.
    Input,
    /// `Screen::on_exit`.
    Exit,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookPhase::Enter => "enter",
            HookPhase::Update => "update",
            HookPhase::Render => "render",
            HookPhase::Input => "input",
            HookPhase::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// The behaviour of a concrete screen or mode.
///
/// Every hook may fail. Hooks are only ever invoked while the owning
/// [`State`] is active (except `on_exit`, which runs right after the flag is
/// cleared). `on_enter` must not block: anything slow belongs before the
/// screen is constructed.
pub trait Screen {
    /// Stable name used for logging and diagnostics.
    fn name(&self) -> &str;

    /// Setup hook. `previous` is the state being left, absent on first
    /// activation.
    fn on_enter(&mut self, _previous: Option<&State>) -> Result<()> {
        Ok(())
    }

    /// Per-frame logic. `dt_ms` is already clamped by the runtime.
    fn on_update(&mut self, _dt_ms: f32) -> Result<()> {
        Ok(())
    }

    /// Draw hook. May run before any `on_update` in the same frame.
    fn on_render(&mut self, _target: &mut dyn RenderTarget) -> Result<()> {
        Ok(())
    }

    /// Input hook. Returns `true` if the event was consumed.
    fn on_input(&mut self, _event: &InputEvent) -> Result<bool> {
        Ok(false)
    }

    /// Teardown hook. `next` is the state about to be entered, absent on
    /// shutdown.
    fn on_exit(&mut self, _next: Option<&State>) -> Result<()> {
        Ok(())
    }
}

/// A screen wrapped with its activity gate and timing bookkeeping.
pub struct State {
    id: StateId,
    screen: Box<dyn Screen>,
    active: bool,
    entered_at: Option<Instant>,
    activations: u32,
}

impl State {
    /// Wraps a screen into a fresh, inactive state.
    pub fn new(screen: impl Screen + 'static) -> Self {
        Self::from_boxed(Box::new(screen))
    }

    /// Wraps an already boxed screen.
    pub fn from_boxed(screen: Box<dyn Screen>) -> Self {
        Self {
            id: StateId::next(),
            screen,
            active: false,
            entered_at: None,
            activations: 0,
        }
    }

    /// Returns the identity of this instance.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Returns the screen's name.
    pub fn name(&self) -> &str {
        self.screen.name()
    }

    /// Returns `true` between `enter` and `exit`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When the state was last entered.
    pub fn entered_at(&self) -> Option<Instant> {
        self.entered_at
    }

    /// How long the state has been active, `None` when inactive.
    pub fn active_for(&self) -> Option<Duration> {
        if !self.active {
            return None;
        }
        self.entered_at.map(|at| at.elapsed())
    }

    /// How many times this instance has been entered. Anything above one
    /// means it was resumed through back-navigation.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Activates the state and runs its setup hook.
    pub fn enter(&mut self, previous: Option<&State>) -> Result<()> {
        self.active = true;
        self.entered_at = Some(Instant::now());
        self.activations += 1;
        log::debug!(
            "Entering state '{}' {} (activation {})",
            self.name(),
            self.id,
            self.activations
        );
        self.screen.on_enter(previous)
    }

    /// Forwards elapsed milliseconds to the screen. No-op while inactive.
    pub fn update(&mut self, dt_ms: f32) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.screen.on_update(dt_ms)
    }

    /// Forwards a drawing target to the screen. No-op while inactive.
    pub fn render(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.screen.on_render(target)
    }

    /// Offers an input event to the screen. Returns `false` while inactive.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<bool> {
        if !self.active {
            return Ok(false);
        }
        self.screen.on_input(event)
    }

    /// Deactivates the state, then runs its teardown hook.
    ///
    /// Exiting an inactive state does nothing.
    pub fn exit(&mut self, next: Option<&State>) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        log::debug!("Exiting state '{}' {}", self.name(), self.id);
        self.screen.on_exit(next)
    }

    /// Returns a detached snapshot of this state for diagnostics.
    pub fn record(&self) -> StateRecord {
        StateRecord {
            id: self.id,
            name: self.name().to_string(),
            activations: self.activations,
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("active", &self.active)
            .field("activations", &self.activations)
            .finish()
    }
}

/// A detached, owned snapshot of a [`State`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateRecord {
    /// Identity of the snapshotted instance.
    pub id: StateId,
    /// Screen name at snapshot time.
    pub name: String,
    /// Activation count at snapshot time.
    pub activations: u32,
}
