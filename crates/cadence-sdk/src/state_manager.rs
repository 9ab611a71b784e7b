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

//! Ordered state transitions with bounded history.
//!
//! The manager owns at most one active [`State`]. A transition always runs
//! in the same order: the old state exits, it is recorded in history, then
//! the new state enters. Hook failures never leave a transition half done;
//! they are reported once the structure is consistent again.

use crate::error::{BoxError, TransitionError};
use cadence_core::{HookPhase, InputEvent, RenderTarget, State, StateRecord};
use std::collections::VecDeque;

/// Default number of exited states kept for back-navigation.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

type Guard = Box<dyn Fn(Option<&State>, &State) -> bool>;

/// Owns the active state and the history of exited ones.
pub struct StateManager {
    current: Option<State>,
    history: VecDeque<State>,
    capacity: usize,
    guards: Vec<(String, Guard)>,
    transitions: u64,
}

impl StateManager {
    /// Creates an empty manager keeping up to `capacity` exited states.
    ///
    /// A capacity of zero is raised to one so the state just left is always
    /// available as entry context.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            current: None,
            history: VecDeque::with_capacity(capacity),
            capacity,
            guards: Vec::new(),
            transitions: 0,
        }
    }

    /// Transitions to `next`.
    pub fn change_state(&mut self, next: State) -> Result<(), TransitionError> {
        self.transition(Some(next))
    }

    /// Transitions to `next`, refusing a missing target.
    ///
    /// Returns the first hook failure after the transition has completed.
    pub fn transition(&mut self, next: Option<State>) -> Result<(), TransitionError> {
        let Some(next) = next else {
            log::warn!("Refusing transition without a target state");
            return Err(TransitionError::MissingTarget);
        };
        self.check(&next)?;
        self.perform(next)
    }

    /// Resumes the most recently exited state.
    pub fn go_back(&mut self) -> Result<(), TransitionError> {
        let Some(target) = self.history.back() else {
            return Err(TransitionError::NoHistory);
        };
        self.check(target)?;
        let Some(target) = self.history.pop_back() else {
            return Err(TransitionError::NoHistory);
        };
        log::debug!("Going back to '{}' {}", target.name(), target.id());
        self.perform(target)
    }

    /// Installs a named guard that may veto transitions.
    ///
    /// The guard receives the current state (if any) and the target.
    pub fn add_guard(
        &mut self,
        name: impl Into<String>,
        guard: impl Fn(Option<&State>, &State) -> bool + 'static,
    ) {
        self.guards.push((name.into(), Box::new(guard)));
    }

    fn check(&self, next: &State) -> Result<(), TransitionError> {
        let current = self.current.as_ref();
        for (name, guard) in &self.guards {
            if !guard(current, next) {
                let from = current.map_or("<none>", |s| s.name()).to_string();
                log::warn!(
                    "Guard '{}' rejected transition '{}' -> '{}'",
                    name,
                    from,
                    next.name()
                );
                return Err(TransitionError::Rejected {
                    from,
                    to: next.name().to_string(),
                    guard: name.clone(),
                });
            }
        }
        Ok(())
    }

    fn perform(&mut self, mut next: State) -> Result<(), TransitionError> {
        let mut first_error = None;
        let had_previous = self.current.is_some();

        if let Some(mut old) = self.current.take() {
            if let Err(e) = old.exit(Some(&next)) {
                log::error!("State '{}' failed to exit: {:#}", old.name(), e);
                first_error = Some(hook_error(&old, HookPhase::Exit, e));
            }
            self.record(old);
        }

        let previous = if had_previous {
            self.history.back()
        } else {
            None
        };
        if let Err(e) = next.enter(previous) {
            log::error!("State '{}' failed to enter: {:#}", next.name(), e);
            if first_error.is_none() {
                first_error = Some(hook_error(&next, HookPhase::Enter, e));
            }
        }
        log::info!("Active state is now '{}' {}", next.name(), next.id());
        self.current = Some(next);
        self.transitions += 1;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn record(&mut self, exited: State) {
        if self.history.len() == self.capacity {
            if let Some(evicted) = self.history.pop_front() {
                log::trace!("History full, dropping '{}' {}", evicted.name(), evicted.id());
            }
        }
        self.history.push_back(exited);
    }

    /// The active state, if any.
    pub fn current_state(&self) -> Option<&State> {
        self.current.as_ref()
    }

    /// Mutable access to the active state.
    pub fn current_state_mut(&mut self) -> Option<&mut State> {
        self.current.as_mut()
    }

    /// The most recently exited state.
    pub fn previous_state(&self) -> Option<&State> {
        self.history.back()
    }

    /// A detached snapshot of the history, oldest first.
    pub fn state_history(&self) -> Vec<StateRecord> {
        self.history.iter().map(State::record).collect()
    }

    /// Returns `true` if [`StateManager::go_back`] has a target.
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Drops every exited state.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Number of exited states held.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Maximum number of exited states held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Completed transitions since construction.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Forwards a frame delta to the active state.
    pub fn update(&mut self, dt_ms: f32) -> anyhow::Result<()> {
        match self.current.as_mut() {
            Some(state) => state.update(dt_ms),
            None => Ok(()),
        }
    }

    /// Lets the active state draw into `target`.
    pub fn render(&mut self, target: &mut dyn RenderTarget) -> anyhow::Result<()> {
        match self.current.as_mut() {
            Some(state) => state.render(target),
            None => Ok(()),
        }
    }

    /// Offers an input event to the active state.
    pub fn handle_input(&mut self, event: &InputEvent) -> anyhow::Result<bool> {
        match self.current.as_mut() {
            Some(state) => state.handle_input(event),
            None => Ok(false),
        }
    }

    /// Exits the active state with no successor and drops it.
    pub fn shutdown(&mut self) -> Result<(), TransitionError> {
        let Some(mut state) = self.current.take() else {
            return Ok(());
        };
        let result = state.exit(None);
        log::debug!("State manager shut down, last state '{}'", state.name());
        result.map_err(|e| hook_error(&state, HookPhase::Exit, e))
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

fn hook_error(state: &State, phase: HookPhase, error: anyhow::Error) -> TransitionError {
    let source: BoxError = error.into();
    TransitionError::Hook {
        state: state.name().to_string(),
        phase,
        source,
    }
}
