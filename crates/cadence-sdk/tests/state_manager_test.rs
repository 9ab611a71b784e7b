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

//! Integration tests for transition ordering and bounded history.

mod common;

use cadence_sdk::{StateManager, TransitionError};
use common::{journal, position, Behavior, ScriptedScreen};

#[test]
fn test_current_is_last_argument_and_exit_precedes_enter() {
    let journal = journal();
    let mut manager = StateManager::default();
    let names = ["title", "menu", "game", "pause", "game-over"];

    for name in names {
        manager
            .change_state(ScriptedScreen::state(name, Behavior::Healthy, &journal))
            .unwrap();
        assert_eq!(manager.current_state().unwrap().name(), name);
    }

    for pair in names.windows(2) {
        let exit = position(&journal, &format!("{}.exit", pair[0])).unwrap();
        let enter = position(&journal, &format!("{}.enter", pair[1])).unwrap();
        assert!(exit < enter, "{} must exit before {} enters", pair[0], pair[1]);
    }
}

#[test]
fn test_history_is_bounded() {
    let journal = journal();
    let mut manager = StateManager::new(3);

    let mut ids = Vec::new();
    for _ in 0..5 {
        let state = ScriptedScreen::state("screen", Behavior::Healthy, &journal);
        ids.push(state.id());
        manager.change_state(state).unwrap();
        assert!(manager.history_len() <= 3);
    }

    // Five transitions leave four exited states; the oldest was evicted.
    let history: Vec<_> = manager.state_history().iter().map(|r| r.id).collect();
    assert_eq!(history, ids[1..4].to_vec());
    assert_eq!(manager.current_state().unwrap().id(), ids[4]);
}

#[test]
fn test_history_never_contains_current() {
    let journal = journal();
    let mut manager = StateManager::new(4);
    for name in ["a", "b", "c"] {
        manager
            .change_state(ScriptedScreen::state(name, Behavior::Healthy, &journal))
            .unwrap();
    }
    manager.go_back().unwrap();

    let current = manager.current_state().unwrap().id();
    assert!(manager.state_history().iter().all(|r| r.id != current));
    assert_eq!(manager.current_state().unwrap().name(), "b");
    assert_eq!(manager.previous_state().unwrap().name(), "c");
}

#[test]
fn test_history_snapshot_is_detached() {
    let journal = journal();
    let mut manager = StateManager::default();
    for name in ["a", "b"] {
        manager
            .change_state(ScriptedScreen::state(name, Behavior::Healthy, &journal))
            .unwrap();
    }
    let snapshot = manager.state_history();
    manager.clear_history();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "a");
    assert!(!manager.can_go_back());
    assert!(matches!(
        manager.go_back().unwrap_err(),
        TransitionError::NoHistory
    ));
}

#[test]
fn test_forwarding_without_current_state() {
    let mut manager = StateManager::default();
    assert!(manager.update(16.0).is_ok());
    assert!(!manager
        .handle_input(&cadence_core::InputEvent::key_pressed("Space"))
        .unwrap());
    assert!(manager.shutdown().is_ok());
}
