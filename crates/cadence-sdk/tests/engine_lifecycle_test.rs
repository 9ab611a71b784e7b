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

//! Integration tests for engine bring-up, start/stop and shutdown.

mod common;

use cadence_core::{EngineStatus, Subsystem, SurfaceSize};
use cadence_sdk::{EngineConfig, EngineError};
use common::{count, position, HarnessBuilder};
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// initialize()
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rendering_recovers_within_retry_ceiling() {
    let mut harness = HarnessBuilder::new().surface_failures(2).build();
    harness.engine.initialize().await.unwrap();

    assert_eq!(harness.surface.borrow().init_attempts, 3);
    assert_eq!(harness.engine.failure_counts().rendering, 2);
    assert_eq!(harness.engine.status(), EngineStatus::Running);
    assert!(harness.engine.frame_pending());
}

#[tokio::test]
async fn test_rendering_failing_four_times_is_fatal() {
    let mut harness = HarnessBuilder::new().surface_failures(4).build();
    let err = harness.engine.initialize().await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::RenderingUnavailable { attempts: 3, .. }
    ));
    assert_eq!(harness.engine.status(), EngineStatus::Failed);
}

#[tokio::test]
async fn test_always_failing_rendering_never_starts_the_loop() {
    let mut harness = HarnessBuilder::new().surface_failures(u32::MAX).build();
    assert!(harness.engine.initialize().await.is_err());

    assert_eq!(harness.surface.borrow().init_attempts, 3);
    assert_eq!(harness.engine.failure_counts().get(Subsystem::Rendering), 3);
    assert!(!harness.engine.frame_pending());
    assert!(!harness.engine.tick());
    assert_eq!(harness.engine.frame_index(), 0);
    assert!(harness.engine.state_manager().current_state().is_none());
    assert_eq!(count(&harness.journal, "safe.enter"), 0);
}

#[tokio::test]
async fn test_retry_ceiling_follows_config() {
    let config = EngineConfig {
        max_init_attempts: 5,
        ..Default::default()
    };
    let mut harness = HarnessBuilder::new()
        .config(config)
        .surface_failures(4)
        .build();
    harness.engine.initialize().await.unwrap();
    assert_eq!(harness.surface.borrow().init_attempts, 5);
}

#[tokio::test]
async fn test_audio_failure_is_not_fatal() {
    let harness = HarnessBuilder::new().failing_audio().start().await;

    assert_eq!(harness.engine.status(), EngineStatus::Running);
    assert!(!harness.engine.is_audio_supported());
    assert_eq!(harness.engine.failure_counts().audio, 1);
    assert!(harness.engine.is_input_available());
}

#[tokio::test]
async fn test_input_failure_is_not_fatal() {
    let harness = HarnessBuilder::new().failing_input().start().await;

    assert_eq!(harness.engine.status(), EngineStatus::Running);
    assert!(!harness.engine.is_input_available());
    assert!(harness.engine.is_audio_supported());
    assert_eq!(harness.engine.failure_counts().input, 1);
}

#[tokio::test]
async fn test_initialize_enters_safe_state_and_sizes_surface() {
    let mut config = EngineConfig::default();
    config.surface.pixel_ratio = 2.0;
    let harness = HarnessBuilder::new().config(config).start().await;

    assert_eq!(harness.current_name(), "safe");
    assert_eq!(count(&harness.journal, "safe.enter"), 1);
    assert_eq!(
        harness.surface.borrow().resizes,
        vec![SurfaceSize::new(1600, 1200)]
    );
    assert_eq!(harness.engine.surface_size(), SurfaceSize::new(1600, 1200));
    assert!(harness.engine.resize_handle().is_some());
}

#[tokio::test]
async fn test_initialize_twice_is_refused() {
    let mut harness = HarnessBuilder::new().start().await;
    let err = harness.engine.initialize().await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidLifecycle {
            operation: "initialize",
            ..
        }
    ));
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let config = EngineConfig {
        target_fps: 0.0,
        ..Default::default()
    };
    let journal = common::journal();
    let (surface, _) = common::FakeSurface::new(0, &journal);
    let result = cadence_sdk::Engine::new(config, cadence_sdk::Subsystems::new(surface), |_| {
        common::ScriptedScreen::state("safe", common::Behavior::Healthy, &common::journal())
    });
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_resize_handle_absent_before_initialize() {
    let harness = HarnessBuilder::new().build();
    assert!(harness.engine.resize_handle().is_none());
    assert_eq!(harness.engine.status(), EngineStatus::Constructed);
}

// ─────────────────────────────────────────────────────────────────────────────
// start() / stop()
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_is_idempotent() {
    let mut harness = HarnessBuilder::new().start().await;
    let baseline = harness.engine.last_frame_time().unwrap();

    harness
        .engine
        .start_at(baseline + Duration::from_secs(3))
        .unwrap();
    assert_eq!(harness.engine.last_frame_time(), Some(baseline));
    assert_eq!(harness.engine.status(), EngineStatus::Running);
}

#[test]
fn test_start_before_initialize_is_refused() {
    let mut harness = HarnessBuilder::new().build();
    assert!(matches!(
        harness.engine.start(),
        Err(EngineError::InvalidLifecycle {
            operation: "start",
            status: EngineStatus::Constructed
        })
    ));
}

#[tokio::test]
async fn test_stop_cancels_pending_tick_and_restarts() {
    let mut harness = HarnessBuilder::new().start().await;
    harness.run_frames(3, Duration::from_millis(16));

    harness.engine.stop();
    harness.engine.stop();
    assert_eq!(harness.engine.status(), EngineStatus::Stopped);
    assert!(!harness.engine.frame_pending());
    assert!(!harness.engine.tick());
    assert_eq!(harness.engine.frame_index(), 3);

    harness.engine.start().unwrap();
    assert!(harness.engine.frame_pending());
    harness.run_frames(2, Duration::from_millis(16));
    assert_eq!(harness.engine.frame_index(), 5);
}

// ─────────────────────────────────────────────────────────────────────────────
// shutdown()
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shutdown_tears_down_in_order() {
    let mut harness = HarnessBuilder::new().surface_failures(1).start().await;
    let resize = harness.engine.resize_handle().unwrap();
    harness.run_frames(5, Duration::from_millis(16));

    harness.engine.shutdown();

    let exit = position(&harness.journal, "safe.exit").unwrap();
    let audio = position(&harness.journal, "audio.shutdown").unwrap();
    let input = position(&harness.journal, "input.shutdown").unwrap();
    let surface = position(&harness.journal, "surface.shutdown").unwrap();
    assert!(exit < audio && audio < input && input < surface);

    assert_eq!(harness.engine.status(), EngineStatus::ShutDown);
    assert_eq!(harness.engine.failure_counts().total(), 0);
    assert_eq!(harness.engine.average_frame_time_ms(), 0.0);
    assert!(harness.engine.state_manager().current_state().is_none());
    assert!(!resize.resize(640, 480));
    assert!(!harness.engine.tick());
}

#[tokio::test]
async fn test_shutdown_is_idempotent_and_isolated() {
    // Failing audio is dropped at bring-up, so its teardown never runs.
    let mut harness = HarnessBuilder::new().failing_audio().start().await;
    harness.engine.shutdown();
    harness.engine.shutdown();

    assert_eq!(count(&harness.journal, "audio.shutdown"), 0);
    assert_eq!(count(&harness.journal, "input.shutdown"), 1);
    assert_eq!(count(&harness.journal, "surface.shutdown"), 1);
    assert_eq!(count(&harness.journal, "safe.exit"), 1);
}

#[tokio::test]
async fn test_failing_teardown_does_not_block_the_rest() {
    let mut harness = HarnessBuilder::new().failing_teardown().start().await;
    assert!(harness.engine.is_audio_supported());
    assert!(harness.engine.is_input_available());

    harness.engine.shutdown();

    let exit = position(&harness.journal, "safe.exit").unwrap();
    let audio = position(&harness.journal, "audio.shutdown").unwrap();
    let input = position(&harness.journal, "input.shutdown").unwrap();
    let surface = position(&harness.journal, "surface.shutdown").unwrap();
    assert!(exit < audio && audio < input && input < surface);
    assert_eq!(count(&harness.journal, "surface.shutdown"), 1);
    assert_eq!(harness.engine.status(), EngineStatus::ShutDown);
    assert!(!harness.engine.is_audio_supported());
    assert!(!harness.engine.is_input_available());
}

#[tokio::test]
async fn test_shutdown_after_failed_startup() {
    let mut harness = HarnessBuilder::new().surface_failures(u32::MAX).build();
    assert!(harness.engine.initialize().await.is_err());
    harness.engine.shutdown();

    assert_eq!(harness.engine.status(), EngineStatus::ShutDown);
    assert_eq!(count(&harness.journal, "surface.shutdown"), 0);
}
