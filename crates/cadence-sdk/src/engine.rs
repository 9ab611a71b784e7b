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

//! The frame-driven execution engine.
//!
//! The host drives the engine cooperatively: `initialize` once, then `tick`
//! once per frame while [`Engine::frame_pending`] is true. Everything inside
//! a tick is isolated: a failing state update degrades the engine, a failing
//! render draws the fallback screen, and a panic escaping the frame is
//! caught at the tick boundary. Caught panics are reported through the
//! loop-level throttle only, never by the default panic hook.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fallback::draw_fallback;
use crate::panic_guard::catch_silently;
use crate::state_manager::StateManager;
use cadence_control::{
    clamp_frame_delta, ErrorThrottle, FailureCounts, FailureLedger, FpsCounter,
    PerformanceMonitor, PerformanceVerdict,
};
use cadence_core::{
    AudioSystem, EngineStatus, InputEvent, InputSystem, RenderSurface, State, Subsystem,
    SurfaceSize,
};
use cadence_telemetry::EngineStats;
use crossbeam_channel::{Receiver, Sender};
use std::time::{Duration, Instant};

/// The collaborators the engine owns.
pub struct Subsystems {
    /// Mandatory rendering surface.
    pub surface: Box<dyn RenderSurface>,
    /// Optional audio.
    pub audio: Option<Box<dyn AudioSystem>>,
    /// Optional input.
    pub input: Option<Box<dyn InputSystem>>,
}

impl Subsystems {
    /// Starts a set with only a rendering surface.
    pub fn new(surface: impl RenderSurface + 'static) -> Self {
        Self {
            surface: Box::new(surface),
            audio: None,
            input: None,
        }
    }

    /// Adds an audio subsystem.
    pub fn with_audio(mut self, audio: impl AudioSystem + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Adds an input subsystem.
    pub fn with_input(mut self, input: impl InputSystem + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }
}

/// Host-side sender for container size changes, in logical pixels.
///
/// May be cloned and moved to other threads. Changes are applied at the
/// start of the next tick; when several arrive between ticks the last wins.
#[derive(Debug, Clone)]
pub struct ResizeHandle {
    tx: Sender<(u32, u32)>,
}

impl ResizeHandle {
    /// Queues a resize. Returns `false` once the engine has shut down.
    pub fn resize(&self, width: u32, height: u32) -> bool {
        self.tx.send((width, height)).is_ok()
    }
}

struct ResizeListener {
    tx: Sender<(u32, u32)>,
    rx: Receiver<(u32, u32)>,
}

/// A transition requested from inside a screen hook.
#[derive(Debug)]
pub enum StateRequest {
    /// Switch to a new state.
    Change(State),
    /// Resume the most recently exited state.
    Back,
}

/// Lets screens queue transitions. Requests are applied at the start of
/// the next tick, never while a hook is running.
#[derive(Debug, Clone)]
pub struct StateRequester {
    tx: Sender<StateRequest>,
}

impl StateRequester {
    /// Queues a switch to `state`.
    pub fn change(&self, state: State) -> bool {
        self.tx.send(StateRequest::Change(state)).is_ok()
    }

    /// Queues back-navigation.
    pub fn back(&self) -> bool {
        self.tx.send(StateRequest::Back).is_ok()
    }
}

/// The runtime core: owns the subsystems, the state manager and the frame
/// clock, and degrades itself when frames go wrong.
pub struct Engine {
    config: EngineConfig,
    status: EngineStatus,

    surface: Box<dyn RenderSurface>,
    audio: Option<Box<dyn AudioSystem>>,
    input: Option<Box<dyn InputSystem>>,
    subsystems_up: bool,
    input_available: bool,
    input_buffer: Vec<InputEvent>,

    states: StateManager,
    safe_state: Box<dyn Fn(&StateRequester) -> State>,
    requests_tx: Sender<StateRequest>,
    requests_rx: Receiver<StateRequest>,

    surface_size: SurfaceSize,
    resize: Option<ResizeListener>,

    last_frame: Option<Instant>,
    frame_pending: bool,
    frame_index: u64,
    fps: FpsCounter,
    performance: PerformanceMonitor,
    failures: FailureLedger,
    // Each error source is throttled on its own.
    update_throttle: ErrorThrottle,
    render_throttle: ErrorThrottle,
    loop_throttle: ErrorThrottle,
    loop_errors: u64,

    degraded: bool,
    degradations: u32,
    target_fps: f32,
}

impl Engine {
    /// Builds an engine. Nothing is brought up until [`Engine::initialize`].
    ///
    /// `safe_state` builds the state shown first and after every forced
    /// recovery; it is called again each time, so every recovery starts
    /// from a fresh instance. It receives a requester the state may keep to
    /// queue its own transitions.
    pub fn new(
        config: EngineConfig,
        subsystems: Subsystems,
        safe_state: impl Fn(&StateRequester) -> State + 'static,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let (requests_tx, requests_rx) = crossbeam_channel::unbounded();
        Ok(Self {
            status: EngineStatus::Constructed,
            surface: subsystems.surface,
            audio: subsystems.audio,
            input: subsystems.input,
            subsystems_up: false,
            input_available: false,
            input_buffer: Vec::new(),
            states: StateManager::new(config.history_capacity),
            safe_state: Box::new(safe_state),
            requests_tx,
            requests_rx,
            surface_size: config.surface.physical_size(),
            resize: None,
            last_frame: None,
            frame_pending: false,
            frame_index: 0,
            fps: FpsCounter::new(config.fps_window_ms),
            performance: PerformanceMonitor::new(
                config.min_performance_samples,
                config.performance_threshold,
            ),
            failures: FailureLedger::new(),
            update_throttle: ErrorThrottle::new(config.error_report_interval()),
            render_throttle: ErrorThrottle::new(config.error_report_interval()),
            loop_throttle: ErrorThrottle::new(config.error_report_interval()),
            loop_errors: 0,
            degraded: false,
            degradations: 0,
            target_fps: config.target_fps,
            config,
        })
    }

    // --- Lifecycle ---

    /// Brings up rendering, audio and input, enters the safe state and
    /// starts the frame loop.
    ///
    /// Only a rendering surface that keeps failing past the retry ceiling
    /// is fatal; audio and input failures are logged and the engine runs
    /// without them.
    pub async fn initialize(&mut self) -> Result<(), EngineError> {
        if self.status != EngineStatus::Constructed {
            return Err(EngineError::InvalidLifecycle {
                operation: "initialize",
                status: self.status(),
            });
        }
        self.status = EngineStatus::Initializing;
        log::info!("Initializing engine...");

        self.init_rendering().await?;
        self.init_audio().await;
        self.init_input();
        self.subsystems_up = true;

        self.surface_size = self.config.surface.physical_size();
        self.surface.on_resize(self.surface_size);
        let (tx, rx) = crossbeam_channel::unbounded();
        self.resize = Some(ResizeListener { tx, rx });
        log::debug!(
            "Surface sized to {}x{}",
            self.surface_size.width,
            self.surface_size.height
        );

        self.recover_to_safe_state();
        self.start()
    }

    async fn init_rendering(&mut self) -> Result<(), EngineError> {
        let ceiling = self.config.max_init_attempts;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self.surface.initialize().await;
            match result {
                Ok(()) => {
                    log::info!(
                        "Rendering initialized ({:?}) after {} attempt(s)",
                        self.surface.renderer_kind(),
                        attempt
                    );
                    return Ok(());
                }
                Err(e) => {
                    self.failures.record(Subsystem::Rendering);
                    log::warn!(
                        "Rendering initialization attempt {}/{} failed: {:#}",
                        attempt,
                        ceiling,
                        e
                    );
                    if attempt >= ceiling {
                        self.status = EngineStatus::Failed;
                        log::error!("Rendering unavailable, aborting startup");
                        return Err(EngineError::RenderingUnavailable {
                            attempts: attempt,
                            source: e.into(),
                        });
                    }
                }
            }
        }
    }

    async fn init_audio(&mut self) {
        let Some(audio) = self.audio.as_mut() else {
            log::info!("No audio subsystem configured");
            return;
        };
        let result = audio.initialize().await;
        match result {
            Ok(()) => log::info!("Audio initialized"),
            Err(e) => {
                self.failures.record(Subsystem::Audio);
                log::warn!("Audio unavailable, continuing without sound: {:#}", e);
                self.audio = None;
            }
        }
    }

    fn init_input(&mut self) {
        let Some(input) = self.input.as_mut() else {
            log::info!("No input subsystem configured");
            return;
        };
        match input.initialize() {
            Ok(()) => {
                self.input_available = true;
                log::info!("Input initialized");
            }
            Err(e) => {
                self.failures.record(Subsystem::Input);
                self.input_available = false;
                log::error!(
                    "Input initialization failed, continuing with degraded input: {:#}",
                    e
                );
            }
        }
    }

    /// Starts the frame loop now. See [`Engine::start_at`].
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.start_at(Instant::now())
    }

    /// Records `now` as the clock baseline and schedules the first tick.
    ///
    /// Does nothing if the loop is already running.
    pub fn start_at(&mut self, now: Instant) -> Result<(), EngineError> {
        match self.status {
            EngineStatus::Running => return Ok(()),
            EngineStatus::Initializing | EngineStatus::Stopped => {}
            _ => {
                return Err(EngineError::InvalidLifecycle {
                    operation: "start",
                    status: self.status(),
                })
            }
        }
        self.last_frame = Some(now);
        self.frame_pending = true;
        self.status = EngineStatus::Running;
        log::info!("Frame loop started, targeting {:.0} fps", self.target_fps);
        Ok(())
    }

    /// Stops the loop and cancels the pending tick. Idempotent.
    pub fn stop(&mut self) {
        if self.status.is_running() {
            self.status = EngineStatus::Stopped;
            log::info!("Frame loop stopped after {} frame(s)", self.frame_index);
        }
        self.frame_pending = false;
    }

    /// Stops the loop, exits the active state and tears the subsystems
    /// down. Each teardown failure is logged and does not block the others.
    pub fn shutdown(&mut self) {
        if self.status == EngineStatus::ShutDown {
            return;
        }
        self.stop();
        log::info!("Shutting down engine...");

        if let Err(e) = self.states.shutdown() {
            log::error!("Active state failed to exit: {:#}", anyhow::Error::from(e));
        }

        if self.subsystems_up {
            if let Some(audio) = self.audio.as_mut() {
                if let Err(e) = audio.shutdown() {
                    log::error!("Audio shutdown failed: {:#}", e);
                }
            }
            if let Some(input) = self.input.as_mut() {
                if let Err(e) = input.shutdown() {
                    log::error!("Input shutdown failed: {:#}", e);
                }
            }
            if let Err(e) = self.surface.shutdown() {
                log::error!("Rendering shutdown failed: {:#}", e);
            }
        }
        self.audio = None;
        self.input = None;
        self.input_available = false;
        self.subsystems_up = false;

        self.failures.reset();
        self.performance.clear();
        self.fps.reset();
        self.resize = None;
        self.status = EngineStatus::ShutDown;
        log::info!("Engine shut down");
    }

    // --- Frame loop ---

    /// Runs one frame now. See [`Engine::tick_at`].
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Runs one frame as if the clock read `now`.
    ///
    /// Returns `false` without doing anything unless the loop is running and
    /// a tick is pending.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.status.is_running() || !self.frame_pending {
            return false;
        }
        self.frame_pending = false;

        if let Err(message) = catch_silently(|| self.run_frame(now)) {
            self.handle_loop_failure(now, &message);
        }

        if self.status.is_running() {
            self.frame_pending = true;
        }
        true
    }

    fn run_frame(&mut self, now: Instant) {
        let raw = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);
        let dt = clamp_frame_delta(raw, self.config.max_frame_delta_ms);
        self.frame_index += 1;
        log::trace!("Frame {} dt={:.2}ms", self.frame_index, dt);

        self.apply_resize();
        self.apply_state_requests();

        self.performance.record(dt);
        if self.fps.record(dt).is_some() {
            log::debug!("{}", self.stats());
        }
        self.check_performance();

        self.dispatch_input();
        if let Err(e) = self.states.update(dt) {
            if self.update_throttle.should_report(now) {
                log::error!("Active state failed to update: {:#}", e);
            }
            self.enter_degraded_mode("state update failed");
        }

        self.render_frame(now);
    }

    fn apply_resize(&mut self) {
        let Some(listener) = &self.resize else {
            return;
        };
        let Some((width, height)) = listener.rx.try_iter().last() else {
            return;
        };
        let size = SurfaceSize::from_logical(width, height, self.config.surface.pixel_ratio);
        if size != self.surface_size {
            log::debug!("Surface resized to {}x{}", size.width, size.height);
            self.surface_size = size;
            self.surface.on_resize(size);
        }
    }

    fn apply_state_requests(&mut self) {
        while let Ok(request) = self.requests_rx.try_recv() {
            let result = match request {
                StateRequest::Change(state) => self.states.change_state(state),
                StateRequest::Back => self.states.go_back(),
            };
            if let Err(e) = result {
                log::warn!("State request failed: {:#}", anyhow::Error::from(e));
            }
        }
    }

    fn check_performance(&mut self) {
        if self.degraded {
            return;
        }
        if let PerformanceVerdict::Overloaded {
            average_ms,
            budget_ms,
        } = self.performance.evaluate(self.target_fps)
        {
            log::warn!(
                "Mean frame time {:.2} ms exceeds the {:.2} ms budget",
                average_ms,
                budget_ms
            );
            self.enter_degraded_mode("sustained poor performance");
        }
    }

    fn dispatch_input(&mut self) {
        if !self.input_available {
            return;
        }
        let Some(input) = self.input.as_mut() else {
            return;
        };
        input.poll_events(&mut self.input_buffer);
        let mut events = std::mem::take(&mut self.input_buffer);
        for event in &events {
            self.handle_input(event);
        }
        events.clear();
        self.input_buffer = events;
    }

    fn render_frame(&mut self, now: Instant) {
        self.surface.clear();
        if self.states.current_state().is_none() {
            // A recovery that could not activate the safe state leaves
            // nothing to draw; the frame must still not be blank.
            if self.render_throttle.should_report(now) {
                log::error!("No active state, drawing fallback screen");
            }
            draw_fallback(self.surface.render_target(), &self.config.fallback);
            return;
        }
        let Err(e) = self.states.render(self.surface.render_target()) else {
            return;
        };
        let count = self.failures.record(Subsystem::FrameRender);
        let ceiling = self.config.max_init_attempts;
        if count <= ceiling {
            log::error!(
                "Render failed ({}/{}), drawing fallback screen: {:#}",
                count,
                ceiling,
                e
            );
            draw_fallback(self.surface.render_target(), &self.config.fallback);
        } else if self.render_throttle.should_report(now) {
            log::error!("Render failed ({} so far): {:#}", count, e);
        }
    }

    fn handle_loop_failure(&mut self, now: Instant, message: &str) {
        self.loop_errors += 1;
        if self.loop_throttle.should_report(now) {
            log::error!(
                "Frame loop failure #{}: {} ({} report(s) suppressed)",
                self.loop_errors,
                message,
                self.loop_throttle.suppressed()
            );
        }
        self.enter_degraded_mode("frame loop failure");
    }

    // --- Degradation ---

    fn enter_degraded_mode(&mut self, reason: &str) {
        if self.degraded {
            return;
        }
        self.degraded = true;
        self.degradations += 1;
        self.target_fps = self.config.degraded_fps;
        log::warn!(
            "Entering degraded mode ({}), targeting {:.0} fps",
            reason,
            self.target_fps
        );

        if self.surface.renderer_kind().supports_cheap_mode() {
            self.surface.enable_cheap_mode();
        }
        self.performance.clear();

        self.recover_to_safe_state();
    }

    /// Forces a fresh safe state. The state being replaced may be the cause,
    /// so history is emptied whether or not the safe state comes up.
    fn recover_to_safe_state(&mut self) {
        self.states.clear_history();
        let result = catch_silently(|| self.enter_safe_state());
        self.states.clear_history();
        if let Err(message) = result {
            self.loop_errors += 1;
            log::error!("Safe state panicked while activating: {}", message);
        }
    }

    fn enter_safe_state(&mut self) {
        let safe = (self.safe_state)(&self.state_requests());
        if let Err(e) = self.states.change_state(safe) {
            log::error!(
                "Safe state did not activate cleanly: {:#}",
                anyhow::Error::from(e)
            );
        }
    }

    /// Leaves degraded mode and restores the configured frame rate.
    ///
    /// A renderer switched to its cheap mode stays there.
    pub fn reset_degraded_mode(&mut self) {
        if !self.degraded {
            return;
        }
        self.degraded = false;
        self.target_fps = self.config.target_fps;
        self.performance.clear();
        log::info!("Degraded mode reset, targeting {:.0} fps", self.target_fps);
    }

    /// Zeroes every failure counter.
    pub fn reset_failure_counts(&mut self) {
        self.failures.reset();
    }

    // --- Host interface ---

    /// Offers an input event to the active state. Returns whether it was
    /// consumed; a failing handler is logged and counts as not consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match self.states.handle_input(event) {
            Ok(consumed) => consumed,
            Err(e) => {
                log::error!("Active state failed to handle input: {:#}", e);
                false
            }
        }
    }

    /// A sender for container size changes, once initialized.
    pub fn resize_handle(&self) -> Option<ResizeHandle> {
        self.resize.as_ref().map(|listener| ResizeHandle {
            tx: listener.tx.clone(),
        })
    }

    /// A handle screens use to request transitions.
    pub fn state_requests(&self) -> StateRequester {
        StateRequester {
            tx: self.requests_tx.clone(),
        }
    }

    // --- Accessors ---

    /// Lifecycle status; `Degraded` while running in degraded mode.
    pub fn status(&self) -> EngineStatus {
        if self.status == EngineStatus::Running && self.degraded {
            EngineStatus::Degraded
        } else {
            self.status
        }
    }

    /// Frames per second over the last complete window.
    pub fn current_fps(&self) -> f32 {
        self.fps.fps()
    }

    /// Frame rate currently aimed for.
    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    /// Time the host should wait between ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.target_fps)
    }

    /// Mean over the retained frame-time window.
    pub fn average_frame_time_ms(&self) -> f32 {
        self.performance.average()
    }

    /// Whether the sticky degraded mode is on.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// How many times degraded mode has been entered.
    pub fn degradation_count(&self) -> u32 {
        self.degradations
    }

    /// Snapshot of the per-subsystem failure counters.
    pub fn failure_counts(&self) -> FailureCounts {
        self.failures.snapshot()
    }

    /// Whether audio came up.
    pub fn is_audio_supported(&self) -> bool {
        self.audio.is_some() && self.subsystems_up
    }

    /// Whether input came up.
    pub fn is_input_available(&self) -> bool {
        self.input_available
    }

    /// Loop-level failures caught at the tick boundary or while forcing
    /// the safe state.
    pub fn loop_error_count(&self) -> u64 {
        self.loop_errors
    }

    /// Loop-level failures that were caught but not reported because the
    /// throttle interval had not elapsed.
    pub fn suppressed_loop_reports(&self) -> u64 {
        self.loop_throttle.suppressed()
    }

    /// Frames processed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Whether the host should call [`Engine::tick`].
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Clock reading of the last tick, or of the start baseline.
    pub fn last_frame_time(&self) -> Option<Instant> {
        self.last_frame
    }

    /// Current surface size in physical pixels.
    pub fn surface_size(&self) -> SurfaceSize {
        self.surface_size
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The state manager.
    pub fn state_manager(&self) -> &StateManager {
        &self.states
    }

    /// Mutable access to the state manager, for hosts that drive
    /// transitions directly between ticks.
    pub fn state_manager_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }

    /// A serializable snapshot of the engine.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            status: self.status(),
            frame_index: self.frame_index,
            current_fps: self.current_fps(),
            target_fps: self.target_fps,
            average_frame_time_ms: self.average_frame_time_ms(),
            frame_jitter_ms: self.performance.jitter_ms(),
            worst_frame_time_ms: self.performance.worst_ms(),
            degraded: self.degraded,
            failures: self.failures.snapshot(),
            loop_errors: self.loop_errors,
        }
    }
}
