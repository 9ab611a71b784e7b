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

//! Scripted fake subsystems and recording screens shared by the
//! integration tests.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use cadence_core::{
    AudioSystem, Color, InputEvent, InputSystem, Rect, RenderSurface, RenderTarget, RendererKind,
    Screen, State, SurfaceSize, TextStyle,
};
use cadence_sdk::{Engine, EngineConfig, Subsystems};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Ordered log of notable calls across every fake.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn count(journal: &Journal, entry: &str) -> usize {
    journal.borrow().iter().filter(|e| *e == entry).count()
}

pub fn position(journal: &Journal, entry: &str) -> Option<usize> {
    journal.borrow().iter().position(|e| e == entry)
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub init_attempts: u32,
    pub clears: u32,
    pub fills: Vec<Color>,
    pub texts: Vec<String>,
    pub resizes: Vec<SurfaceSize>,
    pub cheap_mode: bool,
}

pub struct RecordingTarget {
    log: Rc<RefCell<SurfaceLog>>,
    size: SurfaceSize,
}

impl RenderTarget for RecordingTarget {
    fn size(&self) -> SurfaceSize {
        self.size
    }
    fn fill(&mut self, color: Color) {
        self.log.borrow_mut().fills.push(color);
    }
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn draw_text(&mut self, text: &str, _x: f32, _y: f32, _style: &TextStyle) {
        self.log.borrow_mut().texts.push(text.to_string());
    }
}

/// A surface that fails its first `fail_first` bring-up attempts.
pub struct FakeSurface {
    fail_first: u32,
    kind: RendererKind,
    target: RecordingTarget,
    log: Rc<RefCell<SurfaceLog>>,
    journal: Journal,
}

impl FakeSurface {
    pub fn new(fail_first: u32, journal: &Journal) -> (Self, Rc<RefCell<SurfaceLog>>) {
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        let surface = Self {
            fail_first,
            kind: RendererKind::Accelerated,
            target: RecordingTarget {
                log: Rc::clone(&log),
                size: SurfaceSize::new(1, 1),
            },
            log: Rc::clone(&log),
            journal: Rc::clone(journal),
        };
        (surface, log)
    }

    pub fn with_kind(mut self, kind: RendererKind) -> Self {
        self.kind = kind;
        self
    }
}

#[async_trait(?Send)]
impl RenderSurface for FakeSurface {
    async fn initialize(&mut self) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.init_attempts += 1;
        if log.init_attempts <= self.fail_first {
            bail!("context creation failed (attempt {})", log.init_attempts);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.log.borrow_mut().clears += 1;
    }

    fn render_target(&mut self) -> &mut dyn RenderTarget {
        &mut self.target
    }

    fn renderer_kind(&self) -> RendererKind {
        self.kind
    }

    fn enable_cheap_mode(&mut self) {
        self.log.borrow_mut().cheap_mode = true;
    }

    fn on_resize(&mut self, size: SurfaceSize) {
        self.target.size = size;
        self.log.borrow_mut().resizes.push(size);
    }

    fn shutdown(&mut self) -> Result<()> {
        self.journal.borrow_mut().push("surface.shutdown".into());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Audio & input
// ─────────────────────────────────────────────────────────────────────────────

pub struct FakeAudio {
    pub fail: bool,
    pub fail_shutdown: bool,
    pub journal: Journal,
}

#[async_trait(?Send)]
impl AudioSystem for FakeAudio {
    async fn initialize(&mut self) -> Result<()> {
        if self.fail {
            bail!("no audio device");
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.journal.borrow_mut().push("audio.shutdown".into());
        if self.fail_shutdown {
            bail!("audio device vanished");
        }
        Ok(())
    }
}

pub struct FakeInput {
    pub fail: bool,
    pub fail_shutdown: bool,
    pub queue: Rc<RefCell<VecDeque<InputEvent>>>,
    pub journal: Journal,
}

impl InputSystem for FakeInput {
    fn initialize(&mut self) -> Result<()> {
        if self.fail {
            bail!("listener attach refused");
        }
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<InputEvent>) {
        out.extend(self.queue.borrow_mut().drain(..));
    }

    fn shutdown(&mut self) -> Result<()> {
        self.journal.borrow_mut().push("input.shutdown".into());
        if self.fail_shutdown {
            bail!("listener detach refused");
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Screens
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Healthy,
    FailUpdate,
    PanicUpdate,
    FailRender,
    PanicEnter,
}

/// A screen that journals its lifecycle and records every delta it sees.
pub struct ScriptedScreen {
    name: &'static str,
    behavior: Behavior,
    journal: Journal,
    dts: Rc<RefCell<Vec<f32>>>,
}

impl ScriptedScreen {
    pub fn state(name: &'static str, behavior: Behavior, journal: &Journal) -> State {
        Self::recording(name, behavior, journal, &Rc::new(RefCell::new(Vec::new())))
    }

    pub fn recording(
        name: &'static str,
        behavior: Behavior,
        journal: &Journal,
        dts: &Rc<RefCell<Vec<f32>>>,
    ) -> State {
        State::new(Self {
            name,
            behavior,
            journal: Rc::clone(journal),
            dts: Rc::clone(dts),
        })
    }
}

impl Screen for ScriptedScreen {
    fn name(&self) -> &str {
        self.name
    }

    fn on_enter(&mut self, _previous: Option<&State>) -> Result<()> {
        self.journal.borrow_mut().push(format!("{}.enter", self.name));
        if self.behavior == Behavior::PanicEnter {
            panic!("{} could not enter", self.name);
        }
        Ok(())
    }

    fn on_update(&mut self, dt_ms: f32) -> Result<()> {
        self.dts.borrow_mut().push(dt_ms);
        match self.behavior {
            Behavior::FailUpdate => bail!("{} blew up", self.name),
            Behavior::PanicUpdate => panic!("{} panicked", self.name),
            _ => Ok(()),
        }
    }

    fn on_render(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        if self.behavior == Behavior::FailRender {
            bail!("shader missing");
        }
        target.fill(Color::BLACK);
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent) -> Result<bool> {
        if event.is_key_press("Space") {
            self.journal.borrow_mut().push(format!("{}.input", self.name));
            return Ok(true);
        }
        Ok(false)
    }

    fn on_exit(&mut self, _next: Option<&State>) -> Result<()> {
        self.journal.borrow_mut().push(format!("{}.exit", self.name));
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Harness
// ─────────────────────────────────────────────────────────────────────────────

pub struct Harness {
    pub engine: Engine,
    pub journal: Journal,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub safe_dts: Rc<RefCell<Vec<f32>>>,
    pub input: Rc<RefCell<VecDeque<InputEvent>>>,
}

pub struct HarnessBuilder {
    config: EngineConfig,
    surface_failures: u32,
    kind: RendererKind,
    audio_fails: bool,
    input_fails: bool,
    audio_shutdown_fails: bool,
    input_shutdown_fails: bool,
    healthy_safe_instances: Option<u32>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            surface_failures: 0,
            kind: RendererKind::Accelerated,
            audio_fails: false,
            input_fails: false,
            audio_shutdown_fails: false,
            input_shutdown_fails: false,
            healthy_safe_instances: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn surface_failures(mut self, failures: u32) -> Self {
        self.surface_failures = failures;
        self
    }

    pub fn renderer(mut self, kind: RendererKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn failing_audio(mut self) -> Self {
        self.audio_fails = true;
        self
    }

    pub fn failing_input(mut self) -> Self {
        self.input_fails = true;
        self
    }

    /// Audio and input come up but refuse to tear down.
    pub fn failing_teardown(mut self) -> Self {
        self.audio_shutdown_fails = true;
        self.input_shutdown_fails = true;
        self
    }

    /// Safe states built after the first `healthy` panic in `on_enter`.
    pub fn safe_state_panics_after(mut self, healthy: u32) -> Self {
        self.healthy_safe_instances = Some(healthy);
        self
    }

    pub fn build(self) -> Harness {
        cadence_telemetry::init_logging("warn");
        let journal = journal();
        let (surface, surface_log) = FakeSurface::new(self.surface_failures, &journal);
        let input = Rc::new(RefCell::new(VecDeque::new()));
        let subsystems = Subsystems::new(surface.with_kind(self.kind))
            .with_audio(FakeAudio {
                fail: self.audio_fails,
                fail_shutdown: self.audio_shutdown_fails,
                journal: Rc::clone(&journal),
            })
            .with_input(FakeInput {
                fail: self.input_fails,
                fail_shutdown: self.input_shutdown_fails,
                queue: Rc::clone(&input),
                journal: Rc::clone(&journal),
            });

        let safe_dts = Rc::new(RefCell::new(Vec::new()));
        let factory_journal = Rc::clone(&journal);
        let factory_dts = Rc::clone(&safe_dts);
        let healthy_limit = self.healthy_safe_instances;
        let built = Cell::new(0u32);
        let engine = Engine::new(self.config, subsystems, move |_| {
            built.set(built.get() + 1);
            let behavior = match healthy_limit {
                Some(limit) if built.get() > limit => Behavior::PanicEnter,
                _ => Behavior::Healthy,
            };
            ScriptedScreen::recording("safe", behavior, &factory_journal, &factory_dts)
        })
        .expect("valid config");

        Harness {
            engine,
            journal,
            surface: surface_log,
            safe_dts,
            input,
        }
    }

    pub async fn start(self) -> Harness {
        let mut harness = self.build();
        harness
            .engine
            .initialize()
            .await
            .expect("initialization succeeds");
        harness
    }
}

impl Harness {
    /// Runs `frames` ticks spaced `interval` apart, starting from the last
    /// frame instant. Returns the instant of the last tick.
    pub fn run_frames(&mut self, frames: usize, interval: Duration) -> Instant {
        let mut now = self
            .engine
            .last_frame_time()
            .expect("engine has been started");
        for _ in 0..frames {
            now += interval;
            self.engine.tick_at(now);
        }
        now
    }

    pub fn current_name(&self) -> String {
        self.engine
            .state_manager()
            .current_state()
            .map(|s| s.name().to_string())
            .unwrap_or_default()
    }
}
