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

// Cadence Sandbox
// Drives the runtime through a headless surface and two demo screens.

use anyhow::Result;
use async_trait::async_trait;
use cadence_sdk::prelude::*;
use std::collections::VecDeque;
use std::time::Instant;

const DEMO_FRAMES: u64 = 180;

/// Counts draw calls instead of drawing.
#[derive(Default)]
struct CountingTarget {
    size: SurfaceSize,
    draw_calls: u64,
}

impl RenderTarget for CountingTarget {
    fn size(&self) -> SurfaceSize {
        self.size
    }
    fn fill(&mut self, _color: Color) {
        self.draw_calls += 1;
    }
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {
        self.draw_calls += 1;
    }
    fn draw_text(&mut self, text: &str, _x: f32, _y: f32, _style: &TextStyle) {
        log::trace!("text: {}", text);
        self.draw_calls += 1;
    }
}

#[derive(Default)]
struct HeadlessSurface {
    target: CountingTarget,
}

#[async_trait(?Send)]
impl RenderSurface for HeadlessSurface {
    async fn initialize(&mut self) -> Result<()> {
        tokio::task::yield_now().await;
        Ok(())
    }
    fn clear(&mut self) {}
    fn render_target(&mut self) -> &mut dyn RenderTarget {
        &mut self.target
    }
    fn renderer_kind(&self) -> RendererKind {
        RendererKind::Headless
    }
    fn enable_cheap_mode(&mut self) {}
    fn on_resize(&mut self, size: SurfaceSize) {
        self.target.size = size;
    }
    fn shutdown(&mut self) -> Result<()> {
        log::info!("Headless surface issued {} draw calls", self.target.draw_calls);
        Ok(())
    }
}

struct NullAudio;

#[async_trait(?Send)]
impl AudioSystem for NullAudio {
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Replays a fixed script of key presses, one per polled frame.
struct ScriptedInput {
    script: VecDeque<(u64, &'static str)>,
    frame: u64,
}

impl InputSystem for ScriptedInput {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }
    fn poll_events(&mut self, out: &mut Vec<InputEvent>) {
        self.frame += 1;
        while let Some((at, key)) = self.script.front().copied() {
            if at > self.frame {
                break;
            }
            self.script.pop_front();
            out.push(InputEvent::key_pressed(key));
        }
    }
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The safe state: a static title card waiting for Enter.
struct TitleScreen {
    requests: StateRequester,
}

impl Screen for TitleScreen {
    fn name(&self) -> &str {
        "title"
    }

    fn on_render(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        let (cx, cy) = target.size().center();
        target.fill(Color::SLATE);
        target.draw_text(
            "CADENCE",
            cx,
            cy,
            &TextStyle {
                size_px: 48.0,
                align: TextAlign::Center,
                ..Default::default()
            },
        );
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent) -> Result<bool> {
        if event.is_key_press("Enter") {
            let puzzle = PuzzleScreen {
                requests: self.requests.clone(),
                elapsed_ms: 0.0,
                finished: false,
            };
            self.requests.change(State::new(puzzle));
            return Ok(true);
        }
        Ok(false)
    }
}

/// A timed screen that returns to the title once its clock runs out.
struct PuzzleScreen {
    requests: StateRequester,
    elapsed_ms: f32,
    finished: bool,
}

impl Screen for PuzzleScreen {
    fn name(&self) -> &str {
        "puzzle"
    }

    fn on_enter(&mut self, previous: Option<&State>) -> Result<()> {
        log::info!(
            "Puzzle started from '{}'",
            previous.map_or("<none>", |s| s.name())
        );
        Ok(())
    }

    fn on_update(&mut self, dt_ms: f32) -> Result<()> {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= 1000.0 && !self.finished {
            self.finished = true;
            self.requests.back();
        }
        Ok(())
    }

    fn on_render(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        let size = target.size();
        target.fill(Color::BLACK);
        let progress = (self.elapsed_ms / 1000.0).min(1.0);
        target.fill_rect(
            Rect::new(0.0, 0.0, size.width as f32 * progress, 8.0),
            Color::WHITE,
        );
        Ok(())
    }

    fn on_exit(&mut self, _next: Option<&State>) -> Result<()> {
        log::info!("Puzzle closed after {:.0} ms", self.elapsed_ms);
        Ok(())
    }
}

fn main() -> Result<()> {
    init_logging("info");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let subsystems = Subsystems::new(HeadlessSurface::default())
            .with_audio(NullAudio)
            .with_input(ScriptedInput {
                script: VecDeque::from([(30, "Enter")]),
                frame: 0,
            });

        let mut engine = Engine::new(config, subsystems, |requests| {
            State::new(TitleScreen {
                requests: requests.clone(),
            })
        })?;

        engine.initialize().await?;

        let started = Instant::now();
        while engine.frame_pending() && engine.frame_index() < DEMO_FRAMES {
            engine.tick();
            tokio::time::sleep(engine.frame_interval()).await;
        }
        log::info!(
            "Ran {} frames in {:.2?}",
            engine.frame_index(),
            started.elapsed()
        );

        engine.shutdown();
        println!("{}", engine.stats().to_json()?);
        Ok(())
    })
}
