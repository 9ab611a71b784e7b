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

//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields a working engine.

use crate::error::ConfigError;
use cadence_control::FRAME_WINDOW;
use cadence_core::{Color, SurfaceSize};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for the execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frame rate aimed for at full quality.
    pub target_fps: f32,
    /// Frame rate forced while degraded.
    pub degraded_fps: f32,
    /// Upper bound on the delta handed to states, in milliseconds.
    pub max_frame_delta_ms: f32,
    /// Multiple of the target interval the mean frame time may reach.
    pub performance_threshold: f32,
    /// Samples required before the performance check runs.
    pub min_performance_samples: usize,
    /// Length of the FPS publication window, in milliseconds.
    pub fps_window_ms: f32,
    /// Retry ceiling for rendering bring-up and the per-frame fallback.
    pub max_init_attempts: u32,
    /// Minimum interval between two reported loop errors, in milliseconds.
    pub error_report_interval_ms: u64,
    /// Number of exited states kept for back-navigation.
    pub history_capacity: usize,
    /// The container the surface lives in.
    pub surface: SurfaceConfig,
    /// What the fallback screen shows.
    pub fallback: FallbackConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            degraded_fps: 30.0,
            max_frame_delta_ms: 100.0,
            performance_threshold: 1.5,
            min_performance_samples: 30,
            fps_window_ms: 1000.0,
            max_init_attempts: 3,
            error_report_interval_ms: 5000,
            history_capacity: 10,
            surface: SurfaceConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON text and validates it.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading engine config from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Checks every field for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("target_fps", self.target_fps)?;
        positive("degraded_fps", self.degraded_fps)?;
        if self.degraded_fps > self.target_fps {
            return Err(invalid(
                "degraded_fps",
                format!(
                    "{} is above target_fps {}",
                    self.degraded_fps, self.target_fps
                ),
            ));
        }
        positive("max_frame_delta_ms", self.max_frame_delta_ms)?;
        positive("performance_threshold", self.performance_threshold)?;
        positive("fps_window_ms", self.fps_window_ms)?;
        if self.min_performance_samples == 0 || self.min_performance_samples > FRAME_WINDOW {
            return Err(invalid(
                "min_performance_samples",
                format!("must be within 1..={}", FRAME_WINDOW),
            ));
        }
        if self.max_init_attempts == 0 {
            return Err(invalid("max_init_attempts", "must be at least 1".into()));
        }
        if self.history_capacity == 0 {
            return Err(invalid("history_capacity", "must be at least 1".into()));
        }
        positive("surface.pixel_ratio", self.surface.pixel_ratio)?;
        Ok(())
    }

    /// Minimum interval between two reported loop errors.
    pub fn error_report_interval(&self) -> Duration {
        Duration::from_millis(self.error_report_interval_ms)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} is not a positive number", value)))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Logical size and density of the container hosting the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            pixel_ratio: 1.0,
        }
    }
}

impl SurfaceConfig {
    /// The container size in physical pixels.
    pub fn physical_size(&self) -> SurfaceSize {
        SurfaceSize::from_logical(self.width, self.height, self.pixel_ratio)
    }
}

/// Content of the screen drawn when the active state cannot render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Headline.
    pub title: String,
    /// Recovery suggestion below the headline.
    pub message: String,
    /// Flat background color.
    pub background: Color,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            title: "Sorry, something went wrong.".to_string(),
            message: "Please reload the page to try again.".to_string(),
            background: Color::SLATE,
        }
    }
}
