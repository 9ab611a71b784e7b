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

//! Rolling frame-time analysis that decides when the runtime is overloaded.

use crate::metrics::RingBuffer;

/// Number of frame durations retained for analysis.
pub const FRAME_WINDOW: usize = 60;

/// Outcome of a performance check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceVerdict {
    /// Not enough samples yet to judge.
    Insufficient,
    /// The mean frame time is within budget.
    Healthy {
        /// Mean frame time over the window, in milliseconds.
        average_ms: f32,
    },
    /// The mean frame time exceeds the allowed budget.
    Overloaded {
        /// Mean frame time over the window, in milliseconds.
        average_ms: f32,
        /// The budget that was exceeded, in milliseconds.
        budget_ms: f32,
    },
}

impl PerformanceVerdict {
    /// Returns `true` for [`PerformanceVerdict::Overloaded`].
    pub fn is_overloaded(&self) -> bool {
        matches!(self, PerformanceVerdict::Overloaded { .. })
    }
}

/// Keeps the most recent frame durations and compares their mean against
/// a multiple of the target frame interval.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    samples: RingBuffer<f32, FRAME_WINDOW>,
    min_samples: usize,
    threshold_factor: f32,
}

impl PerformanceMonitor {
    /// Creates a monitor that needs `min_samples` before judging and flags
    /// frames averaging more than `threshold_factor` target intervals.
    pub fn new(min_samples: usize, threshold_factor: f32) -> Self {
        Self {
            samples: RingBuffer::new(),
            min_samples: min_samples.clamp(1, FRAME_WINDOW),
            threshold_factor,
        }
    }

    /// Records one frame duration in milliseconds.
    pub fn record(&mut self, frame_ms: f32) {
        self.samples.push(frame_ms);
    }

    /// Drops every retained sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of retained samples, never above [`FRAME_WINDOW`].
    pub fn sample_count(&self) -> usize {
        self.samples.count()
    }

    /// Mean frame time in milliseconds, `0.0` without samples.
    pub fn average(&self) -> f32 {
        self.samples.average()
    }

    /// Standard deviation of the frame times, in milliseconds.
    pub fn jitter_ms(&self) -> f32 {
        self.samples.variance().sqrt()
    }

    /// Slowest retained frame, `0.0` without samples.
    pub fn worst_ms(&self) -> f32 {
        self.samples.max().unwrap_or(0.0)
    }

    /// Frame budget in milliseconds for `target_fps`.
    pub fn budget_ms(&self, target_fps: f32) -> f32 {
        self.threshold_factor * 1000.0 / target_fps.max(f32::EPSILON)
    }

    /// Judges the retained window against `target_fps`.
    pub fn evaluate(&self, target_fps: f32) -> PerformanceVerdict {
        if self.samples.count() < self.min_samples {
            return PerformanceVerdict::Insufficient;
        }
        let average_ms = self.samples.average();
        let budget_ms = self.budget_ms(target_fps);
        if average_ms > budget_ms {
            PerformanceVerdict::Overloaded {
                average_ms,
                budget_ms,
            }
        } else {
            PerformanceVerdict::Healthy { average_ms }
        }
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(30, 1.5)
    }
}
