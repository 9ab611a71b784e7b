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

//! Rate limiting for repeated error reports.

use std::time::{Duration, Instant};

/// Lets one report through per interval and counts what it swallowed.
#[derive(Debug, Clone)]
pub struct ErrorThrottle {
    min_interval: Duration,
    last_report: Option<Instant>,
    suppressed: u64,
}

impl ErrorThrottle {
    /// Creates a throttle allowing one report per `min_interval`.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_report: None,
            suppressed: 0,
        }
    }

    /// Returns `true` if a report made at `now` should be emitted.
    ///
    /// The first report always passes.
    pub fn should_report(&mut self, now: Instant) -> bool {
        let allowed = match self.last_report {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if allowed {
            self.last_report = Some(now);
        } else {
            self.suppressed += 1;
        }
        allowed
    }

    /// Reports swallowed since construction.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}
