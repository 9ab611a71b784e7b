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

//! Control primitives the execution engine composes to watch itself:
//! rolling frame statistics, the degradation threshold, error reporting
//! throttles and per-subsystem failure accounting.

#![warn(missing_docs)]

pub mod failures;
pub mod fps;
pub mod metrics;
pub mod performance;
pub mod throttle;

pub use failures::{FailureCounts, FailureLedger};
pub use fps::{clamp_frame_delta, FpsCounter};
pub use metrics::RingBuffer;
pub use performance::{PerformanceMonitor, PerformanceVerdict, FRAME_WINDOW};
pub use throttle::ErrorThrottle;
