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

//! Fixed-capacity storage for rolling frame samples.

/// A fixed-size circular buffer for numerical samples.
///
/// The length never exceeds `N`; pushing into a full buffer overwrites the
/// oldest sample.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    index: usize,
    count: usize,
}

impl<T: Default + Copy, const N: usize> RingBuffer<T, N> {
    /// Creates a new, empty ring buffer.
    pub fn new() -> Self {
        Self {
            data: [T::default(); N],
            index: 0,
            count: 0,
        }
    }

    /// Pushes a value, overwriting the oldest one if full.
    pub fn push(&mut self, value: T) {
        if N == 0 {
            return;
        }
        self.data[self.index] = value;
        self.index = (self.index + 1) % N;
        if self.count < N {
            self.count += 1;
        }
    }

    /// Number of samples currently held.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of samples.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns `true` when no samples are held.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` when the next push evicts a sample.
    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Drops every sample.
    pub fn clear(&mut self) {
        self.index = 0;
        self.count = 0;
    }

    /// The most recently pushed sample.
    pub fn latest(&self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        Some(self.data[(self.index + N - 1) % N])
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let start = (self.index + N - self.count) % N.max(1);
        (0..self.count).map(move |i| &self.data[(start + i) % N])
    }
}

impl<T: Default + Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<f32, N> {
    /// Arithmetic mean, `0.0` when empty.
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.iter().sum::<f32>() / self.count as f32
    }

    /// Population variance. High variance in frame times means stutter.
    pub fn variance(&self) -> f32 {
        if self.count < 2 {
            return 0.0;
        }
        let avg = self.average();
        let sum_sq: f32 = self.iter().map(|v| (v - avg) * (v - avg)).sum();
        sum_sq / self.count as f32
    }

    /// Largest sample, `None` when empty.
    pub fn max(&self) -> Option<f32> {
        self.iter().copied().reduce(f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_push_and_iter() {
        let mut rb = RingBuffer::<f32, 3>::new();
        rb.push(1.0);
        rb.push(2.0);
        rb.push(3.0);
        rb.push(4.0); // Overwrites 1.0

        let values: Vec<f32> = rb.iter().copied().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(rb.count(), 3);
        assert_eq!(rb.latest(), Some(4.0));
    }

    #[test]
    fn test_ring_buffer_partial_iter_is_chronological() {
        let mut rb = RingBuffer::<f32, 5>::new();
        rb.push(7.0);
        rb.push(8.0);
        let values: Vec<f32> = rb.iter().copied().collect();
        assert_eq!(values, vec![7.0, 8.0]);
        assert!(!rb.is_full());
    }

    #[test]
    fn test_ring_buffer_length_is_bounded() {
        let mut rb = RingBuffer::<f32, 60>::new();
        for i in 0..500 {
            rb.push(i as f32);
            assert!(rb.count() <= rb.capacity());
        }
        assert!(rb.is_full());
        assert_eq!(rb.iter().next().copied(), Some(440.0));
    }

    #[test]
    fn test_ring_buffer_average() {
        let mut rb = RingBuffer::<f32, 4>::new();
        rb.push(10.0);
        rb.push(20.0);
        assert_eq!(rb.average(), 15.0);
    }

    #[test]
    fn test_ring_buffer_variance() {
        let mut rb = RingBuffer::<f32, 4>::new();
        for v in [5.0, 15.0, 5.0, 15.0] {
            rb.push(v);
        }
        assert!((rb.variance() - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_ring_buffer_max() {
        let mut rb = RingBuffer::<f32, 4>::new();
        for v in [3.0, 1.0, 4.0, 1.5] {
            rb.push(v);
        }
        assert_eq!(rb.max(), Some(4.0));
    }

    #[test]
    fn test_ring_buffer_clear() {
        let mut rb = RingBuffer::<f32, 4>::new();
        rb.push(1.0);
        rb.push(2.0);
        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.average(), 0.0);
        assert_eq!(rb.latest(), None);
        assert_eq!(rb.max(), None);
        rb.push(9.0);
        assert_eq!(rb.iter().copied().collect::<Vec<_>>(), vec![9.0]);
    }
}
