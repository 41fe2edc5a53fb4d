//! Bounded FIFO window with running mean and sliding range

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Fixed-capacity FIFO over recent scalar samples.
///
/// Pushing beyond capacity evicts the oldest sample. The window length
/// never exceeds the configured capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingWindow {
    values: VecDeque<f32>,
    capacity: usize,
}

impl SmoothingWindow {
    /// Create a window with the given capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if over capacity, and
    /// return the arithmetic mean of the current buffer.
    pub fn push(&mut self, value: f32) -> f32 {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.mean()
    }

    /// Arithmetic mean of the buffered samples (0.0 when empty).
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    /// Range (max - min) over the newest `n` samples, or `None` until
    /// at least `n` samples have been collected.
    pub fn recent_range(&self, n: usize) -> Option<f32> {
        if n == 0 || self.values.len() < n {
            return None;
        }
        let recent = self.values.iter().rev().take(n);
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in recent {
            min = min.min(v);
            max = max.max(v);
        }
        Some(max - min)
    }

    /// Most recently pushed sample.
    pub fn last(&self) -> Option<f32> {
        self.values.back().copied()
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all buffered samples.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
