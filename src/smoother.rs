// src/smoother.rs

use crate::types::CircleModel;
use std::collections::VecDeque;

/// Temporal smoother for the tip's radial slope using a sliding window.
///
/// Holds the most recent per-frame slopes of the line from the fitted
/// circle's center to the tip; the smoothed value is their arithmetic mean.
/// This is the only pipeline stage with cross-frame state, so it is owned
/// by the pipeline instance and never reset mid-run.
pub struct SlopeSmoother {
    history: VecDeque<f64>,
    window_size: usize,
}

impl SlopeSmoother {
    /// Create a new smoother with specified window size
    ///
    /// # Arguments
    /// * `window_size` - Number of frames to use for smoothing (e.g., 5 frames)
    pub fn new(window_size: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(window_size),
            window_size: window_size.max(1),
        }
    }

    /// Observe this frame's tip and return the smoothed radial slope.
    ///
    /// Returns `None` without touching the history when the slope is
    /// undefined (tip and center share an x-coordinate) — the history must
    /// never be padded with a placeholder.
    pub fn update(&mut self, circle: &CircleModel, tip: (f32, f32)) -> Option<f64> {
        let dx = tip.0 as f64 - circle.cx;
        if dx.abs() < 1e-9 {
            return None;
        }
        let slope = (tip.1 as f64 - circle.cy) / dx;

        self.history.push_back(slope);

        // Maintain window size
        if self.history.len() > self.window_size {
            self.history.pop_front();
        }

        self.mean()
    }

    /// Arithmetic mean of the current history, if any.
    pub fn mean(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().sum::<f64>() / self.history.len() as f64)
    }

    /// Get the number of frames currently in the history
    pub fn history_size(&self) -> usize {
        self.history.len()
    }
}
