//! Temporal Smoothing Windows
//!
//! Fixed-capacity FIFO buffers over recent scalar samples. Detectors
//! compare smoothed means rather than raw per-frame values so that
//! single-frame landmark jitter cannot flip a behavioral state.

mod window;

pub use window::SmoothingWindow;

/// Default window capacity for mouth-aspect-ratio smoothing.
pub const MAR_WINDOW: usize = 5;
/// Default window capacity for eye-aspect-ratio smoothing.
pub const EAR_WINDOW: usize = 10;
/// Default window capacity for yawn-probability smoothing.
pub const YAWN_PROB_WINDOW: usize = 10;
/// Default window capacity for chin-position tracking.
pub const CHIN_WINDOW: usize = 10;
