//! Facial Landmark Geometry
//!
//! Landmark model for a MediaPipe-style face mesh plus the pure
//! geometric feature extractors the attention pipeline runs per frame:
//! - Eye aspect ratio (EAR): eyelid closure proxy
//! - Mouth aspect ratio (MAR): mouth-opening proxy
//! - Head deviation: nose-to-eye-midpoint offset, a proxy for head yaw
//! - Chin position: vertical chin coordinate for nodding detection
//!
//! All extractors are total: malformed or incomplete landmark data
//! yields a degenerate zero, never an error.

pub mod features;
pub mod landmarks;

pub use features::{
    extract, eye_aspect_ratio, head_deviation, mouth_aspect_ratio, mouth_extents, FeatureSample,
};
pub use landmarks::{LandmarkProvider, LandmarkSet};
