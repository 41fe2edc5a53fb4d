//! Optional yawn classifier
//!
//! Wraps an ONNX image classifier behind a capability decided once at
//! startup: either a model loads and classifies cropped mouth regions,
//! or the yawning detector runs on the geometric heuristic alone. A
//! runtime inference failure degrades to the heuristic for the rest of
//! the run; it is logged, never escalated.

use crate::config::AttentionConfig;
use crate::AttentionError;
use face_geometry::{mouth_extents, LandmarkSet};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use tracing::{error, info, warn};
use video_frame::{Region, VideoFrame};

/// ONNX-backed yawn probability classifier.
pub struct YawnClassifier {
    session: Option<Session>,
    input_size: u32,
    degraded: bool,
}

impl YawnClassifier {
    /// Load the model if one is configured. A missing path is a valid
    /// configuration (geometry-only mode); a path that fails to load
    /// is an error.
    pub fn new(config: &AttentionConfig) -> Result<Self, AttentionError> {
        let session = match &config.yawn_model_path {
            Some(path) => {
                info!("Loading yawn classifier from {}", path);
                Some(load_session(path)?)
            }
            None => {
                info!("No yawn model configured; yawning uses the geometric fallback");
                None
            }
        };

        Ok(Self {
            session,
            input_size: config.classifier_input_size,
            degraded: false,
        })
    }

    /// Whether classifier output can be obtained this frame.
    pub fn available(&self) -> bool {
        self.session.is_some() && !self.degraded
    }

    /// Classify a cropped mouth region into a yawn probability.
    /// Returns `None` when unavailable; an inference failure switches
    /// to unavailable for the remainder of the run.
    pub fn classify(&mut self, mouth: &VideoFrame) -> Option<f32> {
        if !self.available() {
            return None;
        }
        match self.run_inference(mouth) {
            Ok(prob) => Some(prob.clamp(0.0, 1.0)),
            Err(e) => {
                warn!("Yawn classifier failed ({e}); using geometric fallback from here on");
                self.degraded = true;
                None
            }
        }
    }

    fn run_inference(&self, mouth: &VideoFrame) -> Result<f32, AttentionError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AttentionError::Inference("no session loaded".into()))?;

        // Preprocess: resize to the model's square input, scale to 0..1
        let img = image::ImageBuffer::<image::Rgb<u8>, _>::from_raw(
            mouth.width,
            mouth.height,
            mouth.data.as_slice(),
        )
        .ok_or_else(|| AttentionError::ImageProcessing("failed to create image buffer".into()))?;

        let size = self.input_size;
        let resized =
            image::imageops::resize(&img, size, size, image::imageops::FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let outputs = session
            .run(ort::inputs![input].map_err(|e| AttentionError::Inference(e.to_string()))?)
            .map_err(|e| AttentionError::Inference(e.to_string()))?;

        let tensor = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| AttentionError::Inference(e.to_string()))?;
        tensor
            .iter()
            .next()
            .copied()
            .ok_or_else(|| AttentionError::Inference("empty classifier output".into()))
    }
}

fn load_session(path: &str) -> Result<Session, AttentionError> {
    Session::builder()
        .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
        .and_then(|builder| builder.commit_from_file(path))
        .map_err(|e| {
            error!("Failed to load yawn model: {}", e);
            AttentionError::ModelLoad(e.to_string())
        })
}

/// Crop the padded mouth region out of a frame. `None` when mouth
/// landmarks are missing or the region degenerates after clamping.
pub fn mouth_region(frame: &VideoFrame, landmarks: &LandmarkSet, pad: f32) -> Option<VideoFrame> {
    let (x_min, x_max, y_min, y_max) = mouth_extents(landmarks)?;
    let region = Region::from_extents(x_min, x_max, y_min, y_max, pad, frame.width, frame.height)?;
    frame.crop(region)
}
