//! Monitoring configuration

use crate::AttentionError;
use serde::{Deserialize, Serialize};

/// Attention monitoring configuration.
///
/// The detection constants were tuned empirically against recorded
/// study sessions; treat them as adjustable parameters rather than
/// fixed law.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionConfig {
    /// EAR below which eyes count as very droopy.
    pub ear_droopy: f32,
    /// EAR below which eyes count as borderline droopy.
    pub ear_borderline: f32,
    /// EAR above which eyes count as clearly open.
    pub ear_open: f32,
    /// Drowsiness score above which (with droopy EAR) drowsy fires.
    pub drowsiness_score_threshold: f32,
    /// Score divisor mapping the drowsiness score to a confidence.
    pub drowsiness_confidence_scale: f32,
    /// Consecutive low-EAR frames that fire drowsy on their own.
    pub drowsy_consec_frames: u32,

    /// Smoothed MAR above which the mouth is plausibly open.
    pub mar_gate: f32,
    /// Smoothed yawn probability above which a frame qualifies.
    pub yawn_prob_threshold: f32,
    /// Consecutive qualifying frames required to fire a yawn.
    pub yawn_consec_frames: u32,
    /// Padding (pixels) around the mouth landmarks for the crop.
    pub mouth_crop_pad: f32,

    /// Chin-movement range (pixels) counted as a nod oscillation.
    pub nod_range_px: f32,
    /// Nod counter value above which nodding fires.
    pub nod_counter_threshold: u32,
    /// Chin samples evaluated per sliding range check.
    pub nod_eval_samples: usize,

    /// Head deviation (pixels) up to which the face counts as forward.
    pub forward_deviation_px: f32,
    /// Seconds of not-found / not-forward before absence fires.
    pub absence_timeout_secs: f32,

    /// Window capacities for the temporal smoothers.
    pub ear_window: usize,
    pub mar_window: usize,
    pub yawn_prob_window: usize,
    pub chin_window: usize,

    /// Yawn classifier model path; `None` disables the classifier and
    /// the detector uses the geometric fallback.
    pub yawn_model_path: Option<String>,
    /// Square input edge (pixels) the classifier expects.
    pub classifier_input_size: u32,

    /// Minimum seconds between repeated alerts of the same kind.
    pub alert_cooldown_secs: f32,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            ear_droopy: 0.27,
            ear_borderline: 0.32,
            ear_open: 0.35,
            drowsiness_score_threshold: 20.0,
            drowsiness_confidence_scale: 25.0,
            drowsy_consec_frames: 10,

            mar_gate: 0.4,
            yawn_prob_threshold: 0.85,
            yawn_consec_frames: 17,
            mouth_crop_pad: 10.0,

            nod_range_px: 15.0,
            nod_counter_threshold: 5,
            nod_eval_samples: 5,

            forward_deviation_px: 25.0,
            absence_timeout_secs: 3.0,

            ear_window: smoothing::EAR_WINDOW,
            mar_window: smoothing::MAR_WINDOW,
            yawn_prob_window: smoothing::YAWN_PROB_WINDOW,
            chin_window: smoothing::CHIN_WINDOW,

            yawn_model_path: None,
            classifier_input_size: 24,

            alert_cooldown_secs: 5.0,
        }
    }
}

impl AttentionConfig {
    /// Stricter preset: flags absence and drowsiness sooner.
    pub fn strict() -> Self {
        Self {
            drowsiness_score_threshold: 15.0,
            drowsy_consec_frames: 8,
            absence_timeout_secs: 2.0,
            forward_deviation_px: 20.0,
            ..Default::default()
        }
    }

    /// Lenient preset: tolerates longer look-aways and droopier eyes.
    pub fn lenient() -> Self {
        Self {
            drowsiness_score_threshold: 30.0,
            drowsy_consec_frames: 15,
            absence_timeout_secs: 6.0,
            forward_deviation_px: 40.0,
            ..Default::default()
        }
    }

    /// Load configuration from a file (TOML/JSON/YAML by extension),
    /// with unset keys filled from the defaults.
    pub fn from_file(path: &str) -> Result<Self, AttentionError> {
        let defaults = config::Config::try_from(&AttentionConfig::default())
            .map_err(|e| AttentionError::Config(e.to_string()))?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| AttentionError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AttentionError::Config(e.to_string()))
    }
}
