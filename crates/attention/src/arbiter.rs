//! State arbitration
//!
//! Resolves the per-signal detector outcomes into one mutually
//! exclusive attentional state per frame. Fixed first-match-wins
//! priority: absence overrides everything (other signals are
//! meaningless without a subject), nodding and drowsiness share the
//! drowsy state, yawning ranks below both, focused is the default.

use crate::detectors::Detection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutually exclusive attentional state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionState {
    #[default]
    Focused,
    Drowsy,
    Yawning,
    NotPresent,
}

impl fmt::Display for AttentionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttentionState::Focused => "focused",
            AttentionState::Drowsy => "drowsy",
            AttentionState::Yawning => "yawning",
            AttentionState::NotPresent => "not_present",
        };
        f.write_str(name)
    }
}

/// Debug signals carried on each status snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusTelemetry {
    /// Smoothed eye aspect ratio.
    pub smoothed_ear: f32,
    /// Smoothed yawn probability.
    pub yawn_probability: f32,
    /// Current drowsiness score.
    pub drowsiness_score: f32,
    /// Seconds since the face was last found facing forward.
    pub secs_since_attentive: f32,
}

/// Per-frame output snapshot, the only state visible to external
/// consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionStatus {
    pub state: AttentionState,
    /// Confidence of the winning detector, in [0, 1]; 0 for focused.
    pub confidence: f32,
    pub face_found: bool,
    pub face_forward: bool,
    /// Snapshot timestamp (milliseconds since epoch).
    pub timestamp_ms: u64,
    pub telemetry: StatusTelemetry,
}

impl AttentionStatus {
    /// Status before any frame has been processed.
    pub fn initial(timestamp_ms: u64) -> Self {
        Self {
            state: AttentionState::Focused,
            confidence: 0.0,
            face_found: false,
            face_forward: false,
            timestamp_ms,
            telemetry: StatusTelemetry::default(),
        }
    }
}

/// Combines detector outcomes into one state per frame.
///
/// Inconclusive outcomes carry the detector's previous outcome
/// forward, so a single malformed frame cannot drop an active state.
#[derive(Debug, Default)]
pub struct StateArbiter {
    prev_drowsy: Option<Detection>,
    prev_nodding: Option<Detection>,
    prev_yawning: Option<Detection>,
}

impl StateArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        presence: Detection,
        drowsy: Detection,
        nodding: Detection,
        yawning: Detection,
    ) -> (AttentionState, f32) {
        let drowsy = carry(&mut self.prev_drowsy, drowsy);
        let nodding = carry(&mut self.prev_nodding, nodding);
        let yawning = carry(&mut self.prev_yawning, yawning);

        if presence.fired() {
            (AttentionState::NotPresent, presence.confidence())
        } else if nodding.fired() {
            // Nodding counts as drowsiness at full confidence
            (AttentionState::Drowsy, 1.0)
        } else if drowsy.fired() {
            (AttentionState::Drowsy, drowsy.confidence())
        } else if yawning.fired() {
            (AttentionState::Yawning, yawning.confidence())
        } else {
            (AttentionState::Focused, 0.0)
        }
    }
}

fn carry(prev: &mut Option<Detection>, current: Detection) -> Detection {
    if current == Detection::Inconclusive {
        prev.unwrap_or(Detection::Clear)
    } else {
        *prev = Some(current);
        current
    }
}
