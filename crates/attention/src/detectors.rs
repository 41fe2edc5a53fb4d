//! Per-signal behavioral detectors
//!
//! Each detector owns its counters and score, persists across frames
//! for the lifetime of a monitoring session, and applies a hysteresis
//! policy: sustained or accumulated evidence is required before a
//! behavior fires, so single-frame landmark noise cannot flip a state.

use crate::config::AttentionConfig;
use smoothing::SmoothingWindow;
use std::time::Instant;

/// Outcome of one detector evaluation.
///
/// `Inconclusive` means the frame carried no usable signal (degenerate
/// landmarks, no face); the detector's state is left untouched and the
/// arbiter carries the previous outcome forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detection {
    Fired { confidence: f32 },
    Clear,
    Inconclusive,
}

impl Detection {
    pub fn fired(&self) -> bool {
        matches!(self, Detection::Fired { .. })
    }

    pub fn confidence(&self) -> f32 {
        match self {
            Detection::Fired { confidence } => *confidence,
            _ => 0.0,
        }
    }
}

/// Gradual drowsiness detection over smoothed EAR.
///
/// An accumulating score catches slow eyelid sagging while a
/// consecutive-low-frame streak catches sudden prolonged closure. The
/// clearly-open band decays the score faster than the droopy bands
/// grow it, so recovery outpaces onset and transient blinks do not
/// accumulate into a false trigger.
#[derive(Debug)]
pub struct DrowsinessDetector {
    ear_window: SmoothingWindow,
    score: f32,
    streak: u32,
}

impl DrowsinessDetector {
    pub fn new(config: &AttentionConfig) -> Self {
        Self {
            ear_window: SmoothingWindow::new(config.ear_window),
            score: 0.0,
            streak: 0,
        }
    }

    /// Feed one raw per-frame EAR. A degenerate zero is inconclusive
    /// and mutates nothing.
    pub fn update(&mut self, ear: f32, config: &AttentionConfig) -> Detection {
        if ear <= 0.0 {
            return Detection::Inconclusive;
        }
        let smoothed = self.ear_window.push(ear);
        self.apply(smoothed, config)
    }

    /// Score one smoothed EAR sample. Exposed separately so the
    /// hysteresis policy can be exercised on exact input sequences.
    pub fn apply(&mut self, smoothed_ear: f32, config: &AttentionConfig) -> Detection {
        if smoothed_ear <= 0.0 {
            return Detection::Inconclusive;
        }

        if smoothed_ear < config.ear_droopy {
            self.score += 3.0;
            self.streak += 1;
        } else if smoothed_ear < config.ear_borderline {
            self.score += 1.0;
            self.streak += 1;
        } else if smoothed_ear > config.ear_open {
            self.score = (self.score - 3.0).max(0.0);
            self.streak = 0;
        } else {
            self.score = (self.score - 1.0).max(0.0);
            self.streak = 0;
        }

        let score_trigger =
            self.score > config.drowsiness_score_threshold && smoothed_ear < config.ear_borderline;
        if score_trigger || self.streak >= config.drowsy_consec_frames {
            Detection::Fired {
                confidence: (self.score / config.drowsiness_confidence_scale).min(1.0),
            }
        } else {
            Detection::Clear
        }
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn smoothed_ear(&self) -> f32 {
        self.ear_window.mean()
    }
}

/// Yawning detection gated on mouth opening.
///
/// Frames only qualify once the smoothed MAR clears the gate; the yawn
/// probability (classifier output or geometric fallback) is then
/// smoothed and must stay above threshold for a full streak of
/// qualifying frames. Firing resets the streak so each yawn episode
/// reports exactly once, re-armed immediately.
#[derive(Debug)]
pub struct YawnDetector {
    mar_window: SmoothingWindow,
    prob_window: SmoothingWindow,
    streak: u32,
}

impl YawnDetector {
    pub fn new(config: &AttentionConfig) -> Self {
        Self {
            mar_window: SmoothingWindow::new(config.mar_window),
            prob_window: SmoothingWindow::new(config.yawn_prob_window),
            streak: 0,
        }
    }

    /// Feed one raw per-frame MAR. `classify` is invoked only when the
    /// smoothed MAR clears the gate; `None` (classifier unavailable)
    /// falls back to the linear geometric heuristic.
    pub fn update(
        &mut self,
        mar: f32,
        classify: impl FnOnce() -> Option<f32>,
        config: &AttentionConfig,
    ) -> Detection {
        if mar <= 0.0 {
            return Detection::Inconclusive;
        }

        let smoothed_mar = self.mar_window.push(mar);
        if smoothed_mar <= config.mar_gate {
            self.streak = 0;
            return Detection::Clear;
        }

        let prob = classify()
            .unwrap_or_else(|| ((smoothed_mar - 0.5) * 2.0).clamp(0.0, 1.0));
        let avg_prob = self.prob_window.push(prob);

        if avg_prob > config.yawn_prob_threshold {
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        if self.streak >= config.yawn_consec_frames {
            self.streak = 0;
            Detection::Fired {
                confidence: avg_prob,
            }
        } else {
            Detection::Clear
        }
    }

    pub fn smoothed_probability(&self) -> f32 {
        self.prob_window.mean()
    }
}

/// Head-nodding detection over the chin's vertical trajectory.
///
/// The range over a short sliding window captures oscillatory up/down
/// motion while staying insensitive to a steady head position.
#[derive(Debug)]
pub struct NoddingDetector {
    chin_window: SmoothingWindow,
    counter: u32,
}

impl NoddingDetector {
    pub fn new(config: &AttentionConfig) -> Self {
        Self {
            chin_window: SmoothingWindow::new(config.chin_window),
            counter: 0,
        }
    }

    /// Feed one chin y-coordinate (pixels).
    pub fn update(&mut self, chin_y: f32, config: &AttentionConfig) -> Detection {
        if chin_y <= 0.0 {
            return Detection::Inconclusive;
        }

        self.chin_window.push(chin_y);
        let range = match self.chin_window.recent_range(config.nod_eval_samples) {
            Some(range) => range,
            // Still warming up
            None => return Detection::Clear,
        };

        if range > config.nod_range_px {
            self.counter += 1;
        } else {
            self.counter = self.counter.saturating_sub(1);
        }

        if self.counter > config.nod_counter_threshold {
            self.counter = 0;
            Detection::Fired { confidence: 1.0 }
        } else {
            Detection::Clear
        }
    }
}

/// Presence / orientation detection with look-away memory.
///
/// Brief look-aways and landmark dropouts are tolerated; absence only
/// fires once the face has been missing or turned away for longer than
/// the configured timeout.
#[derive(Debug)]
pub struct PresenceDetector {
    last_attentive: Instant,
}

impl PresenceDetector {
    pub fn new(now: Instant) -> Self {
        Self {
            last_attentive: now,
        }
    }

    pub fn update(
        &mut self,
        face_found: bool,
        face_forward: bool,
        now: Instant,
        config: &AttentionConfig,
    ) -> Detection {
        if face_found && face_forward {
            self.last_attentive = now;
            return Detection::Clear;
        }

        if self.secs_since_attentive(now) > config.absence_timeout_secs {
            Detection::Fired { confidence: 1.0 }
        } else {
            Detection::Clear
        }
    }

    pub fn secs_since_attentive(&self, now: Instant) -> f32 {
        now.duration_since(self.last_attentive).as_secs_f32()
    }
}
