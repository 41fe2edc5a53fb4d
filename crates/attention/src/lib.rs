//! Attention Monitoring Core
//!
//! Real-time classification of a subject's attentional state from
//! facial-landmark geometry:
//! - Drowsiness (eye closure scoring with hysteresis)
//! - Yawning (mouth opening + optional image classifier)
//! - Head nodding (chin oscillation)
//! - Presence / orientation (absence with look-away memory)
//!
//! One frame flows synchronously through feature extraction, the
//! per-signal detectors, the state arbiter, and the session
//! aggregator before the next frame is read. At most one in-flight
//! frame mutates detector state; concurrent readers get the latest
//! whole-status snapshot through [`StatusFeed`].

pub mod alert;
pub mod arbiter;
pub mod classifier;
pub mod config;
pub mod detectors;
pub mod snapshot;
pub mod stats;

pub use alert::AlertGate;
pub use arbiter::{AttentionState, AttentionStatus, StateArbiter, StatusTelemetry};
pub use classifier::{mouth_region, YawnClassifier};
pub use config::AttentionConfig;
pub use detectors::{
    Detection, DrowsinessDetector, NoddingDetector, PresenceDetector, YawnDetector,
};
pub use snapshot::StatusFeed;
pub use stats::{FocusBand, SessionAggregator, SessionStats, SessionSummary};

use face_geometry::LandmarkProvider;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use video_frame::VideoFrame;

/// Attention pipeline error types.
#[derive(Error, Debug)]
pub enum AttentionError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Initialize tracing output for binaries and demos.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// One monitoring session: landmark provider, detectors, arbiter, and
/// statistics, driven by [`AttentionMonitor::process_frame`] once per
/// captured frame.
pub struct AttentionMonitor {
    config: AttentionConfig,
    provider: Box<dyn LandmarkProvider + Send>,
    classifier: YawnClassifier,
    drowsiness: DrowsinessDetector,
    yawning: YawnDetector,
    nodding: NoddingDetector,
    presence: PresenceDetector,
    arbiter: StateArbiter,
    aggregator: SessionAggregator,
    feed: StatusFeed,
}

impl AttentionMonitor {
    /// Create a monitor. The yawn classifier capability is decided
    /// here, once; there is no runtime model retry.
    pub fn new(
        config: AttentionConfig,
        provider: Box<dyn LandmarkProvider + Send>,
    ) -> Result<Self, AttentionError> {
        let classifier = YawnClassifier::new(&config)?;
        info!(
            "Attention monitor ready (yawn classifier available: {})",
            classifier.available()
        );

        let now = Instant::now();
        Ok(Self {
            drowsiness: DrowsinessDetector::new(&config),
            yawning: YawnDetector::new(&config),
            nodding: NoddingDetector::new(&config),
            presence: PresenceDetector::new(now),
            arbiter: StateArbiter::new(),
            aggregator: SessionAggregator::new(now),
            feed: StatusFeed::new(AttentionStatus::initial(epoch_ms())),
            classifier,
            provider,
            config,
        })
    }

    /// Process one captured frame and return the arbitrated status.
    pub fn process_frame(&mut self, frame: &VideoFrame) -> AttentionStatus {
        self.process_frame_at(frame, Instant::now())
    }

    /// Frame processing against an explicit clock, for deterministic
    /// replay and tests.
    pub fn process_frame_at(&mut self, frame: &VideoFrame, now: Instant) -> AttentionStatus {
        let landmarks = self.provider.detect_face(frame);
        let face_found = landmarks.is_some();
        let mut face_forward = false;

        let (drowsy, nodding, yawning) = match &landmarks {
            Some(lm) => {
                let sample = face_geometry::extract(lm);
                face_forward = sample.head_deviation <= self.config.forward_deviation_px;

                let drowsy = self.drowsiness.update(sample.ear, &self.config);
                let nodding = self.nodding.update(sample.chin_y, &self.config);

                let mouth = mouth_region(frame, lm, self.config.mouth_crop_pad);
                let classifier = &mut self.classifier;
                let yawning = self.yawning.update(
                    sample.mar,
                    || mouth.as_ref().and_then(|m| classifier.classify(m)),
                    &self.config,
                );
                (drowsy, nodding, yawning)
            }
            // No face: detector state carries over unchanged
            None => (
                Detection::Inconclusive,
                Detection::Inconclusive,
                Detection::Inconclusive,
            ),
        };

        let presence = self.presence.update(face_found, face_forward, now, &self.config);
        let (state, confidence) = self.arbiter.resolve(presence, drowsy, nodding, yawning);
        self.aggregator.observe(state, now);

        let status = AttentionStatus {
            state,
            confidence,
            face_found,
            face_forward,
            timestamp_ms: epoch_ms(),
            telemetry: StatusTelemetry {
                smoothed_ear: self.drowsiness.smoothed_ear(),
                yawn_probability: self.yawning.smoothed_probability(),
                drowsiness_score: self.drowsiness.score(),
                secs_since_attentive: self.presence.secs_since_attentive(now),
            },
        };
        self.feed.publish(status.clone());
        status
    }

    /// Read-only statistics snapshot; idempotent between frames.
    pub fn session_stats(&self) -> SessionStats {
        self.aggregator.snapshot()
    }

    /// Flush the final open interval and return the closed-out
    /// session statistics.
    pub fn end_session(&mut self) -> SessionStats {
        self.end_session_at(Instant::now())
    }

    pub fn end_session_at(&mut self, now: Instant) -> SessionStats {
        let stats = self.aggregator.finalize(now);
        info!(
            "Session ended: {:.1}s total, {} drowsy / {} yawn / {} absence events",
            stats.total_secs(),
            stats.drowsy_events,
            stats.yawn_events,
            stats.not_present_events
        );
        stats
    }

    /// Reinitialize all detector state and statistics. Frame capture
    /// and the classifier capability are unaffected.
    pub fn reset_session(&mut self) {
        self.reset_session_at(Instant::now());
    }

    pub fn reset_session_at(&mut self, now: Instant) {
        self.drowsiness = DrowsinessDetector::new(&self.config);
        self.yawning = YawnDetector::new(&self.config);
        self.nodding = NoddingDetector::new(&self.config);
        self.presence = PresenceDetector::new(now);
        self.arbiter = StateArbiter::new();
        self.aggregator.reset(now);
        info!("Session state reset");
    }

    /// Reader handle for the latest status snapshot, safe to use from
    /// a concurrent serving boundary.
    pub fn subscribe(&self) -> watch::Receiver<AttentionStatus> {
        self.feed.subscribe()
    }

    /// Whether the yawn classifier loaded and has not degraded.
    pub fn classifier_available(&self) -> bool {
        self.classifier.available()
    }

    pub fn config(&self) -> &AttentionConfig {
        &self.config
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
