//! Replays a scripted study session through the monitor and prints
//! the final session report as JSON.
//!
//! Run with: cargo run --example synthetic_session

use attention::{init_logging, AttentionConfig, AttentionMonitor};
use face_geometry::landmarks::{
    LandmarkProvider, LandmarkSet, CHIN, FACE_MESH_POINTS, LEFT_EYE, MOUTH_BOTTOM, MOUTH_LEFT,
    MOUTH_RIGHT, MOUTH_TOP, NOSE_TIP, RIGHT_EYE, RIGHT_EYE_OUTER,
};
use std::time::{Duration, Instant};
use tracing::info;
use video_frame::VideoFrame;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Scripted subject: attentive, then increasingly drowsy, then a
/// yawn, then gone from the desk.
struct ScriptedSubject {
    frame_no: u32,
}

impl ScriptedSubject {
    fn landmarks(ear: f32, mar: f32, chin_y: f32) -> LandmarkSet {
        let mut points = vec![(200.0, 150.0); FACE_MESH_POINTS];
        for (indices, x_left) in [(&RIGHT_EYE, 100.0), (&LEFT_EYE, 240.0)] {
            let half = ear * 20.0;
            points[indices[0]] = (x_left, 100.0);
            points[indices[1]] = (x_left + 10.0, 100.0 - half);
            points[indices[2]] = (x_left + 30.0, 100.0 - half);
            points[indices[3]] = (x_left + 40.0, 100.0);
            points[indices[4]] = (x_left + 30.0, 100.0 + half);
            points[indices[5]] = (x_left + 10.0, 100.0 + half);
        }
        points[RIGHT_EYE_OUTER] = (300.0, 100.0);
        points[NOSE_TIP] = (200.0, 130.0);
        points[MOUTH_LEFT] = (180.0, 200.0);
        points[MOUTH_RIGHT] = (220.0, 200.0);
        points[MOUTH_TOP] = (200.0, 200.0 - mar * 20.0);
        points[MOUTH_BOTTOM] = (200.0, 200.0 + mar * 20.0);
        points[CHIN] = (200.0, chin_y);
        LandmarkSet::from_points(points)
    }
}

impl LandmarkProvider for ScriptedSubject {
    fn detect_face(&mut self, _frame: &VideoFrame) -> Option<LandmarkSet> {
        let n = self.frame_no;
        self.frame_no += 1;
        match n {
            // ~10s of focused study
            0..=299 => Some(Self::landmarks(0.40, 0.30, 200.0)),
            // ~5s of droopy eyes
            300..=449 => Some(Self::landmarks(0.20, 0.30, 200.0)),
            // a long yawn
            450..=499 => Some(Self::landmarks(0.40, 0.95, 200.0)),
            // recovered
            500..=599 => Some(Self::landmarks(0.40, 0.30, 200.0)),
            // walked away
            _ => None,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut monitor = AttentionMonitor::new(
        AttentionConfig::default(),
        Box::new(ScriptedSubject { frame_no: 0 }),
    )?;

    let frame = VideoFrame::blank(320, 240);
    let base = Instant::now();
    monitor.reset_session_at(base);

    let total_frames = 750u32;
    let mut last_state = None;
    for i in 0..total_frames {
        let status = monitor.process_frame_at(&frame, base + FRAME_INTERVAL * i);
        if last_state != Some(status.state) {
            info!(
                "frame {}: {} (confidence {:.2})",
                i, status.state, status.confidence
            );
            last_state = Some(status.state);
        }
    }

    let stats = monitor.end_session_at(base + FRAME_INTERVAL * total_frames);
    println!("{}", serde_json::to_string_pretty(&stats.summary())?);
    Ok(())
}
