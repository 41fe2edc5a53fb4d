//! End-to-end pipeline tests over scripted landmark sequences at a
//! simulated 30 fps.

use attention::{AttentionConfig, AttentionMonitor, AttentionState};
use face_geometry::landmarks::{
    LandmarkProvider, LandmarkSet, CHIN, FACE_MESH_POINTS, LEFT_EYE, MOUTH_BOTTOM, MOUTH_LEFT,
    MOUTH_RIGHT, MOUTH_TOP, NOSE_TIP, RIGHT_EYE, RIGHT_EYE_OUTER,
};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use video_frame::VideoFrame;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Shape one six-point eye contour to an exact aspect ratio.
fn set_eye(points: &mut [(f32, f32)], indices: &[usize; 6], x_left: f32, ear: f32) {
    let half = ear * 20.0;
    points[indices[0]] = (x_left, 100.0);
    points[indices[1]] = (x_left + 10.0, 100.0 - half);
    points[indices[2]] = (x_left + 30.0, 100.0 - half);
    points[indices[3]] = (x_left + 40.0, 100.0);
    points[indices[4]] = (x_left + 30.0, 100.0 + half);
    points[indices[5]] = (x_left + 10.0, 100.0 + half);
}

/// Full face mesh with exact EAR, MAR, head deviation, and chin
/// position; every other point sits at a neutral coordinate.
fn synthetic_landmarks(ear: f32, mar: f32, deviation: f32, chin_y: f32) -> LandmarkSet {
    let mut points = vec![(200.0, 150.0); FACE_MESH_POINTS];

    set_eye(&mut points, &RIGHT_EYE, 100.0, ear);
    set_eye(&mut points, &LEFT_EYE, 240.0, ear);

    // Outer eye corners span x 100..300; their midpoint anchors the
    // head-deviation baseline at x = 200.
    points[RIGHT_EYE_OUTER] = (300.0, 100.0);
    points[NOSE_TIP] = (200.0 + deviation, 130.0);

    points[MOUTH_LEFT] = (180.0, 200.0);
    points[MOUTH_RIGHT] = (220.0, 200.0);
    points[MOUTH_TOP] = (200.0, 200.0 - mar * 20.0);
    points[MOUTH_BOTTOM] = (200.0, 200.0 + mar * 20.0);

    points[CHIN] = (200.0, chin_y);

    LandmarkSet::from_points(points)
}

/// Neutral attentive subject: eyes open, mouth closed, facing forward.
fn neutral() -> Option<LandmarkSet> {
    Some(synthetic_landmarks(0.40, 0.30, 0.0, 200.0))
}

struct ScriptedProvider {
    script: VecDeque<Option<LandmarkSet>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Option<LandmarkSet>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl LandmarkProvider for ScriptedProvider {
    fn detect_face(&mut self, _frame: &VideoFrame) -> Option<LandmarkSet> {
        self.script.pop_front().flatten()
    }
}

/// Monitor over a scripted landmark sequence, with the detector and
/// aggregator clocks aligned to `base`.
fn scripted_monitor(script: Vec<Option<LandmarkSet>>, base: Instant) -> AttentionMonitor {
    let mut monitor = AttentionMonitor::new(
        AttentionConfig::default(),
        Box::new(ScriptedProvider::new(script)),
    )
    .expect("monitor construction");
    monitor.reset_session_at(base);
    monitor
}

fn run_frames(
    monitor: &mut AttentionMonitor,
    frame: &VideoFrame,
    base: Instant,
    count: usize,
) -> Vec<AttentionState> {
    (0..count)
        .map(|i| {
            monitor
                .process_frame_at(frame, base + FRAME_INTERVAL * i as u32)
                .state
        })
        .collect()
}

#[test]
fn drowsy_state_settles_on_constant_low_ear() {
    let base = Instant::now();
    let script = (0..12)
        .map(|_| Some(synthetic_landmarks(0.18, 0.30, 0.0, 200.0)))
        .collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    let mut last = None;
    for i in 0..12u32 {
        let status = monitor.process_frame_at(&frame, base + FRAME_INTERVAL * i);
        if i >= 9 {
            assert_eq!(status.state, AttentionState::Drowsy, "frame {}", i + 1);
        }
        last = Some(status);
    }
    let last = last.unwrap();
    assert!(last.confidence > 0.8);
    assert!(last.face_found && last.face_forward);
    assert!((last.telemetry.smoothed_ear - 0.18).abs() < 1e-3);
}

#[test]
fn open_eyed_noise_never_goes_drowsy() {
    let base = Instant::now();
    let script = (0..50)
        .map(|_| Some(synthetic_landmarks(0.40, 0.30, 0.0, 200.0)))
        .collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    for state in run_frames(&mut monitor, &frame, base, 50) {
        assert_eq!(state, AttentionState::Focused);
    }
}

#[test]
fn yawn_fires_once_per_episode_and_rearms() {
    let base = Instant::now();
    // Eyes clearly open so drowsiness stays quiet; mouth wide open so
    // the geometric fallback yields probability 0.9
    let script = (0..34)
        .map(|_| Some(synthetic_landmarks(0.40, 0.95, 0.0, 200.0)))
        .collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    let states = run_frames(&mut monitor, &frame, base, 34);

    let yawns: Vec<usize> = states
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == AttentionState::Yawning)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(yawns, vec![16, 33], "one yawn per 17-frame episode");
}

#[test]
fn absence_fires_after_sustained_no_face() {
    let base = Instant::now();
    // 120 frames at ~30fps is ~4 seconds of no detection
    let script = (0..120).map(|_| None).collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    let states = run_frames(&mut monitor, &frame, base, 120);

    assert_eq!(*states.last().unwrap(), AttentionState::NotPresent);
    // Within the 3-second grace window the state stays focused
    assert_eq!(states[60], AttentionState::Focused);
}

#[test]
fn brief_dropout_does_not_flag_absence() {
    let base = Instant::now();
    let mut script: Vec<Option<LandmarkSet>> = (0..30).map(|_| neutral()).collect();
    script.extend((0..30).map(|_| None)); // ~1s dropout
    script.extend((0..30).map(|_| neutral()));
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    for state in run_frames(&mut monitor, &frame, base, 90) {
        assert_eq!(state, AttentionState::Focused);
    }
}

#[test]
fn turned_head_counts_as_absent_after_timeout() {
    let base = Instant::now();
    // Face visible the whole time but turned 40px off-center
    let script = (0..150)
        .map(|_| Some(synthetic_landmarks(0.40, 0.30, 40.0, 200.0)))
        .collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    let mut last = None;
    for i in 0..150u32 {
        last = Some(monitor.process_frame_at(&frame, base + FRAME_INTERVAL * i));
    }
    let last = last.unwrap();
    assert_eq!(last.state, AttentionState::NotPresent);
    assert!(last.face_found);
    assert!(!last.face_forward);
}

#[test]
fn malformed_landmarks_never_fire_detectors() {
    let base = Instant::now();
    // Incomplete detections: every feature degrades to zero
    let script = (0..50)
        .map(|_| Some(LandmarkSet::from_points(vec![(0.0, 0.0); 10])))
        .collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    for state in run_frames(&mut monitor, &frame, base, 50) {
        assert_eq!(state, AttentionState::Focused);
    }
    let stats = monitor.session_stats();
    assert_eq!(stats.drowsy_events, 0);
    assert_eq!(stats.yawn_events, 0);
}

#[test]
fn session_durations_sum_to_elapsed_time() {
    let base = Instant::now();
    let mut script: Vec<Option<LandmarkSet>> = (0..30).map(|_| neutral()).collect();
    script.extend((0..30).map(|_| Some(synthetic_landmarks(0.18, 0.30, 0.0, 200.0))));
    script.extend((0..30).map(|_| neutral()));
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    let mut elapsed = 0.0f64;
    for i in 0..90u32 {
        elapsed = (FRAME_INTERVAL * i).as_secs_f64();
        monitor.process_frame_at(&frame, base + FRAME_INTERVAL * i);
    }

    let stats = monitor.session_stats();
    let tolerance = FRAME_INTERVAL.as_secs_f64();
    assert!((stats.total_secs() - elapsed).abs() <= tolerance);
}

#[test]
fn session_stats_reads_are_idempotent() {
    let base = Instant::now();
    let script = (0..10).map(|_| neutral()).collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    run_frames(&mut monitor, &frame, base, 10);

    let first = monitor.session_stats();
    let second = monitor.session_stats();
    assert_eq!(first, second);
}

#[test]
fn reset_session_clears_state_and_stats() {
    let base = Instant::now();
    let mut script: Vec<Option<LandmarkSet>> = (0..30)
        .map(|_| Some(synthetic_landmarks(0.18, 0.30, 0.0, 200.0)))
        .collect();
    script.extend((0..5).map(|_| neutral()));
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    let states = run_frames(&mut monitor, &frame, base, 30);
    assert_eq!(*states.last().unwrap(), AttentionState::Drowsy);
    assert!(monitor.session_stats().drowsy_events >= 1);

    let reset_at = base + FRAME_INTERVAL * 30;
    monitor.reset_session_at(reset_at);
    assert_eq!(monitor.session_stats().total_secs(), 0.0);
    assert_eq!(monitor.session_stats().drowsy_events, 0);

    // Detector state is genuinely fresh: an open-eyed frame reads focused
    let status = monitor.process_frame_at(&frame, reset_at + FRAME_INTERVAL);
    assert_eq!(status.state, AttentionState::Focused);
    assert_eq!(status.telemetry.drowsiness_score, 0.0);
}

#[test]
fn end_session_flushes_final_interval() {
    let base = Instant::now();
    let script = (0..30).map(|_| neutral()).collect();
    let mut monitor = scripted_monitor(script, base);

    let frame = VideoFrame::blank(320, 240);
    run_frames(&mut monitor, &frame, base, 30);

    let end = base + Duration::from_secs(10);
    let stats = monitor.end_session_at(end);
    // The whole 10s lands in the focused bucket
    assert!((stats.focused_secs - 10.0).abs() < 1e-6);
    assert_eq!(stats.summary().focus_band, attention::FocusBand::Excellent);
}

#[test]
fn snapshot_feed_tracks_latest_status() {
    let base = Instant::now();
    let script = (0..5)
        .map(|_| Some(synthetic_landmarks(0.18, 0.30, 0.0, 200.0)))
        .collect();
    let mut monitor = scripted_monitor(script, base);
    let rx = monitor.subscribe();

    let frame = VideoFrame::blank(320, 240);
    let last = (0..5)
        .map(|i| monitor.process_frame_at(&frame, base + FRAME_INTERVAL * i))
        .last()
        .unwrap();

    let seen = rx.borrow().clone();
    assert_eq!(seen.state, last.state);
    assert_eq!(seen.timestamp_ms, last.timestamp_ms);
}
