//! Per-frame geometric feature extraction

use crate::landmarks::{
    self, LandmarkSet, CHIN, LEFT_EYE, LEFT_EYE_OUTER, MOUTH_BOTTOM, MOUTH_LEFT, MOUTH_RIGHT,
    MOUTH_TOP, NOSE_TIP, RIGHT_EYE, RIGHT_EYE_OUTER,
};
use serde::{Deserialize, Serialize};

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Eye aspect ratio over a six-point eye contour:
/// `(|p1-p5| + |p2-p4|) / (2 * |p0-p3|)`.
///
/// Lower values indicate more closed eyes. Returns 0 for fewer than 6
/// points or a degenerate (zero-width) eye.
pub fn eye_aspect_ratio(eye_points: &[(f32, f32)]) -> f32 {
    if eye_points.len() < 6 {
        return 0.0;
    }

    // Vertical eyelid distances
    let a = distance(eye_points[1], eye_points[5]);
    let b = distance(eye_points[2], eye_points[4]);
    // Horizontal corner distance
    let c = distance(eye_points[0], eye_points[3]);

    if c == 0.0 {
        return 0.0;
    }
    (a + b) / (2.0 * c)
}

/// Mouth aspect ratio: inner-lip vertical distance over mouth-corner
/// horizontal distance. Higher values indicate a wider-open mouth.
/// Returns 0 when landmarks are missing or the horizontal distance is
/// degenerate.
pub fn mouth_aspect_ratio(landmarks: &LandmarkSet) -> f32 {
    let (top, bottom, left, right) = match (
        landmarks.point(MOUTH_TOP),
        landmarks.point(MOUTH_BOTTOM),
        landmarks.point(MOUTH_LEFT),
        landmarks.point(MOUTH_RIGHT),
    ) {
        (Some(t), Some(b), Some(l), Some(r)) => (t, b, l, r),
        _ => return 0.0,
    };

    let horizontal = distance(left, right);
    if horizontal == 0.0 {
        return 0.0;
    }
    distance(top, bottom) / horizontal
}

/// Horizontal offset (pixels) between the nose tip and the midpoint of
/// the outer eye corners. Larger values mean the head is turned
/// further away from the camera.
pub fn head_deviation(landmarks: &LandmarkSet) -> f32 {
    let (nose, eye_l, eye_r) = match (
        landmarks.point(NOSE_TIP),
        landmarks.point(LEFT_EYE_OUTER),
        landmarks.point(RIGHT_EYE_OUTER),
    ) {
        (Some(n), Some(l), Some(r)) => (n, l, r),
        _ => return 0.0,
    };

    let face_center_x = (eye_l.0 + eye_r.0) / 2.0;
    (nose.0 - face_center_x).abs()
}

/// Geometric signals derived from one frame's landmark set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeatureSample {
    /// Averaged eye aspect ratio over both eyes.
    pub ear: f32,
    /// Mouth aspect ratio.
    pub mar: f32,
    /// Head deviation in pixels.
    pub head_deviation: f32,
    /// Vertical chin coordinate in pixels.
    pub chin_y: f32,
}

/// Compute all per-frame features from a landmark set. Pure and O(1);
/// incomplete landmark data degrades individual signals to zero.
pub fn extract(landmarks: &LandmarkSet) -> FeatureSample {
    let left_ear = landmarks
        .contour(&LEFT_EYE)
        .map(|pts| eye_aspect_ratio(&pts))
        .unwrap_or(0.0);
    let right_ear = landmarks
        .contour(&RIGHT_EYE)
        .map(|pts| eye_aspect_ratio(&pts))
        .unwrap_or(0.0);

    FeatureSample {
        ear: (left_ear + right_ear) / 2.0,
        mar: mouth_aspect_ratio(landmarks),
        head_deviation: head_deviation(landmarks),
        chin_y: landmarks.point(CHIN).map(|(_, y)| y).unwrap_or(0.0),
    }
}

/// Pixel extents of the mouth landmark region, for classifier crops.
/// `None` when any mouth landmark is missing.
pub fn mouth_extents(landmarks: &LandmarkSet) -> Option<(f32, f32, f32, f32)> {
    let mut x_min = f32::INFINITY;
    let mut x_max = f32::NEG_INFINITY;
    let mut y_min = f32::INFINITY;
    let mut y_max = f32::NEG_INFINITY;

    for &idx in landmarks::MOUTH_REGION.iter() {
        let (x, y) = landmarks.point(idx)?;
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    Some((x_min, x_max, y_min, y_max))
}
