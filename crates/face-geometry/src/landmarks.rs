//! Landmark set and face-mesh index map

use video_frame::VideoFrame;

/// Number of points in a full face-mesh detection.
pub const FACE_MESH_POINTS: usize = 468;

/// Nose tip.
pub const NOSE_TIP: usize = 1;
/// Chin point, tracked vertically for nodding detection.
pub const CHIN: usize = 175;
/// Outer corner of the left eye (subject's right on screen).
pub const LEFT_EYE_OUTER: usize = 33;
/// Outer corner of the right eye.
pub const RIGHT_EYE_OUTER: usize = 263;

/// Six-point left eye contour: corner, two upper-lid points, corner,
/// two lower-lid points, ordered for the EAR formula.
pub const LEFT_EYE: [usize; 6] = [362, 382, 381, 380, 374, 373];
/// Six-point right eye contour, same ordering as [`LEFT_EYE`].
pub const RIGHT_EYE: [usize; 6] = [33, 7, 163, 144, 145, 153];

/// Upper inner lip.
pub const MOUTH_TOP: usize = 13;
/// Lower inner lip.
pub const MOUTH_BOTTOM: usize = 14;
/// Left mouth corner.
pub const MOUTH_LEFT: usize = 78;
/// Right-side lip point paired with [`MOUTH_LEFT`] for the MAR
/// horizontal distance.
pub const MOUTH_RIGHT: usize = 82;

/// Landmark indices spanning the mouth, used to bound the classifier
/// crop region.
pub const MOUTH_REGION: [usize; 10] = [13, 14, 15, 16, 17, 78, 79, 80, 81, 82];

/// Ordered 2D facial landmark coordinates in pixel space.
///
/// Produced fresh per frame by a [`LandmarkProvider`]; never persisted
/// across frames.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<(f32, f32)>,
}

impl LandmarkSet {
    /// Wrap a detector's output points.
    pub fn from_points(points: Vec<(f32, f32)>) -> Self {
        Self { points }
    }

    /// Coordinate at a semantic index, or `None` when the detection is
    /// incomplete.
    pub fn point(&self, index: usize) -> Option<(f32, f32)> {
        self.points.get(index).copied()
    }

    /// Number of points in the set.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Gather a fixed contour of points, or `None` if any index is
    /// missing.
    pub fn contour<const N: usize>(&self, indices: &[usize; N]) -> Option<[(f32, f32); N]> {
        let mut out = [(0.0, 0.0); N];
        for (slot, &idx) in out.iter_mut().zip(indices.iter()) {
            *slot = self.point(idx)?;
        }
        Some(out)
    }
}

/// Per-frame face landmark detection, the pipeline's upstream
/// collaborator (e.g. a face-mesh model). Returns `None` when no face
/// is visible in the frame.
pub trait LandmarkProvider {
    fn detect_face(&mut self, frame: &VideoFrame) -> Option<LandmarkSet>;
}
