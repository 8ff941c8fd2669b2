//! Landmark fixtures shared by the unit tests.

use crate::landmarks::{LandmarkSet, Point};

const NEUTRAL_FACE_JSON: &str = include_str!("../../../testdata/neutral_face.json");

/// A synthetic frontal face whose every ratio falls in the middle bucket
/// (oval, balanced symmetry).
pub fn neutral_face() -> LandmarkSet {
    serde_json::from_str(NEUTRAL_FACE_JSON).expect("neutral_face.json is a valid 68-point set")
}

/// The neutral face scaled independently along x and y.
pub fn stretched_face(sx: f32, sy: f32) -> LandmarkSet {
    let points = neutral_face()
        .points()
        .iter()
        .map(|p| Point::new(p.x * sx, p.y * sy))
        .collect();
    LandmarkSet::new(points).expect("scaling preserves the point count")
}
