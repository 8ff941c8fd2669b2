//! Landmark geometry extraction.
//!
//! Turns 68 raw landmark points into scale-invariant ratios. Widths are
//! normalized by the horizontal jaw extent (p0–p16), heights by the
//! nose-bridge-to-chin span (p27–p8), so the same face yields the same
//! ratios at any image resolution.

use crate::landmarks::{LandmarkError, LandmarkSet};
use serde::{Deserialize, Serialize};

/// Cheekbones are not part of the 68-point scheme; their width is taken
/// as this fraction of the jaw width at p4–p12.
const CHEEKBONE_JAW_FRACTION: f32 = 0.9;

/// Normalized geometric ratios for one face.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRatios {
    /// Horizontal jaw extent in pixels.
    pub face_width: f32,
    /// Nose bridge to chin in pixels.
    pub face_height: f32,
    /// face_height / face_width.
    pub aspect: f32,

    pub eye_width: f32,
    /// Mean eye height over mean eye width.
    pub eye_aspect: f32,
    /// Outer eye corner distance.
    pub eye_spacing: f32,

    /// Vertical offset from brow midpoint to the upper lid.
    pub brow_thickness: f32,
    /// Vertical drop between medial and lateral brow ends.
    pub brow_angle: f32,
    pub brow_length: f32,

    pub nose_width: f32,
    pub nose_length: f32,
    pub nose_bridge: f32,
    /// Nose width over nose length, in pixels.
    pub nose_tip: f32,
    pub nostril_width: f32,

    pub mouth_width: f32,
    /// Vertical span of all lip points over mouth width.
    pub lip_fullness: f32,
    /// Mean corner y minus lip center y. Negative means raised corners.
    pub mouth_corner: f32,

    /// Turn between the p4→p6 and p6→p8 jaw segments, in radians.
    pub jaw_angle: f32,
    pub chin_width: f32,
    pub chin_length: f32,

    pub forehead_height: f32,
    pub forehead_width: f32,
    pub forehead_curve: f32,

    pub cheek_width: f32,
    pub cheek_prominence: f32,

    /// Left/right offset mismatch of eyes and mouth corners around p27.
    pub asymmetry: f32,
}

impl FeatureRatios {
    /// Extract ratios from a validated landmark set.
    pub fn from_landmarks(lm: &LandmarkSet) -> Result<Self, LandmarkError> {
        let face_width = (lm[16].x - lm[0].x).abs();
        let face_height = (lm[8].y - lm[27].y).abs();
        if face_width <= f32::EPSILON || face_height <= f32::EPSILON {
            return Err(LandmarkError::DegenerateFace {
                width: face_width,
                height: face_height,
            });
        }

        // Eyes: 36–41 left, 42–47 right.
        let left_eye_w = lm[36].distance(&lm[39]);
        let right_eye_w = lm[42].distance(&lm[45]);
        let left_eye_h = ((lm[37].y - lm[41].y).abs() + (lm[38].y - lm[40].y).abs()) / 2.0;
        let right_eye_h = ((lm[43].y - lm[47].y).abs() + (lm[44].y - lm[46].y).abs()) / 2.0;
        let eye_w = (left_eye_w + right_eye_w) / 2.0;
        let eye_h = (left_eye_h + right_eye_h) / 2.0;

        // Brows: 17–21 left (17 lateral), 22–26 right (26 lateral). Thickness
        // is measured down to the outer eye corners.
        let brow_gap = ((lm[19].y - lm[36].y).abs() + (lm[24].y - lm[45].y).abs()) / 2.0;
        let brow_drop = ((lm[21].y - lm[17].y).abs() + (lm[22].y - lm[26].y).abs()) / 2.0;
        let brow_len = ((lm[21].x - lm[17].x).abs() + (lm[26].x - lm[22].x).abs()) / 2.0;

        // Nose: 27–30 bridge, 31–35 base.
        let nose_w = (lm[35].x - lm[31].x).abs();
        let nose_len = (lm[33].y - lm[27].y).abs();
        let bridge = (lm[30].y - lm[27].y).abs();
        let nostril = (lm[34].x - lm[32].x).abs();

        // Mouth: 48–59 outer, 60–67 inner.
        let mouth_w = (lm[54].x - lm[48].x).abs();
        let (lip_top, lip_bottom) = lm.points()[48..=67]
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let lip_center_y = (lm[62].y + lm[66].y) / 2.0;
        let corner_y = (lm[48].y + lm[54].y) / 2.0;

        let jaw_angle = (lm[6].angle_to(&lm[8]) - lm[4].angle_to(&lm[6])).abs();
        let chin_w = (lm[10].x - lm[6].x).abs();
        let chin_len = (lm[8].y - lm[57].y).abs();

        // No hairline in a frontal set: the forehead is inferred from the brows.
        let brow_top = lm.points()[17..=26]
            .iter()
            .map(|p| p.y)
            .fold(f32::MAX, f32::min);
        let brow_peak = lm[19].y.min(lm[24].y);
        let brow_ends = (lm[17].y + lm[26].y) / 2.0;

        let cheek_w = CHEEKBONE_JAW_FRACTION * (lm[12].x - lm[4].x).abs();

        let center_x = lm[27].x;
        let left_eye_c = lm.centroid(36..=41);
        let right_eye_c = lm.centroid(42..=47);
        let eye_offset_diff = (center_x - left_eye_c.x) - (right_eye_c.x - center_x);
        let mouth_offset_diff = (center_x - lm[48].x) - (lm[54].x - center_x);

        let ratios = Self {
            face_width,
            face_height,
            aspect: face_height / face_width,
            eye_width: eye_w / face_width,
            eye_aspect: safe_div(eye_h, eye_w),
            eye_spacing: lm[36].distance(&lm[45]) / face_width,
            brow_thickness: brow_gap / face_height,
            brow_angle: brow_drop / face_height,
            brow_length: brow_len / face_width,
            nose_width: nose_w / face_width,
            nose_length: nose_len / face_height,
            nose_bridge: bridge / face_height,
            nose_tip: safe_div(nose_w, nose_len),
            nostril_width: nostril / face_width,
            mouth_width: mouth_w / face_width,
            lip_fullness: safe_div(lip_bottom - lip_top, mouth_w),
            mouth_corner: (corner_y - lip_center_y) / face_height,
            jaw_angle,
            chin_width: chin_w / face_width,
            chin_length: chin_len / face_height,
            forehead_height: (lm[27].y - brow_top) / face_height,
            // The jaw extent is face_width itself; the brow span stands in.
            forehead_width: (lm[26].x - lm[17].x).abs() / face_width,
            forehead_curve: (brow_ends - brow_peak) / face_height,
            cheek_width: cheek_w / face_width,
            cheek_prominence: safe_div(cheek_w, chin_w),
            asymmetry: (eye_offset_diff.abs() + mouth_offset_diff.abs()) / (2.0 * face_width),
        };

        tracing::debug!(
            aspect = ratios.aspect,
            jaw_angle = ratios.jaw_angle,
            chin_width = ratios.chin_width,
            "extracted feature ratios"
        );

        Ok(ratios)
    }
}

/// Division that yields 0 for a zero-width denominator.
fn safe_div(numerator: f32, denominator: f32) -> f32 {
    if denominator.abs() > f32::EPSILON {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{neutral_face, stretched_face};
    use crate::landmarks::Point;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_neutral_reference_measurements() {
        let r = FeatureRatios::from_landmarks(&neutral_face()).unwrap();
        assert!(approx(r.face_width, 170.0), "face_width = {}", r.face_width);
        assert!(approx(r.face_height, 212.0), "face_height = {}", r.face_height);
        assert!(approx(r.aspect, 212.0 / 170.0));
        assert!(approx(r.eye_width, 0.115), "eye_width = {}", r.eye_width);
        assert!(approx(r.chin_width, 0.38), "chin_width = {}", r.chin_width);
        assert!(approx(r.cheek_width, 0.9 * 129.2 / 170.0));
    }

    #[test]
    fn test_brow_thickness_to_outer_eye_corner() {
        let base = FeatureRatios::from_landmarks(&neutral_face()).unwrap();
        // |62 - 96| on both sides.
        assert!(approx(base.brow_thickness, 34.0 / 212.0), "brow_thickness = {}", base.brow_thickness);

        let mut lids = neutral_face().points().to_vec();
        lids[37].y += 3.0;
        lids[44].y += 3.0;
        let r = FeatureRatios::from_landmarks(&LandmarkSet::new(lids).unwrap()).unwrap();
        assert!(approx(r.brow_thickness, base.brow_thickness));

        let mut corners = neutral_face().points().to_vec();
        corners[36].y += 4.24;
        corners[45].y += 4.24;
        let r = FeatureRatios::from_landmarks(&LandmarkSet::new(corners).unwrap()).unwrap();
        assert!(approx(r.brow_thickness, base.brow_thickness + 0.02));
    }

    #[test]
    fn test_forehead_width_follows_brow_span() {
        let base = FeatureRatios::from_landmarks(&neutral_face()).unwrap();
        assert!(approx(base.forehead_width, (151.3 - 18.7) / 170.0));

        let mut pts = neutral_face().points().to_vec();
        pts[17].x -= 8.5;
        pts[26].x += 8.5;
        let r = FeatureRatios::from_landmarks(&LandmarkSet::new(pts).unwrap()).unwrap();
        assert!(approx(r.forehead_width, base.forehead_width + 0.1));
    }

    #[test]
    fn test_scale_invariance() {
        let base = FeatureRatios::from_landmarks(&neutral_face()).unwrap();
        let doubled = FeatureRatios::from_landmarks(&stretched_face(2.0, 2.0)).unwrap();
        assert!(approx(base.aspect, doubled.aspect));
        assert!(approx(base.eye_width, doubled.eye_width));
        assert!(approx(base.jaw_angle, doubled.jaw_angle));
        assert!(approx(base.lip_fullness, doubled.lip_fullness));
        assert!(approx(base.asymmetry, doubled.asymmetry));
    }

    #[test]
    fn test_raised_corners_are_negative() {
        let mut pts = neutral_face().points().to_vec();
        pts[48].y -= 10.0;
        pts[54].y -= 10.0;
        let lm = LandmarkSet::new(pts).unwrap();
        let r = FeatureRatios::from_landmarks(&lm).unwrap();
        assert!(r.mouth_corner < -0.01, "mouth_corner = {}", r.mouth_corner);
    }

    #[test]
    fn test_jaw_angle_two_segment_turn() {
        let mut pts = neutral_face().points().to_vec();
        // Straight vertical jaw line p4→p6→p8 has no turn.
        pts[4] = Point::new(40.0, 200.0);
        pts[6] = Point::new(40.0, 250.0);
        pts[8] = Point::new(40.0, 300.0);
        let lm = LandmarkSet::new(pts).unwrap();
        let r = FeatureRatios::from_landmarks(&lm).unwrap();
        assert!(r.jaw_angle.abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_face_rejected() {
        let pts = vec![Point::new(10.0, 10.0); 68];
        let lm = LandmarkSet::new(pts).unwrap();
        assert!(matches!(
            FeatureRatios::from_landmarks(&lm),
            Err(LandmarkError::DegenerateFace { .. })
        ));
    }

    #[test]
    fn test_symmetric_face_has_zero_asymmetry() {
        let mut pts = neutral_face().points().to_vec();
        // Mirror the right eye and right mouth corner around p27.x.
        let cx = pts[27].x;
        for (l, r) in [(36, 45), (37, 44), (38, 43), (39, 42), (40, 47), (41, 46)] {
            pts[r] = Point::new(2.0 * cx - pts[l].x, pts[l].y);
        }
        pts[54] = Point::new(2.0 * cx - pts[48].x, pts[48].y);
        let lm = LandmarkSet::new(pts).unwrap();
        let r = FeatureRatios::from_landmarks(&lm).unwrap();
        assert!(r.asymmetry.abs() < 1e-4, "asymmetry = {}", r.asymmetry);
    }
}
