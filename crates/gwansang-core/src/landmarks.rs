//! 68-point facial landmark input.
//!
//! Points are in image pixel coordinates with y growing downward, indexed
//! per the iBUG 300-W scheme: 0–16 jaw, 17–26 brows, 27–35 nose,
//! 36–47 eyes, 48–67 mouth.

use serde::{Deserialize, Serialize};
use std::ops::Index;
use thiserror::Error;

pub const LANDMARK_COUNT: usize = 68;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("no face detected")]
    NoFaceDetected,
    #[error("invalid landmark set: expected {expected} points, got {actual}")]
    InvalidLandmarkSet { expected: usize, actual: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },
    #[error("degenerate face: width {width}px, height {height}px")]
    DegenerateFace { width: f32, height: f32 },
}

/// A 2D landmark coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle of the vector from `self` to `to`, in radians.
    pub fn angle_to(&self, to: &Point) -> f32 {
        (to.y - self.y).atan2(to.x - self.x)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Exactly 68 validated landmark points for one face.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Validate and wrap a detector's output.
    ///
    /// Sets with more than 68 points (e.g. 81-point models that append
    /// forehead landmarks) keep their first 68, whose meaning is unchanged.
    pub fn new(mut points: Vec<Point>) -> Result<Self, LandmarkError> {
        if points.is_empty() {
            return Err(LandmarkError::NoFaceDetected);
        }
        if points.len() < LANDMARK_COUNT {
            return Err(LandmarkError::InvalidLandmarkSet {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        if points.len() > LANDMARK_COUNT {
            tracing::debug!(
                actual = points.len(),
                "truncating extended landmark set to 68 points"
            );
            points.truncate(LANDMARK_COUNT);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinitePoint { index });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Centroid of an inclusive index range.
    pub fn centroid(&self, range: std::ops::RangeInclusive<usize>) -> Point {
        let slice = &self.points[range];
        let n = slice.len() as f32;
        let (sx, sy) = slice
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl TryFrom<Vec<Point>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Point>::deserialize(deserializer)?;
        Self::new(points).map_err(serde::de::Error::custom)
    }
}
