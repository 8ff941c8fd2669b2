//! gwansang-core — Korean face-reading engine.
//!
//! A 68-point landmark set is reduced to scale-free geometric ratios, the
//! ratios are bucketed into a categorical [`FacialFeatures`] descriptor, and
//! the descriptor is scored twice: once against the face-reading tables
//! ([`FaceReader`]) and once against eight animal types ([`AnimalMatch`]).

pub mod animal;
pub mod features;
pub mod geometry;
pub mod landmarks;
pub mod reading;
pub mod rules;
pub mod tables;

#[cfg(test)]
mod fixtures;

pub use animal::{Animal, AnimalMatch};
pub use features::FacialFeatures;
pub use geometry::FeatureRatios;
pub use landmarks::{LandmarkError, LandmarkSet, Point, LANDMARK_COUNT};
pub use reading::{FaceReader, FaceReading, FaceType};

/// Validate raw points, extract ratios and classify them.
pub fn analyze_landmarks(points: Vec<Point>) -> Result<FacialFeatures, LandmarkError> {
    let landmarks = LandmarkSet::new(points)?;
    let ratios = FeatureRatios::from_landmarks(&landmarks)?;
    Ok(FacialFeatures::classify(&ratios))
}
