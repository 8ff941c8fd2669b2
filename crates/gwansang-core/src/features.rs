//! Categorical feature classification.
//!
//! Maps [`FeatureRatios`] onto ordinal categories through fixed threshold
//! bands. Every attribute always resolves to exactly one value: below the
//! band is the first bucket, above it the last, anything else (including
//! NaN) the middle one.

use crate::geometry::FeatureRatios;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines a categorical attribute: lowercase serde names, `as_str`, `Display`.
macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical!(Size { Small => "small", Medium => "medium", Large => "large" });
categorical!(Width { Narrow => "narrow", Medium => "medium", Wide => "wide" });
categorical!(Level { Low => "low", Medium => "medium", High => "high" });
categorical!(Length { Short => "short", Medium => "medium", Long => "long" });
categorical!(Thickness { Thin => "thin", Medium => "medium", Thick => "thick" });
categorical!(Spacing { Close => "close", Medium => "medium", Wide => "wide" });
categorical!(ForeheadShape { Flat => "flat", Rounded => "rounded", Prominent => "prominent" });
categorical!(EyeShape { Round => "round", Almond => "almond", Narrow => "narrow" });
categorical!(BrowShape { Straight => "straight", Arched => "arched", Angled => "angled" });
categorical!(NoseTip { Pointed => "pointed", Round => "round", Bulbous => "bulbous" });
categorical!(LipShape { Thin => "thin", Medium => "medium", Full => "full" });
categorical!(MouthCorners { Down => "down", Neutral => "neutral", Up => "up" });
categorical!(ChinShape { Pointed => "pointed", Round => "round", Square => "square" });
categorical!(Prominence { Flat => "flat", Medium => "medium", High => "high" });
categorical!(
    /// Overall face outline.
    FaceShapeType {
        Oval => "oval",
        Round => "round",
        Square => "square",
        Heart => "heart",
        Long => "long",
        Diamond => "diamond",
    }
);
categorical!(Symmetry { Asymmetric => "asymmetric", Balanced => "balanced", Symmetric => "symmetric" });

/// Lower and upper bound of the middle bucket.
#[derive(Debug, Clone, Copy)]
struct Band {
    low: f32,
    high: f32,
}

impl Band {
    const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    fn pick<T>(&self, value: f32, below: T, between: T, above: T) -> T {
        if value < self.low {
            below
        } else if value > self.high {
            above
        } else {
            between
        }
    }
}

// --- Threshold bands (fractions of face width / height unless noted) ---
const EYE_SIZE: Band = Band::new(0.10, 0.13);
const EYE_ASPECT: Band = Band::new(0.25, 0.40);
const EYE_SPACING: Band = Band::new(0.55, 0.65);
const BROW_THICKNESS: Band = Band::new(0.10, 0.18);
const BROW_ANGLE: Band = Band::new(0.03, 0.08);
const BROW_LENGTH: Band = Band::new(0.22, 0.32);
const NOSE_SIZE: Band = Band::new(0.14, 0.20);
const NOSE_BRIDGE: Band = Band::new(0.14, 0.22);
const NOSE_TIP: Band = Band::new(0.45, 0.70);
const NOSTRIL: Band = Band::new(0.06, 0.10);
const MOUTH_SIZE: Band = Band::new(0.30, 0.40);
const LIP_FULLNESS: Band = Band::new(0.20, 0.35);
const MOUTH_CORNER: Band = Band::new(-0.01, 0.01);
/// Jaw turn in radians: below is square, above is pointed.
const JAW_ANGLE: Band = Band::new(0.35, 0.60);
const CHIN_LENGTH: Band = Band::new(0.50, 0.62);
const CHIN_WIDTH: Band = Band::new(0.34, 0.44);
const FOREHEAD_HEIGHT: Band = Band::new(0.06, 0.12);
const FOREHEAD_WIDTH: Band = Band::new(0.70, 0.85);
const FOREHEAD_CURVE: Band = Band::new(0.04, 0.10);
const CHEEK_WIDTH: Band = Band::new(0.60, 0.72);
/// Cheekbone width over chin width.
const CHEEK_PROMINENCE: Band = Band::new(1.70, 2.20);
const ASYMMETRY: Band = Band::new(0.015, 0.04);

// --- Face outline cascade ---
const LONG_ASPECT: f32 = 1.35;
const ROUND_ASPECT: f32 = 1.10;
const SQUARE_JAW_MAX: f32 = 0.35;
const HEART_JAW_MIN: f32 = 0.60;
const HEART_CHIN_MAX: f32 = 0.30;
const DIAMOND_CHIN_MAX: f32 = 0.34;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forehead {
    pub width: Width,
    pub height: Level,
    pub shape: ForeheadShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eyes {
    pub size: Size,
    pub shape: EyeShape,
    pub spacing: Spacing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eyebrows {
    pub thickness: Thickness,
    pub shape: BrowShape,
    pub length: Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nose {
    pub size: Size,
    pub bridge: Level,
    pub tip: NoseTip,
    pub nostril: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mouth {
    pub size: Size,
    pub shape: LipShape,
    pub corners: MouthCorners,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chin {
    pub shape: ChinShape,
    pub length: Length,
    pub width: Width,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheekbones {
    pub prominence: Prominence,
    pub width: Width,
}

/// Ears are not visible enough in a frontal landmark set to measure, so
/// every attribute is reported as medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ears {
    pub size: Size,
    pub position: Level,
    pub lobe: Size,
}

impl Default for Ears {
    fn default() -> Self {
        Self {
            size: Size::Medium,
            position: Level::Medium,
            lobe: Size::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceShape {
    #[serde(rename = "type")]
    pub kind: FaceShapeType,
    pub symmetry: Symmetry,
}

/// Categorical description of a face, the sole input to both scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacialFeatures {
    pub forehead: Forehead,
    pub eyes: Eyes,
    pub eyebrows: Eyebrows,
    pub nose: Nose,
    pub mouth: Mouth,
    pub chin: Chin,
    pub cheekbones: Cheekbones,
    pub ears: Ears,
    pub face_shape: FaceShape,
}

impl Default for FacialFeatures {
    /// Every attribute at its middle value, oval outline.
    fn default() -> Self {
        Self {
            forehead: Forehead {
                width: Width::Medium,
                height: Level::Medium,
                shape: ForeheadShape::Rounded,
            },
            eyes: Eyes {
                size: Size::Medium,
                shape: EyeShape::Almond,
                spacing: Spacing::Medium,
            },
            eyebrows: Eyebrows {
                thickness: Thickness::Medium,
                shape: BrowShape::Arched,
                length: Length::Medium,
            },
            nose: Nose {
                size: Size::Medium,
                bridge: Level::Medium,
                tip: NoseTip::Round,
                nostril: Size::Medium,
            },
            mouth: Mouth {
                size: Size::Medium,
                shape: LipShape::Medium,
                corners: MouthCorners::Neutral,
            },
            chin: Chin {
                shape: ChinShape::Round,
                length: Length::Medium,
                width: Width::Medium,
            },
            cheekbones: Cheekbones {
                prominence: Prominence::Medium,
                width: Width::Medium,
            },
            ears: Ears::default(),
            face_shape: FaceShape {
                kind: FaceShapeType::Oval,
                symmetry: Symmetry::Balanced,
            },
        }
    }
}

impl FacialFeatures {
    /// Classify every facial zone from its ratios.
    pub fn classify(r: &FeatureRatios) -> Self {
        let features = Self {
            forehead: Forehead {
                width: FOREHEAD_WIDTH.pick(r.forehead_width, Width::Narrow, Width::Medium, Width::Wide),
                height: FOREHEAD_HEIGHT.pick(r.forehead_height, Level::Low, Level::Medium, Level::High),
                shape: FOREHEAD_CURVE.pick(
                    r.forehead_curve,
                    ForeheadShape::Flat,
                    ForeheadShape::Rounded,
                    ForeheadShape::Prominent,
                ),
            },
            eyes: Eyes {
                size: EYE_SIZE.pick(r.eye_width, Size::Small, Size::Medium, Size::Large),
                shape: EYE_ASPECT.pick(r.eye_aspect, EyeShape::Narrow, EyeShape::Almond, EyeShape::Round),
                spacing: EYE_SPACING.pick(r.eye_spacing, Spacing::Close, Spacing::Medium, Spacing::Wide),
            },
            eyebrows: Eyebrows {
                thickness: BROW_THICKNESS.pick(
                    r.brow_thickness,
                    Thickness::Thin,
                    Thickness::Medium,
                    Thickness::Thick,
                ),
                shape: BROW_ANGLE.pick(r.brow_angle, BrowShape::Straight, BrowShape::Arched, BrowShape::Angled),
                length: BROW_LENGTH.pick(r.brow_length, Length::Short, Length::Medium, Length::Long),
            },
            nose: Nose {
                size: NOSE_SIZE.pick(r.nose_width, Size::Small, Size::Medium, Size::Large),
                bridge: NOSE_BRIDGE.pick(r.nose_bridge, Level::Low, Level::Medium, Level::High),
                tip: NOSE_TIP.pick(r.nose_tip, NoseTip::Pointed, NoseTip::Round, NoseTip::Bulbous),
                nostril: NOSTRIL.pick(r.nostril_width, Size::Small, Size::Medium, Size::Large),
            },
            mouth: Mouth {
                size: MOUTH_SIZE.pick(r.mouth_width, Size::Small, Size::Medium, Size::Large),
                shape: LIP_FULLNESS.pick(r.lip_fullness, LipShape::Thin, LipShape::Medium, LipShape::Full),
                // Image y grows downward: raised corners sit above the lip center.
                corners: MOUTH_CORNER.pick(
                    r.mouth_corner,
                    MouthCorners::Up,
                    MouthCorners::Neutral,
                    MouthCorners::Down,
                ),
            },
            chin: Chin {
                shape: JAW_ANGLE.pick(r.jaw_angle, ChinShape::Square, ChinShape::Round, ChinShape::Pointed),
                length: CHIN_LENGTH.pick(r.chin_length, Length::Short, Length::Medium, Length::Long),
                width: CHIN_WIDTH.pick(r.chin_width, Width::Narrow, Width::Medium, Width::Wide),
            },
            cheekbones: Cheekbones {
                prominence: CHEEK_PROMINENCE.pick(
                    r.cheek_prominence,
                    Prominence::Flat,
                    Prominence::Medium,
                    Prominence::High,
                ),
                width: CHEEK_WIDTH.pick(r.cheek_width, Width::Narrow, Width::Medium, Width::Wide),
            },
            ears: Ears::default(),
            face_shape: FaceShape {
                kind: face_shape_type(r),
                symmetry: ASYMMETRY.pick(
                    r.asymmetry,
                    Symmetry::Symmetric,
                    Symmetry::Balanced,
                    Symmetry::Asymmetric,
                ),
            },
        };

        tracing::debug!(
            face_shape = %features.face_shape.kind,
            eyes = %features.eyes.size,
            chin = %features.chin.shape,
            "classified facial features"
        );

        features
    }
}

/// Face outline cascade. Branch order matters: a face that satisfies both
/// the heart and diamond chin conditions is reported as heart.
fn face_shape_type(r: &FeatureRatios) -> FaceShapeType {
    if r.aspect > LONG_ASPECT {
        FaceShapeType::Long
    } else if r.aspect < ROUND_ASPECT {
        FaceShapeType::Round
    } else if r.jaw_angle < SQUARE_JAW_MAX {
        FaceShapeType::Square
    } else if r.jaw_angle > HEART_JAW_MIN && r.chin_width < HEART_CHIN_MAX {
        FaceShapeType::Heart
    } else if r.chin_width < DIAMOND_CHIN_MAX {
        FaceShapeType::Diamond
    } else {
        FaceShapeType::Oval
    }
}
