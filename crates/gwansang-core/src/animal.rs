//! Animal-type scorer.
//!
//! Eight animals each own four ordered rule lists (eyes, face outline,
//! chin, nose). Within a list the first matching rule adds its points, so
//! an exact combination outranks a partial one. The highest total wins.

use crate::features::{
    ChinShape, EyeShape, FaceShapeType, FacialFeatures, Level, Size, Width,
};
use crate::rules::{first_match, Rule};
use crate::tables::{self, AnimalProfile};
use serde::Serialize;
use std::fmt;

/// Score that maps to a 100% match before capping.
const FULL_MATCH_SCORE: f32 = 90.0;
/// Displayed match floor. Weak matches are still shown as a decent fit;
/// this is a presentation choice, not a confidence measure.
pub const MIN_MATCH_PERCENT: u32 = 65;
pub const MAX_MATCH_PERCENT: u32 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Animal {
    Dog,
    Cat,
    Fox,
    Bear,
    Rabbit,
    Deer,
    Tiger,
    Eagle,
}

impl Animal {
    /// Declaration order; ties in the ranking keep this order.
    pub const ALL: [Animal; 8] = [
        Animal::Dog,
        Animal::Cat,
        Animal::Fox,
        Animal::Bear,
        Animal::Rabbit,
        Animal::Deer,
        Animal::Tiger,
        Animal::Eagle,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Animal::Dog => "dog",
            Animal::Cat => "cat",
            Animal::Fox => "fox",
            Animal::Bear => "bear",
            Animal::Rabbit => "rabbit",
            Animal::Deer => "deer",
            Animal::Tiger => "tiger",
            Animal::Eagle => "eagle",
        }
    }

    pub fn profile(&self) -> Option<&'static AnimalProfile> {
        tables::animal_profile(self.key())
    }

    fn rules(&self) -> &'static AnimalRules {
        match self {
            Animal::Dog => &DOG,
            Animal::Cat => &CAT,
            Animal::Fox => &FOX,
            Animal::Bear => &BEAR,
            Animal::Rabbit => &RABBIT,
            Animal::Deer => &DEER,
            Animal::Tiger => &TIGER,
            Animal::Eagle => &EAGLE,
        }
    }

    /// Total points this animal earns for a descriptor.
    pub fn score(&self, f: &FacialFeatures) -> u32 {
        self.rules()
            .categories()
            .iter()
            .map(|rules| first_match(rules, f).unwrap_or(0))
            .sum()
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

type PointRule = Rule<FacialFeatures, u32>;

struct AnimalRules {
    eyes: &'static [PointRule],
    face: &'static [PointRule],
    chin: &'static [PointRule],
    nose: &'static [PointRule],
}

impl AnimalRules {
    fn categories(&self) -> [&'static [PointRule]; 4] {
        [self.eyes, self.face, self.chin, self.nose]
    }
}

const DOG: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.size == Size::Large && f.eyes.shape == EyeShape::Round, then: 35 },
        Rule { when: |f| f.eyes.size == Size::Large, then: 20 },
        Rule { when: |f| f.eyes.shape == EyeShape::Round, then: 15 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Round | FaceShapeType::Oval),
        then: 20,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Round && f.chin.width == Width::Medium, then: 15 },
        Rule { when: |f| f.chin.shape == ChinShape::Round, then: 8 },
    ],
    nose: &[Rule { when: |f| f.nose.size == Size::Medium && f.nose.bridge == Level::Low, then: 10 }],
};

const CAT: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.shape == EyeShape::Almond && f.eyes.size == Size::Large, then: 35 },
        Rule { when: |f| f.eyes.shape == EyeShape::Almond, then: 20 },
        Rule { when: |f| f.eyes.size == Size::Large, then: 10 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Oval | FaceShapeType::Heart),
        then: 20,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Pointed && f.chin.width == Width::Narrow, then: 15 },
        Rule { when: |f| f.chin.shape == ChinShape::Pointed, then: 8 },
    ],
    nose: &[
        Rule { when: |f| f.nose.size == Size::Small && f.nose.bridge == Level::Medium, then: 10 },
        Rule { when: |f| f.nose.size == Size::Small, then: 5 },
    ],
};

const FOX: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.shape == EyeShape::Narrow && f.eyes.size == Size::Small, then: 35 },
        Rule { when: |f| f.eyes.shape == EyeShape::Narrow, then: 25 },
        Rule { when: |f| f.eyes.shape == EyeShape::Almond, then: 10 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Heart | FaceShapeType::Diamond),
        then: 20,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Pointed && f.chin.width == Width::Narrow, then: 15 },
        Rule { when: |f| f.chin.shape == ChinShape::Pointed, then: 10 },
    ],
    nose: &[
        Rule { when: |f| f.nose.size == Size::Small && f.nose.bridge == Level::High, then: 10 },
        Rule { when: |f| f.nose.bridge == Level::High, then: 5 },
    ],
};

const BEAR: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.size == Size::Small && f.eyes.shape == EyeShape::Round, then: 30 },
        Rule { when: |f| f.eyes.size == Size::Small, then: 20 },
        Rule { when: |f| f.eyes.shape == EyeShape::Round, then: 10 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Round | FaceShapeType::Square),
        then: 25,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Square && f.chin.width == Width::Wide, then: 15 },
        Rule { when: |f| f.chin.shape == ChinShape::Round && f.chin.width == Width::Wide, then: 12 },
        Rule { when: |f| f.chin.width == Width::Wide, then: 8 },
    ],
    nose: &[
        Rule { when: |f| f.nose.size == Size::Large && f.nose.bridge == Level::Low, then: 15 },
        Rule { when: |f| f.nose.size == Size::Large, then: 8 },
    ],
};

const RABBIT: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.size == Size::Large && f.eyes.shape == EyeShape::Round, then: 30 },
        Rule { when: |f| f.eyes.shape == EyeShape::Round, then: 20 },
        Rule { when: |f| f.eyes.size == Size::Large, then: 10 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Round | FaceShapeType::Oval),
        then: 15,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Round && f.chin.width == Width::Narrow, then: 15 },
        Rule { when: |f| f.chin.shape == ChinShape::Round, then: 8 },
    ],
    nose: &[
        Rule { when: |f| f.nose.size == Size::Small && f.nose.bridge == Level::Low, then: 15 },
        Rule { when: |f| f.nose.size == Size::Small, then: 10 },
    ],
};

const DEER: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.size == Size::Large && f.eyes.shape == EyeShape::Almond, then: 35 },
        Rule { when: |f| f.eyes.size == Size::Large, then: 20 },
        Rule { when: |f| f.eyes.shape == EyeShape::Almond, then: 10 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Oval | FaceShapeType::Long),
        then: 20,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Pointed && f.chin.width == Width::Medium, then: 15 },
        Rule { when: |f| f.chin.shape == ChinShape::Pointed, then: 8 },
    ],
    nose: &[
        Rule { when: |f| f.nose.size == Size::Medium && f.nose.bridge == Level::High, then: 10 },
        Rule { when: |f| f.nose.bridge == Level::High, then: 5 },
    ],
};

const TIGER: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.shape == EyeShape::Almond && f.eyes.size == Size::Large, then: 25 },
        Rule { when: |f| f.eyes.shape == EyeShape::Narrow && f.eyes.size == Size::Medium, then: 20 },
        Rule { when: |f| f.eyes.shape == EyeShape::Narrow, then: 12 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Square | FaceShapeType::Diamond),
        then: 25,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Square && f.chin.width == Width::Wide, then: 20 },
        Rule { when: |f| f.chin.shape == ChinShape::Square, then: 12 },
    ],
    nose: &[
        Rule { when: |f| f.nose.size == Size::Large && f.nose.bridge == Level::High, then: 15 },
        Rule { when: |f| f.nose.size == Size::Large, then: 8 },
        Rule { when: |f| f.nose.bridge == Level::High, then: 5 },
    ],
};

const EAGLE: AnimalRules = AnimalRules {
    eyes: &[
        Rule { when: |f| f.eyes.shape == EyeShape::Narrow && f.eyes.size == Size::Medium, then: 30 },
        Rule { when: |f| f.eyes.shape == EyeShape::Narrow, then: 20 },
        Rule { when: |f| f.eyes.size == Size::Small, then: 10 },
    ],
    face: &[Rule {
        when: |f| matches!(f.face_shape.kind, FaceShapeType::Long | FaceShapeType::Diamond),
        then: 20,
    }],
    chin: &[
        Rule { when: |f| f.chin.shape == ChinShape::Pointed && f.chin.width == Width::Medium, then: 15 },
        Rule { when: |f| f.chin.shape == ChinShape::Pointed, then: 10 },
    ],
    nose: &[
        Rule { when: |f| f.nose.bridge == Level::High && f.nose.size == Size::Large, then: 20 },
        Rule { when: |f| f.nose.bridge == Level::High, then: 12 },
    ],
};

/// Descriptions of the four features the animal rules look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSummary {
    pub eyes: String,
    pub face_shape: String,
    pub chin: String,
    pub nose: String,
}

impl FeatureSummary {
    pub fn describe(f: &FacialFeatures) -> Self {
        let eye_size = match f.eyes.size {
            Size::Large => "큰",
            Size::Medium => "적당한 크기의",
            Size::Small => "작은",
        };
        let eye_shape = match f.eyes.shape {
            EyeShape::Round => "둥근 눈",
            EyeShape::Almond => "아몬드형 눈",
            EyeShape::Narrow => "가느다란 눈",
        };
        let face = match f.face_shape.kind {
            FaceShapeType::Oval => "갸름한 계란형 얼굴",
            FaceShapeType::Round => "둥근 얼굴",
            FaceShapeType::Square => "각진 얼굴",
            FaceShapeType::Heart => "하트형 얼굴",
            FaceShapeType::Long => "긴 얼굴",
            FaceShapeType::Diamond => "다이아몬드형 얼굴",
        };
        let chin_shape = match f.chin.shape {
            ChinShape::Pointed => "뾰족한 턱",
            ChinShape::Round => "둥근 턱",
            ChinShape::Square => "각진 턱",
        };
        let chin_width = match f.chin.width {
            Width::Narrow => "좁고",
            Width::Medium => "적당하고",
            Width::Wide => "넓고",
        };
        let bridge = match f.nose.bridge {
            Level::High => "높은 콧대",
            Level::Medium => "적당한 콧대",
            Level::Low => "낮은 콧대",
        };
        let nose_size = match f.nose.size {
            Size::Large => "큰 코",
            Size::Medium => "균형 잡힌 코",
            Size::Small => "작은 코",
        };

        Self {
            eyes: format!("{eye_size} {eye_shape}"),
            face_shape: face.to_string(),
            chin: format!("{chin_width} {chin_shape}"),
            nose: format!("{bridge}의 {nose_size}"),
        }
    }
}

/// Points one animal earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimalScore {
    pub animal: Animal,
    pub score: u32,
}

/// Result of matching a face against the eight animal types.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalMatch {
    pub primary: Animal,
    pub secondary: Animal,
    /// All eight scores in declaration order.
    pub scores: Vec<AnimalScore>,
    pub match_percent: u32,
    pub features: FeatureSummary,
    pub profile: Option<&'static AnimalProfile>,
}

impl AnimalMatch {
    pub fn from_features(f: &FacialFeatures) -> Self {
        let scores: Vec<AnimalScore> = Animal::ALL
            .iter()
            .map(|&animal| AnimalScore {
                animal,
                score: animal.score(f),
            })
            .collect();
        let ranked = rank(&scores);
        let (primary, secondary) = (ranked[0], ranked[1]);

        tracing::debug!(
            primary = %primary.animal,
            score = primary.score,
            secondary = %secondary.animal,
            "animal type scored"
        );

        Self {
            primary: primary.animal,
            secondary: secondary.animal,
            match_percent: match_percent(primary.score),
            features: FeatureSummary::describe(f),
            profile: primary.animal.profile(),
            scores,
        }
    }

    /// Scores ordered highest first.
    pub fn ranked(&self) -> Vec<AnimalScore> {
        rank(&self.scores)
    }

    pub fn score_of(&self, animal: Animal) -> u32 {
        self.scores
            .iter()
            .find(|s| s.animal == animal)
            .map_or(0, |s| s.score)
    }
}

// Stable: equal scores keep declaration order.
fn rank(scores: &[AnimalScore]) -> Vec<AnimalScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// `round(score / 90 * 100)` capped at 95 and floored at 65.
pub fn match_percent(top_score: u32) -> u32 {
    let raw = (top_score as f32 / FULL_MATCH_SCORE * 100.0).round() as u32;
    raw.min(MAX_MATCH_PERCENT).max(MIN_MATCH_PERCENT)
}
