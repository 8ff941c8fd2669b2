//! Reference tables.
//!
//! Reading records, fortune texts and animal profiles are embedded at
//! compile time from `contrib/*.toml` and parsed once per process.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

const READINGS_FOREHEAD: &str = include_str!("../../../contrib/readings/forehead.toml");
const READINGS_EYES: &str = include_str!("../../../contrib/readings/eyes.toml");
const READINGS_NOSE: &str = include_str!("../../../contrib/readings/nose.toml");
const READINGS_MOUTH: &str = include_str!("../../../contrib/readings/mouth.toml");
const READINGS_FACE_SHAPE: &str = include_str!("../../../contrib/readings/face_shape.toml");
const READINGS_CHIN: &str = include_str!("../../../contrib/readings/chin.toml");
const FORTUNE: &str = include_str!("../../../contrib/fortune.toml");
const ANIMALS: &str = include_str!("../../../contrib/animals.toml");

static READING_TABLES: OnceLock<ReadingTables> = OnceLock::new();
static FORTUNE_TEXTS: OnceLock<FortuneTexts> = OnceLock::new();
static ANIMAL_PROFILES: OnceLock<HashMap<String, AnimalProfile>> = OnceLock::new();

/// One of the six facial regions read independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    Forehead,
    Eyes,
    Nose,
    Mouth,
    FaceShape,
    Chin,
}

impl Zone {
    /// Reading order; personality tags and cautions are collected in it.
    pub const ALL: [Zone; 6] = [
        Zone::Forehead,
        Zone::Eyes,
        Zone::Nose,
        Zone::Mouth,
        Zone::FaceShape,
        Zone::Chin,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Zone::Forehead => "이마",
            Zone::Eyes => "눈",
            Zone::Nose => "코",
            Zone::Mouth => "입",
            Zone::FaceShape => "얼굴형",
            Zone::Chin => "턱",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fortune scores over the five life domains, 0–5.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, serde::Serialize)]
pub struct DomainScores {
    pub wealth: f64,
    pub love: f64,
    pub career: f64,
    pub health: f64,
    pub relationships: f64,
}

impl DomainScores {
    pub const fn uniform(value: f64) -> Self {
        Self {
            wealth: value,
            love: value,
            career: value,
            health: value,
            relationships: value,
        }
    }

    pub fn values(&self) -> [f64; 5] {
        [
            self.wealth,
            self.love,
            self.career,
            self.health,
            self.relationships,
        ]
    }

    pub fn average(&self) -> f64 {
        self.values().iter().sum::<f64>() / 5.0
    }
}

/// Pre-authored reading for one zone key.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingRecord {
    pub meaning: String,
    #[serde(default)]
    pub variants: Vec<String>,
    pub traits: Vec<String>,
    #[serde(default)]
    pub cautions: Vec<String>,
    pub scores: DomainScores,
}

pub type ZoneTable = HashMap<String, ReadingRecord>;

/// Reading records for all six zones.
#[derive(Debug, Clone, Default)]
pub struct ReadingTables {
    zones: HashMap<Zone, ZoneTable>,
}

impl ReadingTables {
    /// Tables with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, zone: Zone, table: ZoneTable) -> Self {
        self.zones.insert(zone, table);
        self
    }

    pub fn get(&self, zone: Zone, key: &str) -> Option<&ReadingRecord> {
        self.zones.get(&zone)?.get(key)
    }

    pub fn zone_len(&self, zone: Zone) -> usize {
        self.zones.get(&zone).map_or(0, HashMap::len)
    }
}

/// Lucky color and description for one face-reading type.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeText {
    pub color: String,
    pub description: String,
}

/// Label, age range and four tiered descriptions for one life stage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageText {
    pub label: String,
    pub period: String,
    /// Bands: >= 4.5, >= 4.0, >= 3.5, below.
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageTexts {
    #[serde(default)]
    pub early: StageText,
    #[serde(default)]
    pub middle: StageText,
    #[serde(default)]
    pub late: StageText,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryText {
    /// Bands: >= 4.5, >= 4.0, >= 3.5, below.
    #[serde(default)]
    pub overall: Vec<String>,
    #[serde(default)]
    pub peak_early: String,
    #[serde(default)]
    pub peak_middle: String,
    #[serde(default)]
    pub peak_late: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FortuneTexts {
    #[serde(default)]
    pub types: HashMap<String, TypeText>,
    #[serde(default)]
    pub stages: StageTexts,
    #[serde(default)]
    pub summary: SummaryText,
}

/// Display profile for one animal type.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AnimalProfile {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub traits: Vec<String>,
}

fn parse_or_default<T>(what: &str, src: &str) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    match toml::from_str::<T>(src) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(table = what, error = %e, "bad embedded table TOML");
            T::default()
        }
    }
}

/// The embedded reading tables.
pub fn reading_tables() -> &'static ReadingTables {
    READING_TABLES.get_or_init(|| {
        let sources = [
            (Zone::Forehead, READINGS_FOREHEAD),
            (Zone::Eyes, READINGS_EYES),
            (Zone::Nose, READINGS_NOSE),
            (Zone::Mouth, READINGS_MOUTH),
            (Zone::FaceShape, READINGS_FACE_SHAPE),
            (Zone::Chin, READINGS_CHIN),
        ];
        let mut tables = ReadingTables::empty();
        for (zone, src) in sources {
            let table: ZoneTable = parse_or_default(zone.label(), src);
            tracing::debug!(zone = %zone, entries = table.len(), "loaded reading table");
            tables = tables.with_zone(zone, table);
        }
        tables
    })
}

/// The embedded fortune texts.
pub fn fortune_texts() -> &'static FortuneTexts {
    FORTUNE_TEXTS.get_or_init(|| parse_or_default("fortune", FORTUNE))
}

/// Look up the embedded profile for an animal key (e.g. "dog").
pub fn animal_profile(key: &str) -> Option<&'static AnimalProfile> {
    ANIMAL_PROFILES
        .get_or_init(|| parse_or_default("animals", ANIMALS))
        .get(key)
}
