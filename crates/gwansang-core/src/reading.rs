//! Face-reading scorer.
//!
//! Reads each of the six zones through its reading table, averages the hit
//! zones into five domain scores and derives life-stage fortunes, a type,
//! a career recommendation and lucky number/color from them.
//!
//! Randomness only selects display text (alternate phrasings, which
//! cautions are shown). Scores, type, career and lucky values depend on the
//! descriptor alone.

use crate::features::{
    ChinShape, FaceShapeType, FacialFeatures, Length, Level, LipShape, MouthCorners, Size,
    Spacing, Width,
};
use crate::rules::{first_match, Rule};
use crate::tables::{self, DomainScores, FortuneTexts, ReadingRecord, ReadingTables, Zone};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Domain score used when no zone produced a reading.
pub const DEFAULT_SCORE: f64 = 3.5;
pub const MAX_PERSONALITY_TAGS: usize = 6;
pub const MAX_CAUTIONS: usize = 6;
const TRAITS_PER_ZONE: usize = 2;
const CAUTIONS_PER_ZONE: usize = 2;
const MAX_CAREERS: usize = 3;
const DEFAULT_LUCKY_COLOR: &str = "흰색";
const DEFAULT_CAREER: &str = "다양한 분야에서 능력을 발휘할 수 있는 만능형";
const VARIANT_PROBABILITY: f64 = 0.5;

type KeyRule = Rule<FacialFeatures, &'static str>;

const FOREHEAD_KEYS: &[KeyRule] = &[
    Rule { when: |f| f.forehead.width == Width::Wide, then: "넓은이마" },
    Rule { when: |f| f.forehead.height == Level::High, then: "높은이마" },
    Rule { when: |f| f.forehead.width == Width::Narrow, then: "좁은이마" },
    Rule { when: |f| f.forehead.height == Level::Low, then: "낮은이마" },
];

const EYE_KEYS: &[KeyRule] = &[
    Rule { when: |f| f.eyes.size == Size::Large, then: "큰눈" },
    Rule { when: |f| f.eyes.size == Size::Small, then: "작은눈" },
    Rule { when: |f| f.eyes.spacing == Spacing::Wide, then: "눈간격넓음" },
    Rule { when: |f| f.eyes.spacing == Spacing::Close, then: "눈간격좁음" },
];

const NOSE_KEYS: &[KeyRule] = &[
    Rule { when: |f| f.nose.size == Size::Large, then: "큰코" },
    Rule { when: |f| f.nose.size == Size::Small, then: "작은코" },
    Rule { when: |f| f.nose.bridge == Level::High, then: "높은콧대" },
    Rule { when: |f| f.nose.bridge == Level::Low, then: "낮은콧대" },
];

const MOUTH_KEYS: &[KeyRule] = &[
    Rule { when: |f| f.mouth.corners == MouthCorners::Up, then: "올라간입꼬리" },
    Rule { when: |f| f.mouth.corners == MouthCorners::Down, then: "내려간입꼬리" },
    Rule { when: |f| f.mouth.size == Size::Large, then: "큰입" },
    Rule { when: |f| f.mouth.shape == LipShape::Full, then: "두툼한입술" },
    Rule { when: |f| f.mouth.shape == LipShape::Thin, then: "얇은입술" },
];

const CHIN_KEYS: &[KeyRule] = &[
    Rule { when: |f| f.chin.shape == ChinShape::Pointed, then: "뾰족한턱" },
    Rule { when: |f| f.chin.shape == ChinShape::Square, then: "각진턱" },
    Rule { when: |f| f.chin.length == Length::Long, then: "긴턱" },
    Rule { when: |f| f.chin.width == Width::Wide, then: "넓은턱" },
];

/// Composite lookup key for a zone, e.g. "큰눈". "보통*" keys carry no reading.
pub fn zone_key(zone: Zone, f: &FacialFeatures) -> &'static str {
    let (rules, fallback) = match zone {
        Zone::Forehead => (FOREHEAD_KEYS, "보통이마"),
        Zone::Eyes => (EYE_KEYS, "보통눈"),
        Zone::Nose => (NOSE_KEYS, "보통코"),
        Zone::Mouth => (MOUTH_KEYS, "보통입"),
        Zone::Chin => (CHIN_KEYS, "보통턱"),
        Zone::FaceShape => {
            return match f.face_shape.kind {
                FaceShapeType::Oval => "계란형",
                FaceShapeType::Round => "둥근형",
                FaceShapeType::Square => "각진형",
                FaceShapeType::Heart => "하트형",
                FaceShapeType::Long => "긴형",
                FaceShapeType::Diamond => "다이아몬드형",
            }
        }
    };
    first_match(rules, f).unwrap_or(fallback)
}

/// Face-reading type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FaceType {
    #[serde(rename = "재물상")]
    Wealth,
    #[serde(rename = "복덕상")]
    Blessed,
    #[serde(rename = "리더상")]
    Leader,
    #[serde(rename = "귀인상")]
    Noble,
    #[serde(rename = "학자상")]
    Scholar,
    #[serde(rename = "예술가상")]
    Artist,
}

impl FaceType {
    pub fn label(&self) -> &'static str {
        match self {
            FaceType::Wealth => "재물상",
            FaceType::Blessed => "복덕상",
            FaceType::Leader => "리더상",
            FaceType::Noble => "귀인상",
            FaceType::Scholar => "학자상",
            FaceType::Artist => "예술가상",
        }
    }
}

impl fmt::Display for FaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const LEADERSHIP_WORDS: &[&str] = &["리더", "추진력", "결단력", "카리스마"];
const INTELLECT_WORDS: &[&str] = &["지적", "분석", "논리", "학구", "지혜"];
const ARTISTIC_WORDS: &[&str] = &["예술", "감성", "창의", "감수성"];

/// What the type and career rules look at.
struct Profile {
    scores: DomainScores,
    overall: f64,
    personality: Vec<String>,
}

impl Profile {
    fn has_trait(&self, words: &[&str]) -> bool {
        self.personality
            .iter()
            .any(|tag| words.iter().any(|w| tag.contains(*w)))
    }

    fn wealth_dominant(&self) -> bool {
        let s = &self.scores;
        s.wealth >= 4.5
            && [s.love, s.career, s.health, s.relationships]
                .iter()
                .all(|&v| s.wealth > v)
    }

    fn career_dominant(&self) -> bool {
        let s = &self.scores;
        s.career >= 4.3 && s.values().iter().all(|&v| s.career >= v)
    }
}

const TYPE_RULES: &[Rule<Profile, FaceType>] = &[
    Rule { when: |p| p.wealth_dominant(), then: FaceType::Wealth },
    Rule {
        when: |p| p.scores.love >= 4.5 && p.scores.relationships >= 4.5,
        then: FaceType::Blessed,
    },
    Rule {
        when: |p| p.career_dominant() && p.has_trait(LEADERSHIP_WORDS),
        then: FaceType::Leader,
    },
    Rule { when: |p| p.career_dominant(), then: FaceType::Noble },
    Rule {
        when: |p| p.has_trait(INTELLECT_WORDS) && p.scores.career >= 3.8,
        then: FaceType::Scholar,
    },
    Rule { when: |p| p.has_trait(ARTISTIC_WORDS), then: FaceType::Artist },
    Rule { when: |p| p.overall >= 4.0, then: FaceType::Noble },
];

const CAREER_RULES: &[Rule<Profile, &[&str]>] = &[
    Rule { when: |p| p.scores.wealth >= 4.0, then: &["사업가", "투자 전문가", "금융인"] },
    Rule { when: |p| p.scores.career >= 4.0, then: &["경영인", "공무원", "법조인"] },
    Rule { when: |p| p.has_trait(LEADERSHIP_WORDS), then: &["CEO", "정치인", "관리자"] },
    Rule { when: |p| p.has_trait(INTELLECT_WORDS), then: &["연구원", "교수", "엔지니어"] },
    Rule { when: |p| p.has_trait(ARTISTIC_WORDS), then: &["예술가", "디자이너", "작가"] },
    Rule {
        when: |p| p.scores.love >= 4.0 || p.scores.relationships >= 4.0,
        then: &["상담가", "교육자", "서비스 전문가"],
    },
    Rule { when: |p| p.scores.health >= 4.0, then: &["운동선수", "의료인"] },
];

/// One zone's key and the text shown for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneReading {
    pub zone: Zone,
    pub key: String,
    /// `None` when the key has no reading record.
    pub interpretation: Option<String>,
}

/// Fortune for one period of life.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifeStage {
    pub label: String,
    pub period: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifeStages {
    pub early: LifeStage,
    pub middle: LifeStage,
    pub late: LifeStage,
}

/// A complete face reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceReading {
    pub face_type: FaceType,
    pub type_description: String,
    pub scores: DomainScores,
    pub overall: f64,
    pub life_stages: LifeStages,
    pub career: String,
    pub personality: Vec<String>,
    pub cautions: Vec<String>,
    pub lucky_number: u32,
    pub lucky_color: String,
    pub summary: String,
    pub zones: Vec<ZoneReading>,
}

/// Scores a [`FacialFeatures`] descriptor against reading tables.
pub struct FaceReader<'a> {
    tables: &'a ReadingTables,
    texts: &'a FortuneTexts,
    phrase_variants: bool,
}

impl Default for FaceReader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceReader<'static> {
    /// Reader over the embedded tables, with phrase variants enabled.
    pub fn new() -> Self {
        Self::with_tables(tables::reading_tables(), tables::fortune_texts())
    }
}

impl<'a> FaceReader<'a> {
    pub fn with_tables(tables: &'a ReadingTables, texts: &'a FortuneTexts) -> Self {
        Self {
            tables,
            texts,
            phrase_variants: true,
        }
    }

    /// Enable or disable the 50% substitution of alternate phrasings.
    pub fn phrase_variants(mut self, enabled: bool) -> Self {
        self.phrase_variants = enabled;
        self
    }

    pub fn read<R: Rng + ?Sized>(&self, features: &FacialFeatures, rng: &mut R) -> FaceReading {
        let mut hits: Vec<(Zone, &ReadingRecord)> = Vec::with_capacity(Zone::ALL.len());
        let mut zones = Vec::with_capacity(Zone::ALL.len());

        for zone in Zone::ALL {
            let key = zone_key(zone, features);
            let record = self.tables.get(zone, key);
            let interpretation = record.map(|r| self.phrase(r, &mut *rng));
            if let Some(r) = record {
                hits.push((zone, r));
            }
            zones.push(ZoneReading {
                zone,
                key: key.to_string(),
                interpretation,
            });
        }

        let scores = average_scores(&hits);
        let overall = mean_tenths(scores.values().iter().map(|&v| tenths(v)).sum(), 5);

        let early = stage_score(&hits, &[Zone::Forehead], |s| {
            [s.wealth, s.career, s.relationships].to_vec()
        });
        let middle = stage_score(&hits, &[Zone::Eyes, Zone::Nose], |s| [s.wealth, s.career].to_vec());
        let late = stage_score(&hits, &[Zone::Mouth, Zone::Chin], |s| {
            [s.health, s.relationships].to_vec()
        });

        let personality = collect_unique(
            hits.iter()
                .flat_map(|(_, r)| r.traits.iter().take(TRAITS_PER_ZONE).cloned()),
            MAX_PERSONALITY_TAGS,
        );

        let mut shown_cautions = Vec::new();
        for (_, record) in &hits {
            let mut pool = record.cautions.clone();
            pool.shuffle(rng);
            shown_cautions.extend(pool.into_iter().take(CAUTIONS_PER_ZONE));
        }
        let cautions = collect_unique(shown_cautions, MAX_CAUTIONS);

        let profile = Profile {
            scores,
            overall,
            personality,
        };
        let face_type = first_match(TYPE_RULES, &profile).unwrap_or(FaceType::Blessed);
        let career = recommend_career(&profile);
        let personality = profile.personality;

        let type_text = self.texts.types.get(face_type.label());
        let lucky_color = type_text
            .map(|t| t.color.clone())
            .unwrap_or_else(|| DEFAULT_LUCKY_COLOR.to_string());
        let type_description = type_text.map(|t| t.description.clone()).unwrap_or_default();

        let stage_texts = &self.texts.stages;
        let life_stages = LifeStages {
            early: life_stage(&stage_texts.early, early),
            middle: life_stage(&stage_texts.middle, middle),
            late: life_stage(&stage_texts.late, late),
        };

        let summary = self.summary(overall, early, middle, late);

        tracing::debug!(
            hits = hits.len(),
            face_type = %face_type,
            overall,
            "face reading scored"
        );

        FaceReading {
            face_type,
            type_description,
            scores,
            overall,
            life_stages,
            career,
            personality,
            cautions,
            lucky_number: lucky_number(early, middle, late),
            lucky_color,
            summary,
            zones,
        }
    }

    fn phrase<R: Rng + ?Sized>(&self, record: &ReadingRecord, rng: &mut R) -> String {
        if self.phrase_variants && !record.variants.is_empty() && rng.gen_bool(VARIANT_PROBABILITY)
        {
            if let Some(v) = record.variants.choose(rng) {
                return v.clone();
            }
        }
        record.meaning.clone()
    }

    fn summary(&self, overall: f64, early: f64, middle: f64, late: f64) -> String {
        let text = &self.texts.summary;
        let mut parts: Vec<&str> = Vec::with_capacity(2);
        if let Some(s) = text.overall.get(tier(overall)) {
            parts.push(s);
        }

        // Ties resolve to the earlier stage.
        let mut peak = (early, text.peak_early.as_str());
        for candidate in [(middle, text.peak_middle.as_str()), (late, text.peak_late.as_str())] {
            if candidate.0 > peak.0 {
                peak = candidate;
            }
        }
        if !peak.1.is_empty() {
            parts.push(peak.1);
        }
        parts.join(" ")
    }
}

fn average_scores(hits: &[(Zone, &ReadingRecord)]) -> DomainScores {
    if hits.is_empty() {
        return DomainScores::uniform(DEFAULT_SCORE);
    }
    let n = hits.len() as i64;
    let mean = |pick: fn(&DomainScores) -> f64| {
        mean_tenths(hits.iter().map(|(_, r)| tenths(pick(&r.scores))).sum(), n)
    };
    DomainScores {
        wealth: mean(|s| s.wealth),
        love: mean(|s| s.love),
        career: mean(|s| s.career),
        health: mean(|s| s.health),
        relationships: mean(|s| s.relationships),
    }
}

/// Mean over the hit zones in `subset` of the per-zone mean of the domains
/// `pick` selects, or the default score.
///
/// The per-zone means share one divisor, so the whole thing is a single
/// division of summed tenths.
fn stage_score(
    hits: &[(Zone, &ReadingRecord)],
    subset: &[Zone],
    pick: fn(&DomainScores) -> Vec<f64>,
) -> f64 {
    let mut sum = 0;
    let mut count = 0;
    for (_, record) in hits.iter().filter(|(zone, _)| subset.contains(zone)) {
        let domains = pick(&record.scores);
        sum += domains.iter().map(|&v| tenths(v)).sum::<i64>();
        count += domains.len() as i64;
    }
    if count == 0 {
        return DEFAULT_SCORE;
    }
    mean_tenths(sum, count)
}

fn life_stage(text: &tables::StageText, score: f64) -> LifeStage {
    LifeStage {
        label: text.label.clone(),
        period: text.period.clone(),
        score,
        description: text.descriptions.get(tier(score)).cloned().unwrap_or_default(),
    }
}

fn recommend_career(profile: &Profile) -> String {
    let candidates = CAREER_RULES
        .iter()
        .filter(|rule| (rule.when)(profile))
        .flat_map(|rule| rule.then.iter().map(|s| s.to_string()));
    let careers = collect_unique(candidates, MAX_CAREERS);
    if careers.is_empty() {
        DEFAULT_CAREER.to_string()
    } else {
        careers.join(", ")
    }
}

/// Order-preserving de-duplication, capped at `limit` entries.
fn collect_unique<I: IntoIterator<Item = String>>(items: I, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(limit)
        .collect()
}

/// Description band: 0 for >= 4.5, 1 for >= 4.0, 2 for >= 3.5, else 3.
fn tier(score: f64) -> usize {
    if score >= 4.5 {
        0
    } else if score >= 4.0 {
        1
    } else if score >= 3.5 {
        2
    } else {
        3
    }
}

/// A one-decimal score as whole tenths.
fn tenths(v: f64) -> i64 {
    (v * 10.0).round() as i64
}

/// `sum / count` tenths rounded half-up to one decimal. Scores are never
/// negative.
fn mean_tenths(sum: i64, count: i64) -> f64 {
    ((2 * sum + count) / (2 * count)) as f64 / 10.0
}

/// `floor((early + middle + late) * 11) mod 99 + 1`, always in 1..=99.
///
/// Stage scores carry one decimal, so the product is taken on tenths.
pub fn lucky_number(early: f64, middle: f64, late: f64) -> u32 {
    let sum = tenths(early) + tenths(middle) + tenths(late);
    let raw = (sum.max(0) * 11 / 10) as u32;
    raw % 99 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::EyeShape;
    use crate::tables::ZoneTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(scores: DomainScores, traits: &[&str], cautions: &[&str]) -> ReadingRecord {
        ReadingRecord {
            meaning: "meaning".into(),
            variants: vec!["variant a".into(), "variant b".into()],
            traits: traits.iter().map(|s| s.to_string()).collect(),
            cautions: cautions.iter().map(|s| s.to_string()).collect(),
            scores,
        }
    }

    fn single(key: &str, rec: ReadingRecord) -> ZoneTable {
        ZoneTable::from([(key.to_string(), rec)])
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Descriptors spread over many zone-key combinations.
    fn varied_features() -> Vec<FacialFeatures> {
        let mut out = Vec::new();
        for &size in Size::ALL {
            for &corners in MouthCorners::ALL {
                for &kind in FaceShapeType::ALL {
                    for &chin in ChinShape::ALL {
                        let mut f = FacialFeatures::default();
                        f.eyes.size = size;
                        f.nose.size = size;
                        f.forehead.width = match size {
                            Size::Small => Width::Narrow,
                            Size::Medium => Width::Medium,
                            Size::Large => Width::Wide,
                        };
                        f.mouth.corners = corners;
                        f.face_shape.kind = kind;
                        f.chin.shape = chin;
                        out.push(f);
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_no_hits_defaults_to_3_5() {
        let tables = ReadingTables::empty();
        let texts = FortuneTexts::default();
        let reader = FaceReader::with_tables(&tables, &texts);
        let result = reader.read(&FacialFeatures::default(), &mut rng(1));

        assert_eq!(result.scores, DomainScores::uniform(3.5));
        assert_eq!(result.face_type, FaceType::Blessed);
        assert_eq!(result.life_stages.early.score, 3.5);
        assert_eq!(result.life_stages.middle.score, 3.5);
        assert_eq!(result.life_stages.late.score, 3.5);
        // floor(10.5 * 11) = 115; 115 % 99 + 1 = 17
        assert_eq!(result.lucky_number, 17);
        assert_eq!(result.lucky_color, "흰색");
        assert!(result.personality.is_empty());
        assert!(result.cautions.is_empty());
        assert!(result.zones.iter().all(|z| z.interpretation.is_none()));
    }

    #[test]
    fn test_wealth_dominant_is_wealth_type() {
        let texts = FortuneTexts::default();
        let rich = record(
            DomainScores {
                wealth: 4.9,
                love: 4.8,
                career: 4.8,
                health: 4.8,
                relationships: 4.8,
            },
            &["리더십", "분석력"],
            &[],
        );
        let tables = ReadingTables::empty().with_zone(Zone::FaceShape, single("계란형", rich));
        let result = FaceReader::with_tables(&tables, &texts).read(&FacialFeatures::default(), &mut rng(2));
        // Love/relationships >= 4.5 and leadership traits would also match later rules.
        assert_eq!(result.face_type, FaceType::Wealth);
    }

    #[test]
    fn test_wealth_tie_is_not_dominant() {
        let texts = FortuneTexts::default();
        let tied = record(
            DomainScores {
                wealth: 4.6,
                love: 4.6,
                career: 3.0,
                health: 3.0,
                relationships: 4.6,
            },
            &[],
            &[],
        );
        let tables = ReadingTables::empty().with_zone(Zone::FaceShape, single("계란형", tied));
        let result = FaceReader::with_tables(&tables, &texts).read(&FacialFeatures::default(), &mut rng(3));
        assert_eq!(result.face_type, FaceType::Blessed);
    }

    #[test]
    fn test_career_dominant_split_by_leadership() {
        let texts = FortuneTexts::default();
        let scores = DomainScores {
            wealth: 3.9,
            love: 3.5,
            career: 4.6,
            health: 3.8,
            relationships: 3.6,
        };
        let leader = ReadingTables::empty().with_zone(
            Zone::FaceShape,
            single("계란형", record(scores, &["결단력"], &[])),
        );
        let noble = ReadingTables::empty().with_zone(
            Zone::FaceShape,
            single("계란형", record(scores, &["성실함"], &[])),
        );
        let f = FacialFeatures::default();
        assert_eq!(
            FaceReader::with_tables(&leader, &texts).read(&f, &mut rng(4)).face_type,
            FaceType::Leader
        );
        assert_eq!(
            FaceReader::with_tables(&noble, &texts).read(&f, &mut rng(4)).face_type,
            FaceType::Noble
        );
    }

    #[test]
    fn test_scholar_and_artist() {
        let texts = FortuneTexts::default();
        let scores = DomainScores::uniform(3.8);
        let f = FacialFeatures::default();
        let scholar = ReadingTables::empty().with_zone(
            Zone::FaceShape,
            single("계란형", record(scores, &["논리적", "예술적 감각"], &[])),
        );
        assert_eq!(
            FaceReader::with_tables(&scholar, &texts).read(&f, &mut rng(5)).face_type,
            FaceType::Scholar
        );
        let artist = ReadingTables::empty().with_zone(
            Zone::FaceShape,
            single("계란형", record(scores, &["창의적"], &[])),
        );
        assert_eq!(
            FaceReader::with_tables(&artist, &texts).read(&f, &mut rng(5)).face_type,
            FaceType::Artist
        );
    }

    #[test]
    fn test_medium_face_with_embedded_tables() {
        let reader = FaceReader::new();
        let result = reader.read(&FacialFeatures::default(), &mut rng(6));

        // Only the oval outline has a reading.
        let hits: Vec<_> = result.zones.iter().filter(|z| z.interpretation.is_some()).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "계란형");

        assert_eq!(
            result.scores,
            DomainScores {
                wealth: 4.0,
                love: 4.3,
                career: 4.0,
                health: 4.0,
                relationships: 4.3,
            }
        );
        assert_eq!(result.overall, 4.1);
        assert_eq!(result.face_type, FaceType::Noble);
        assert_eq!(result.lucky_color, "보라색");
        assert_eq!(result.lucky_number, 17);
        assert_eq!(result.personality, vec!["균형 감각", "사교적"]);
        assert_eq!(result.life_stages.early.label, "초년운");
        assert_eq!(result.life_stages.late.period, "51세 이후");
        assert!(result.summary.starts_with("전반적으로 운이 좋은 관상입니다."));
    }

    #[test]
    fn test_life_stage_subsets() {
        let texts = FortuneTexts::default();
        let s = |w: f64, c: f64, h: f64, r: f64| DomainScores {
            wealth: w,
            love: 3.0,
            career: c,
            health: h,
            relationships: r,
        };
        let tables = ReadingTables::empty()
            .with_zone(Zone::Forehead, single("넓은이마", record(s(5.0, 4.0, 1.0, 3.0), &[], &[])))
            .with_zone(Zone::Eyes, single("큰눈", record(s(4.0, 4.0, 1.0, 1.0), &[], &[])))
            .with_zone(Zone::Nose, single("큰코", record(s(3.0, 3.0, 1.0, 1.0), &[], &[])))
            .with_zone(Zone::Chin, single("각진턱", record(s(1.0, 1.0, 5.0, 4.0), &[], &[])));

        let mut f = FacialFeatures::default();
        f.forehead.width = Width::Wide;
        f.eyes.size = Size::Large;
        f.nose.size = Size::Large;
        f.chin.shape = ChinShape::Square;

        let result = FaceReader::with_tables(&tables, &texts).read(&f, &mut rng(7));
        assert_eq!(result.life_stages.early.score, 4.0); // (5 + 4 + 3) / 3
        assert_eq!(result.life_stages.middle.score, 3.5); // mean(4, 3)
        assert_eq!(result.life_stages.late.score, 4.5); // mouth misses; chin (5 + 4) / 2
        // floor(12.0 * 11) = 132; 132 % 99 + 1 = 34
        assert_eq!(result.lucky_number, 34);
    }

    #[test]
    fn test_domain_means_round_half_up() {
        let texts = FortuneTexts::default();
        let s = |w: f64, l: f64| DomainScores {
            wealth: w,
            love: l,
            career: 3.0,
            health: 3.0,
            relationships: 3.0,
        };
        let tables = ReadingTables::empty()
            .with_zone(Zone::Eyes, single("큰눈", record(s(4.1, 4.6), &[], &[])))
            .with_zone(Zone::Nose, single("큰코", record(s(4.2, 4.7), &[], &[])));
        let mut f = FacialFeatures::default();
        f.eyes.size = Size::Large;
        f.nose.size = Size::Large;

        let r = FaceReader::with_tables(&tables, &texts).read(&f, &mut rng(11));
        // 4.15 and 4.65 sit exactly on the midpoint.
        assert_eq!(r.scores.wealth, 4.2);
        assert_eq!(r.scores.love, 4.7);
        // (42 + 47 + 30 + 30 + 30) / 5 = 35.8 tenths
        assert_eq!(r.overall, 3.6);
        // mean(4.1, 3.0, 4.2, 3.0) = 3.575
        assert_eq!(r.life_stages.middle.score, 3.6);
    }

    #[test]
    fn test_mean_tenths_half_up() {
        assert_eq!(mean_tenths(41 + 42, 2), 4.2);
        assert_eq!(mean_tenths(46 + 47, 2), 4.7);
        assert_eq!(mean_tenths(36 + 47, 2), 4.2);
        assert_eq!(mean_tenths(124, 3), 4.1);
        assert_eq!(mean_tenths(125, 3), 4.2);
        assert_eq!(mean_tenths(35, 1), 3.5);
    }

    #[test]
    fn test_lucky_number_whole_sums() {
        // Each sum is exactly 12.0; floor(132) % 99 + 1 = 34.
        assert_eq!(lucky_number(3.6, 4.7, 3.7), 34);
        assert_eq!(lucky_number(4.1, 4.2, 3.7), 34);
        assert_eq!(lucky_number(4.0, 3.5, 4.5), 34);
        // 9.9 * 11 = 108.9
        assert_eq!(lucky_number(3.3, 3.3, 3.3), 10);
        // 9.0 * 11 = 99 wraps to 1
        assert_eq!(lucky_number(3.0, 3.0, 3.0), 1);
    }

    #[test]
    fn test_zone_key_priorities() {
        let mut f = FacialFeatures::default();
        f.eyes.size = Size::Large;
        f.eyes.spacing = Spacing::Wide;
        assert_eq!(zone_key(Zone::Eyes, &f), "큰눈");
        f.eyes.size = Size::Medium;
        assert_eq!(zone_key(Zone::Eyes, &f), "눈간격넓음");
        f.eyes.spacing = Spacing::Medium;
        f.eyes.shape = EyeShape::Round;
        assert_eq!(zone_key(Zone::Eyes, &f), "보통눈");

        f.mouth.corners = MouthCorners::Up;
        f.mouth.size = Size::Large;
        assert_eq!(zone_key(Zone::Mouth, &f), "올라간입꼬리");

        f.face_shape.kind = FaceShapeType::Diamond;
        assert_eq!(zone_key(Zone::FaceShape, &f), "다이아몬드형");
        assert_eq!(zone_key(Zone::Chin, &FacialFeatures::default()), "보통턱");
    }

    #[test]
    fn test_seeded_reading_is_reproducible() {
        let reader = FaceReader::new();
        for f in varied_features().iter().step_by(7) {
            let a = reader.read(f, &mut rng(42));
            let b = reader.read(f, &mut rng(42));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_randomness_never_changes_numbers() {
        let with_variants = FaceReader::new();
        let plain = FaceReader::new().phrase_variants(false);
        for f in varied_features() {
            let a = with_variants.read(&f, &mut rng(1));
            let b = plain.read(&f, &mut rng(999));
            assert_eq!(a.scores, b.scores);
            assert_eq!(a.overall, b.overall);
            assert_eq!(a.face_type, b.face_type);
            assert_eq!(a.career, b.career);
            assert_eq!(a.personality, b.personality);
            assert_eq!(a.lucky_number, b.lucky_number);
            assert_eq!(a.lucky_color, b.lucky_color);
            assert_eq!(a.life_stages, b.life_stages);
        }
    }

    #[test]
    fn test_variants_disabled_uses_base_meaning() {
        let tables = reading_tables_for_variants();
        let texts = FortuneTexts::default();
        let reader = FaceReader::with_tables(&tables, &texts).phrase_variants(false);
        for seed in 0..20 {
            let r = reader.read(&FacialFeatures::default(), &mut rng(seed));
            assert_eq!(r.zones[4].interpretation.as_deref(), Some("meaning"));
        }
    }

    #[test]
    fn test_variants_enabled_sometimes_substitutes() {
        let tables = reading_tables_for_variants();
        let texts = FortuneTexts::default();
        let reader = FaceReader::with_tables(&tables, &texts);
        let texts_seen: HashSet<String> = (0..64)
            .filter_map(|seed| reader.read(&FacialFeatures::default(), &mut rng(seed)).zones[4].interpretation.clone())
            .collect();
        assert!(texts_seen.contains("meaning"));
        assert!(texts_seen.len() > 1);
    }

    fn reading_tables_for_variants() -> ReadingTables {
        ReadingTables::empty().with_zone(
            Zone::FaceShape,
            single("계란형", record(DomainScores::uniform(4.0), &["a"], &["c"])),
        )
    }

    #[test]
    fn test_tags_and_cautions_capped_and_unique() {
        let reader = FaceReader::new();
        for (i, f) in varied_features().iter().enumerate() {
            let r = reader.read(f, &mut rng(i as u64));
            assert!(r.personality.len() <= MAX_PERSONALITY_TAGS);
            assert!(r.cautions.len() <= MAX_CAUTIONS);
            let tags: HashSet<_> = r.personality.iter().collect();
            assert_eq!(tags.len(), r.personality.len());
            let cautions: HashSet<_> = r.cautions.iter().collect();
            assert_eq!(cautions.len(), r.cautions.len());
            assert!((1..=99).contains(&r.lucky_number));
        }
    }

    #[test]
    fn test_duplicate_traits_collapse() {
        let texts = FortuneTexts::default();
        let rec = || record(DomainScores::uniform(4.0), &["같음", "같음", "다름"], &["주의", "주의"]);
        let tables = ReadingTables::empty()
            .with_zone(Zone::Eyes, single("큰눈", rec()))
            .with_zone(Zone::Nose, single("큰코", rec()));
        let mut f = FacialFeatures::default();
        f.eyes.size = Size::Large;
        f.nose.size = Size::Large;
        let r = FaceReader::with_tables(&tables, &texts).read(&f, &mut rng(8));
        assert_eq!(r.personality, vec!["같음"]);
        assert_eq!(r.cautions, vec!["주의"]);
    }

    #[test]
    fn test_lucky_number_range() {
        let steps: Vec<f64> = (0..=50).map(|i| i as f64 * 0.1).collect();
        for &e in &steps {
            for &m in steps.iter().step_by(5) {
                for &l in steps.iter().step_by(3) {
                    let n = lucky_number(e, m, l);
                    assert!((1..=99).contains(&n), "lucky_number({e}, {m}, {l}) = {n}");
                }
            }
        }
        assert_eq!(lucky_number(0.0, 0.0, 0.0), 1);
        assert_eq!(lucky_number(5.0, 5.0, 5.0), 67);
    }

    #[test]
    fn test_career_fallback_and_cap() {
        let texts = FortuneTexts::default();
        let empty = ReadingTables::empty();
        let r = FaceReader::with_tables(&empty, &texts).read(&FacialFeatures::default(), &mut rng(9));
        assert_eq!(r.career, DEFAULT_CAREER);

        let r = FaceReader::new().read(&FacialFeatures::default(), &mut rng(9));
        assert_eq!(r.career, "사업가, 투자 전문가, 금융인");
    }

    #[test]
    fn test_tier_bands() {
        assert_eq!(tier(5.0), 0);
        assert_eq!(tier(4.5), 0);
        assert_eq!(tier(4.0), 1);
        assert_eq!(tier(3.5), 2);
        assert_eq!(tier(3.4), 3);
    }

    #[test]
    fn test_serializes_type_label() {
        let r = FaceReader::new().read(&FacialFeatures::default(), &mut rng(10));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["faceType"], "귀인상");
        assert_eq!(json["luckyColor"], "보라색");
        assert_eq!(json["zones"][4]["zone"], "faceShape");
    }
}
