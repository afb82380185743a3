//! # Core Type Definitions
//!
//! Shared vocabulary of the gap-analysis engine:
//! - Indicator categories and transformation areas (`Category`, `TransformationArea`)
//! - The bounded year of a trajectory (`TransformationYear`)
//! - Per-year expectations (`YearExpectation`)
//! - Gap verdicts (`GapClassification`)
//! - Inbound definitions (`IndicatorDefinition`, `ModuleDefinition`, `IndicatorScores`)
//! - Error types (`ValidationError`)
//!
//! ## Determinism Guarantees
//!
//! Every enum implements `Ord` so it can key a `BTreeMap`, and every keyed
//! collection in this crate is a `BTreeMap`. Nothing here holds interior state.

use crate::primitives::{MAX_LEVEL, TRANSFORMATION_YEARS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// CATEGORY
// =============================================================================

/// How an indicator is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Depth rubric, levels 0-4.
    Profundidad,
    /// Binary presence, levels 0-1.
    Cobertura,
    /// Binary regularity, levels 0-1.
    Frecuencia,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Category; 3] = [
        Category::Profundidad,
        Category::Cobertura,
        Category::Frecuencia,
    ];

    /// Parse a lowercase category tag for the given indicator.
    pub fn parse(value: &str, indicator_id: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownCategory {
                indicator_id: indicator_id.to_string(),
                value: value.to_string(),
            })
    }

    /// Wire tag of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Profundidad => "profundidad",
            Category::Cobertura => "cobertura",
            Category::Frecuencia => "frecuencia",
        }
    }

    /// Highest level an indicator of this category can reach.
    #[must_use]
    pub fn max_level(&self) -> u8 {
        match self {
            Category::Profundidad => MAX_LEVEL,
            Category::Cobertura | Category::Frecuencia => 1,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// TRANSFORMATION AREA
// =============================================================================

/// Thematic domain an assessment instance belongs to.
///
/// Labels and availability live in [`crate::maturity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationArea {
    Personalizacion,
    Aprendizaje,
    Evaluacion,
    Proposito,
    Familias,
    TrabajoDocente,
    Liderazgo,
}

impl TransformationArea {
    /// Every area in declaration order.
    pub const ALL: [TransformationArea; 7] = [
        TransformationArea::Personalizacion,
        TransformationArea::Aprendizaje,
        TransformationArea::Evaluacion,
        TransformationArea::Proposito,
        TransformationArea::Familias,
        TransformationArea::TrabajoDocente,
        TransformationArea::Liderazgo,
    ];

    /// Parse a snake_case area tag.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|area| area.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownArea(value.to_string()))
    }

    /// Wire tag of the area.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationArea::Personalizacion => "personalizacion",
            TransformationArea::Aprendizaje => "aprendizaje",
            TransformationArea::Evaluacion => "evaluacion",
            TransformationArea::Proposito => "proposito",
            TransformationArea::Familias => "familias",
            TransformationArea::TrabajoDocente => "trabajo_docente",
            TransformationArea::Liderazgo => "liderazgo",
        }
    }
}

impl std::fmt::Display for TransformationArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// TRANSFORMATION YEAR
// =============================================================================

/// Year of the school's transformation trajectory, always in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TransformationYear(u8);

impl TransformationYear {
    /// First trajectory year.
    pub const FIRST: TransformationYear = TransformationYear(1);

    /// Validate and wrap a year number.
    pub fn new(year: i64) -> Result<Self, ValidationError> {
        u8::try_from(year)
            .ok()
            .filter(|y| (1..=TRANSFORMATION_YEARS).contains(y))
            .map(Self)
            .ok_or(ValidationError::InvalidTransformationYear(year))
    }

    /// Raw year number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// All five years in order.
    pub fn all() -> impl Iterator<Item = TransformationYear> {
        (1..=TRANSFORMATION_YEARS).map(TransformationYear)
    }
}

impl TryFrom<u8> for TransformationYear {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<TransformationYear> for u8 {
    fn from(year: TransformationYear) -> Self {
        year.0
    }
}

impl std::fmt::Display for TransformationYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// YEAR EXPECTATION
// =============================================================================

/// Expected level per trajectory year plus the shortfall tolerance.
///
/// A `None` year means "not configured for that year", never level 0.
/// The tolerance is kept signed so that a negative value coming off the wire
/// can be reported instead of silently wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YearExpectation {
    pub year_1_expected: Option<u8>,
    pub year_2_expected: Option<u8>,
    pub year_3_expected: Option<u8>,
    pub year_4_expected: Option<u8>,
    pub year_5_expected: Option<u8>,
    pub tolerance: i32,
}

impl YearExpectation {
    /// Build from an ordered year-1..year-5 array.
    #[must_use]
    pub const fn new(levels: [Option<u8>; 5], tolerance: i32) -> Self {
        Self {
            year_1_expected: levels[0],
            year_2_expected: levels[1],
            year_3_expected: levels[2],
            year_4_expected: levels[3],
            year_5_expected: levels[4],
            tolerance,
        }
    }

    /// Same expected level in every year.
    #[must_use]
    pub const fn uniform(level: u8, tolerance: i32) -> Self {
        Self::new([Some(level); 5], tolerance)
    }

    /// Expected level configured for `year`, if any.
    #[must_use]
    pub const fn expected_for(&self, year: TransformationYear) -> Option<u8> {
        match year.get() {
            1 => self.year_1_expected,
            2 => self.year_2_expected,
            3 => self.year_3_expected,
            4 => self.year_4_expected,
            _ => self.year_5_expected,
        }
    }

    /// `(year, expected)` pairs in year order.
    pub fn levels(&self) -> impl Iterator<Item = (TransformationYear, Option<u8>)> + '_ {
        TransformationYear::all().map(|year| (year, self.expected_for(year)))
    }
}

// =============================================================================
// GAP CLASSIFICATION
// =============================================================================

/// Verdict for one indicator relative to its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapClassification {
    Ahead,
    OnTrack,
    Behind,
    Critical,
}

impl GapClassification {
    /// Wire tag of the classification.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GapClassification::Ahead => "ahead",
            GapClassification::OnTrack => "on_track",
            GapClassification::Behind => "behind",
            GapClassification::Critical => "critical",
        }
    }

    /// True for the two verdicts that need attention.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        matches!(self, GapClassification::Behind | GapClassification::Critical)
    }
}

impl std::fmt::Display for GapClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// INBOUND DEFINITIONS
// =============================================================================

/// Normalized 0-100 score per indicator id.
///
/// Indicators missing from the map are treated as scoring 0.
pub type IndicatorScores = BTreeMap<String, f64>;

/// Indicator as supplied by the template store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expectations: Option<YearExpectation>,
    /// Weight used when averaging response scores; 1 unless configured.
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_config: Option<crate::scoring::FrequencyConfig>,
}

fn default_weight() -> f64 {
    1.0
}

impl IndicatorDefinition {
    /// Create an unweighted indicator with no frequency range.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        expectations: Option<YearExpectation>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: None,
            category,
            expectations,
            weight: default_weight(),
            frequency_config: None,
        }
    }

    /// Attach a display code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Ordered group of indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub indicators: Vec<IndicatorDefinition>,
    /// Weight of the module in the overall response score; 1 unless configured.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl ModuleDefinition {
    /// Create a module from its indicators.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        indicators: Vec<IndicatorDefinition>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            indicators,
            weight: default_weight(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Input the engine refuses to analyse.
///
/// Expected absences (no expectations, an unconfigured year, a missing score)
/// are not errors. Everything here indicates bad upstream data and aborts
/// the operation that saw it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Score is outside `[0, 100]` or not a number.
    #[error("indicator {indicator_id}: score {score} is outside [0, 100]")]
    ScoreOutOfRange { indicator_id: String, score: f64 },

    /// Category tag is not one of the three known categories.
    #[error("indicator {indicator_id}: unknown category '{value}'")]
    UnknownCategory { indicator_id: String, value: String },

    /// Tolerance must be zero or positive.
    #[error("indicator {indicator_id}: tolerance {tolerance} is negative")]
    NegativeTolerance { indicator_id: String, tolerance: i64 },

    /// A configured expected level is not in `0..=4`.
    #[error("indicator {indicator_id}: expected level {level} for year {year} is outside 0..=4")]
    ExpectedLevelOutOfRange {
        indicator_id: String,
        year: u8,
        level: u8,
    },

    /// A level given directly is not in `0..=4`.
    #[error("indicator {indicator_id}: level {level} is outside 0..=4")]
    LevelOutOfRange { indicator_id: String, level: u8 },

    /// Transformation year is not in `1..=5`.
    #[error("transformation year {0} is outside 1..=5")]
    InvalidTransformationYear(i64),

    /// Area tag is not one of the seven known areas.
    #[error("unknown transformation area '{0}'")]
    UnknownArea(String),

    /// Indicator error raised while analysing a module.
    #[error("module {module_id}: {source}")]
    InModule {
        module_id: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Id of the offending indicator, looking through module wrappers.
    #[must_use]
    pub fn indicator_id(&self) -> Option<&str> {
        match self {
            ValidationError::ScoreOutOfRange { indicator_id, .. }
            | ValidationError::UnknownCategory { indicator_id, .. }
            | ValidationError::NegativeTolerance { indicator_id, .. }
            | ValidationError::ExpectedLevelOutOfRange { indicator_id, .. }
            | ValidationError::LevelOutOfRange { indicator_id, .. } => {
                Some(indicator_id)
            }
            ValidationError::InModule { source, .. } => source.indicator_id(),
            ValidationError::InvalidTransformationYear(_) | ValidationError::UnknownArea(_) => {
                None
            }
        }
    }

    /// Id of the enclosing module, when the error was raised inside one.
    #[must_use]
    pub fn module_id(&self) -> Option<&str> {
        match self {
            ValidationError::InModule { module_id, .. } => Some(module_id),
            _ => None,
        }
    }

    /// Wrap this error with the module it occurred in.
    #[must_use]
    pub fn in_module(self, module_id: impl Into<String>) -> Self {
        ValidationError::InModule {
            module_id: module_id.into(),
            source: Box::new(self),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
