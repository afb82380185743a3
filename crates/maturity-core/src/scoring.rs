//! # Response Scorer
//!
//! Converts raw questionnaire answers into the 0-100 scores the gap engine
//! consumes.
//!
//! | Category | Raw answer | Score |
//! |----------|------------|-------|
//! | cobertura | `bool` | `true` 100, otherwise 0 |
//! | frecuencia | number | linear in `[min, max]`, 2 decimals |
//! | profundidad | rubric level | `clamp(level, 0, 4) * 25` |
//!
//! A missing answer always scores 0.

use crate::expectation::get_expected_level_for_year;
use crate::maturity::{LevelThresholds, MaturityLevel, expected_level_by_year, score_to_level};
use crate::primitives::{DEPTH_LEVEL_WIDTH, MAX_LEVEL, MAX_SCORE, MIN_SCORE};
use crate::types::{
    Category, IndicatorDefinition, IndicatorScores, ModuleDefinition, TransformationYear,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Range a frequency answer is normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One answered indicator.
///
/// Snake-case aliases accept rows exported straight from the response store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorResponse {
    #[serde(alias = "indicator_id")]
    pub indicator_id: String,
    #[serde(default, alias = "coverage_value")]
    pub coverage_value: Option<bool>,
    #[serde(default, alias = "frequency_value")]
    pub frequency_value: Option<f64>,
    #[serde(default, alias = "profundity_level")]
    pub profundity_level: Option<i32>,
}

// =============================================================================
// PER-CATEGORY SCORERS
// =============================================================================

/// Coverage answer to score.
#[must_use]
pub fn score_coverage(value: Option<bool>) -> f64 {
    if value == Some(true) { MAX_SCORE } else { MIN_SCORE }
}

/// Frequency answer to score, linear over the configured range.
///
/// Defaults to `[0, 100]`. An empty or inverted range scores 0.
#[must_use]
pub fn score_frequency(value: Option<f64>, config: Option<&FrequencyConfig>) -> f64 {
    let Some(value) = value else {
        return MIN_SCORE;
    };
    let min = config.and_then(|c| c.min).unwrap_or(MIN_SCORE);
    let max = config.and_then(|c| c.max).unwrap_or(MAX_SCORE);
    if max <= min || value.is_nan() {
        return MIN_SCORE;
    }
    let clamped = value.clamp(min, max);
    round2((clamped - min) / (max - min) * MAX_SCORE)
}

/// Depth rubric level to score.
#[must_use]
pub fn score_depth(level: Option<i32>) -> f64 {
    level.map_or(MIN_SCORE, |level| {
        f64::from(level.clamp(0, i32::from(MAX_LEVEL))) * DEPTH_LEVEL_WIDTH
    })
}

/// Score a response according to its indicator's category.
#[must_use]
pub fn score_response(
    response: &IndicatorResponse,
    category: Category,
    frequency_config: Option<&FrequencyConfig>,
) -> f64 {
    match category {
        Category::Cobertura => score_coverage(response.coverage_value),
        Category::Frecuencia => score_frequency(response.frequency_value, frequency_config),
        Category::Profundidad => score_depth(response.profundity_level),
    }
}

/// Build the score map for every template indicator that has a response.
///
/// Indicators without a response stay out of the map. Responses for unknown
/// indicators are ignored. When an indicator is answered twice the last
/// answer wins.
#[must_use]
pub fn indicator_scores_from_responses(
    modules: &[ModuleDefinition],
    responses: &[IndicatorResponse],
) -> IndicatorScores {
    let by_id: BTreeMap<&str, &IndicatorResponse> = responses
        .iter()
        .map(|response| (response.indicator_id.as_str(), response))
        .collect();

    modules
        .iter()
        .flat_map(|module| module.indicators.iter())
        .filter_map(|indicator| {
            by_id.get(indicator.id.as_str()).map(|response| {
                let score = score_response(
                    response,
                    indicator.category,
                    indicator.frequency_config.as_ref(),
                );
                (indicator.id.clone(), score)
            })
        })
        .collect()
}

/// Weighted mean of `(score, weight)` pairs, rounded to 2 decimals.
///
/// Returns 0 for empty input or a zero total weight.
#[must_use]
pub fn weighted_average(items: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = items.iter().map(|(_, weight)| weight).sum();
    if items.is_empty() || total_weight == 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = items.iter().map(|(score, weight)| score * weight).sum();
    round2(weighted_sum / total_weight)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// SCORE SUMMARY
// =============================================================================

/// Answer as given, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Flag(bool),
    Number(f64),
}

impl RawAnswer {
    /// The answer field relevant to `category`, if present.
    #[must_use]
    pub fn of(response: &IndicatorResponse, category: Category) -> Option<Self> {
        match category {
            Category::Cobertura => response.coverage_value.map(RawAnswer::Flag),
            Category::Frecuencia => response.frequency_value.map(RawAnswer::Number),
            Category::Profundidad => response
                .profundity_level
                .map(|level| RawAnswer::Number(f64::from(level))),
        }
    }
}

/// Score breakdown of one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorScore {
    pub indicator_id: String,
    pub indicator_name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<RawAnswer>,
    pub normalized_score: f64,
    pub weight: f64,
    /// Indicator's own expected level for the summary year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_level: Option<u8>,
    /// Score reaches the expected level's share of 100; true when unconfigured.
    pub is_above_expectation: bool,
}

/// Weighted score of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleScore {
    pub module_id: String,
    pub module_name: String,
    pub score: f64,
    pub weight: f64,
    pub indicators: Vec<IndicatorScore>,
}

/// Response-based summary of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub transformation_year: TransformationYear,
    /// Per-indicator scores, unanswered indicators omitted.
    pub scores: IndicatorScores,
    pub modules: Vec<ModuleScore>,
    /// Module-weighted overall score.
    pub total_score: f64,
    pub overall_level: MaturityLevel,
    /// Overall level expected for the transformation year.
    pub expected_level: MaturityLevel,
    pub meets_expectations: bool,
}

fn score_indicator(
    indicator: &IndicatorDefinition,
    response: Option<&IndicatorResponse>,
    year: TransformationYear,
) -> IndicatorScore {
    let normalized_score = response.map_or(MIN_SCORE, |response| {
        score_response(response, indicator.category, indicator.frequency_config.as_ref())
    });
    let expected_level = get_expected_level_for_year(indicator.expectations.as_ref(), year);

    IndicatorScore {
        indicator_id: indicator.id.clone(),
        indicator_name: indicator.name.clone(),
        category: indicator.category,
        raw_value: response.and_then(|response| RawAnswer::of(response, indicator.category)),
        normalized_score,
        weight: indicator.weight,
        expected_level,
        is_above_expectation: expected_level
            .is_none_or(|level| normalized_score >= f64::from(level) * DEPTH_LEVEL_WIDTH),
    }
}

/// Score every module for `year` and band the overall score into a maturity
/// level.
///
/// Unanswered indicators count as 0 inside their module average.
#[must_use]
pub fn summarize_scores(
    modules: &[ModuleDefinition],
    responses: &[IndicatorResponse],
    year: TransformationYear,
    thresholds: &LevelThresholds,
) -> ScoreSummary {
    let by_id: BTreeMap<&str, &IndicatorResponse> = responses
        .iter()
        .map(|response| (response.indicator_id.as_str(), response))
        .collect();

    let module_scores: Vec<ModuleScore> = modules
        .iter()
        .map(|module| {
            let indicators: Vec<IndicatorScore> = module
                .indicators
                .iter()
                .map(|indicator| {
                    score_indicator(indicator, by_id.get(indicator.id.as_str()).copied(), year)
                })
                .collect();
            let items: Vec<(f64, f64)> =
                indicators.iter().map(|i| (i.normalized_score, i.weight)).collect();
            ModuleScore {
                module_id: module.id.clone(),
                module_name: module.name.clone(),
                score: weighted_average(&items),
                weight: module.weight,
                indicators,
            }
        })
        .collect();

    let totals: Vec<(f64, f64)> = module_scores.iter().map(|m| (m.score, m.weight)).collect();
    let total_score = weighted_average(&totals);
    let overall_level = MaturityLevel::from_level(score_to_level(total_score, thresholds))
        .unwrap_or(MaturityLevel::PorComenzar);
    let expected_level = expected_level_by_year(year);

    ScoreSummary {
        transformation_year: year,
        scores: indicator_scores_from_responses(modules, responses),
        modules: module_scores,
        total_score,
        overall_level,
        expected_level,
        meets_expectations: overall_level >= expected_level,
    }
}
