//! # Indicator Gap Composer
//!
//! Validates one indicator's inputs and assembles its gap record from the
//! level mapper, the expectation resolver and the classifier.

use crate::classify::classify_gap;
use crate::expectation::{get_expected_level_for_year, validate_expectations};
use crate::level::{score_to_actual_level, validate_score};
use crate::types::{
    Category, GapClassification, IndicatorDefinition, TransformationYear, ValidationError,
    YearExpectation,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// INDICATOR GAP ANALYSIS
// =============================================================================

/// Gap record for one indicator.
///
/// `gap` and `expected_level` are either both present or both absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorGapAnalysis {
    pub indicator_id: String,
    pub indicator_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator_code: Option<String>,
    pub category: Category,
    pub actual_level: u8,
    pub expected_level: Option<u8>,
    /// `actual_level - expected_level`; negative means a shortfall.
    pub gap: Option<i32>,
    pub tolerance: u32,
    pub classification: GapClassification,
    /// The raw score the level was derived from.
    pub score: f64,
}

impl IndicatorGapAnalysis {
    /// Compose the record for a template indicator.
    pub fn for_definition(
        definition: &IndicatorDefinition,
        score: f64,
        year: TransformationYear,
    ) -> Result<Self, ValidationError> {
        calculate_indicator_gap(
            &definition.id,
            &definition.name,
            definition.code.as_deref(),
            definition.category,
            score,
            definition.expectations.as_ref(),
            year,
        )
    }

    /// True when an expected level exists for the analysed year.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.expected_level.is_some()
    }
}

// =============================================================================
// COMPOSER
// =============================================================================

/// Compute the gap record for one indicator.
///
/// Fails on a score outside `[0, 100]`, a negative tolerance or an expected
/// level above 4. Absent expectations are not an error: the indicator is
/// reported `on_track` with no expected level and tolerance 0.
pub fn calculate_indicator_gap(
    indicator_id: &str,
    indicator_name: &str,
    indicator_code: Option<&str>,
    category: Category,
    score: f64,
    expectations: Option<&YearExpectation>,
    year: TransformationYear,
) -> Result<IndicatorGapAnalysis, ValidationError> {
    validate_score(indicator_id, score)?;
    let tolerance = match expectations {
        Some(exp) => validate_expectations(indicator_id, exp)?,
        None => 0,
    };

    let actual_level = score_to_actual_level(score, category);
    let expected_level = get_expected_level_for_year(expectations, year);
    let gap = expected_level.map(|expected| i32::from(actual_level) - i32::from(expected));
    let classification = classify_gap(actual_level, expected_level, tolerance, category);

    Ok(IndicatorGapAnalysis {
        indicator_id: indicator_id.to_string(),
        indicator_name: indicator_name.to_string(),
        indicator_code: indicator_code.map(str::to_string),
        category,
        actual_level,
        expected_level,
        gap,
        tolerance,
        classification,
        score,
    })
}
