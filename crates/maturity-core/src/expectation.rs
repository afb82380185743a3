//! # Expectation Resolver
//!
//! Looks up the expected level for the assessment's transformation year.
//! There is no interpolation between configured years.

use crate::primitives::MAX_LEVEL;
use crate::types::{TransformationYear, ValidationError, YearExpectation};

/// Expected level for `year`, or `None` when expectations are absent or the
/// year is not configured.
#[must_use]
pub fn get_expected_level_for_year(
    expectations: Option<&YearExpectation>,
    year: TransformationYear,
) -> Option<u8> {
    expectations.and_then(|exp| exp.expected_for(year))
}

/// Check tolerance sign and every configured level, returning the tolerance
/// as an unsigned value.
pub fn validate_expectations(
    indicator_id: &str,
    expectations: &YearExpectation,
) -> Result<u32, ValidationError> {
    let tolerance =
        u32::try_from(expectations.tolerance).map_err(|_| ValidationError::NegativeTolerance {
            indicator_id: indicator_id.to_string(),
            tolerance: i64::from(expectations.tolerance),
        })?;

    for (year, expected) in expectations.levels() {
        if let Some(level) = expected.filter(|level| *level > MAX_LEVEL) {
            return Err(ValidationError::ExpectedLevelOutOfRange {
                indicator_id: indicator_id.to_string(),
                year: year.get(),
                level,
            });
        }
    }

    Ok(tolerance)
}
