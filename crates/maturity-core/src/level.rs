//! # Level Mapper
//!
//! Maps a normalized 0-100 score to the ordinal level used for comparison.
//!
//! | Category | Levels | Rule |
//! |----------|--------|------|
//! | profundidad | 0-4 | `floor(score / 25)`, 100 maps to 4 |
//! | cobertura | 0-1 | 1 iff `score >= 50` |
//! | frecuencia | 0-1 | 1 iff `score >= 50` |
//!
//! The mapper itself is total. Range checking happens in [`validate_score`],
//! which the indicator composer runs first.

use crate::primitives::{BINARY_THRESHOLD, DEPTH_LEVEL_WIDTH, MAX_LEVEL, MAX_SCORE, MIN_SCORE};
use crate::types::{Category, ValidationError};

/// Ordinal level reached by `score` for an indicator of `category`.
#[must_use]
pub fn score_to_actual_level(score: f64, category: Category) -> u8 {
    match category {
        Category::Profundidad => {
            let level = (score / DEPTH_LEVEL_WIDTH).floor();
            level.clamp(0.0, f64::from(MAX_LEVEL)) as u8
        }
        Category::Cobertura | Category::Frecuencia => u8::from(score >= BINARY_THRESHOLD),
    }
}

/// Reject scores outside `[0, 100]`, including NaN.
pub fn validate_score(indicator_id: &str, score: f64) -> Result<(), ValidationError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(ValidationError::ScoreOutOfRange {
            indicator_id: indicator_id.to_string(),
            score,
        })
    }
}

/// Reject a level above [`MAX_LEVEL`].
pub fn validate_level(indicator_id: &str, level: u8) -> Result<(), ValidationError> {
    if level <= MAX_LEVEL {
        Ok(())
    } else {
        Err(ValidationError::LevelOutOfRange {
            indicator_id: indicator_id.to_string(),
            level,
        })
    }
}
