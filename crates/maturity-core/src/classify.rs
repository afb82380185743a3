//! # Gap Classifier
//!
//! Decides where an indicator stands relative to its expected level.
//!
//! Rules, first match wins:
//! 1. no expectation: `on_track`
//! 2. `actual >= expected`: `ahead`
//! 3. shortfall with tolerance 0: `critical`
//! 4. shortfall `<= tolerance`: `on_track`
//! 5. shortfall `== tolerance + 1`: `behind`
//! 6. otherwise: `critical`
//!
//! Rule 3 makes a zero-tolerance indicator jump straight from `ahead` to
//! `critical`. Reports downstream rely on that discontinuity.

use crate::types::{Category, GapClassification};

/// Classify an indicator. `category` is accepted for signature symmetry with
/// the level mapper and does not affect the verdict.
#[must_use]
pub fn classify_gap(
    actual_level: u8,
    expected_level: Option<u8>,
    tolerance: u32,
    _category: Category,
) -> GapClassification {
    let Some(expected) = expected_level else {
        return GapClassification::OnTrack;
    };

    if actual_level >= expected {
        return GapClassification::Ahead;
    }

    let shortfall = u32::from(expected - actual_level);
    if tolerance == 0 {
        GapClassification::Critical
    } else if shortfall <= tolerance {
        GapClassification::OnTrack
    } else if shortfall == tolerance.saturating_add(1) {
        GapClassification::Behind
    } else {
        GapClassification::Critical
    }
}
