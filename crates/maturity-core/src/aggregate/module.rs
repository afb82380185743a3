//! Module-level rollup: counts per verdict and the mean gap.

use super::Mean;
use crate::indicator::IndicatorGapAnalysis;
use crate::types::GapClassification;
use serde::{Deserialize, Serialize};

// =============================================================================
// GAP STATS
// =============================================================================

/// Indicator counts per verdict.
///
/// `total` equals the sum of the five buckets for stats built here. Stats
/// reloaded from elsewhere may not hold that; arithmetic on them saturates.
/// An indicator without an expected level lands in `not_configured` even
/// though its classification is `on_track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapStats {
    pub total: usize,
    pub ahead: usize,
    pub on_track: usize,
    pub behind: usize,
    pub critical: usize,
    pub not_configured: usize,
}

impl GapStats {
    /// Count one indicator.
    pub fn record(&mut self, indicator: &IndicatorGapAnalysis) {
        self.total = self.total.saturating_add(1);
        let bucket = if !indicator.is_configured() {
            &mut self.not_configured
        } else {
            match indicator.classification {
                GapClassification::Ahead => &mut self.ahead,
                GapClassification::OnTrack => &mut self.on_track,
                GapClassification::Behind => &mut self.behind,
                GapClassification::Critical => &mut self.critical,
            }
        };
        *bucket = bucket.saturating_add(1);
    }

    /// Field-wise add `other` into `self`.
    pub fn absorb(&mut self, other: &GapStats) {
        self.total = self.total.saturating_add(other.total);
        self.ahead = self.ahead.saturating_add(other.ahead);
        self.on_track = self.on_track.saturating_add(other.on_track);
        self.behind = self.behind.saturating_add(other.behind);
        self.critical = self.critical.saturating_add(other.critical);
        self.not_configured = self.not_configured.saturating_add(other.not_configured);
    }

    /// Indicators that had an expected level.
    #[must_use]
    pub fn configured(&self) -> usize {
        self.total.saturating_sub(self.not_configured)
    }

    /// Check `total` against the bucket sum.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        [self.ahead, self.on_track, self.behind, self.critical, self.not_configured]
            .into_iter()
            .try_fold(0_usize, usize::checked_add)
            == Some(self.total)
    }
}

// =============================================================================
// MODULE GAP ANALYSIS
// =============================================================================

/// Rollup of one module's indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleGapAnalysis {
    pub module_id: String,
    pub module_name: String,
    pub indicators: Vec<IndicatorGapAnalysis>,
    pub stats: GapStats,
    /// Mean of the non-null gaps; 0 when no indicator is configured.
    pub avg_gap: f64,
}

/// Aggregate a module's indicator records, keeping their order.
#[must_use]
pub fn calculate_module_gap_analysis(
    module_id: &str,
    module_name: &str,
    indicators: Vec<IndicatorGapAnalysis>,
) -> ModuleGapAnalysis {
    let mut stats = GapStats::default();
    let mut mean = Mean::default();

    for indicator in &indicators {
        stats.record(indicator);
        if let Some(gap) = indicator.gap {
            mean.push(f64::from(gap));
        }
    }

    ModuleGapAnalysis {
        module_id: module_id.to_string(),
        module_name: module_name.to_string(),
        indicators,
        stats,
        avg_gap: mean.get().unwrap_or(0.0),
    }
}
