//! School-wide rollup over a batch of assessment analyses.

use super::Mean;
use super::assessment::AssessmentGapAnalysis;
use super::module::GapStats;
use crate::primitives::DEFAULT_TOP_CRITICAL_LIMIT;
use crate::types::TransformationArea;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// OUTPUT RECORDS
// =============================================================================

/// Per-area slice of a school aggregate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaGapSummary {
    /// Number of analyses in this area.
    pub count: usize,
    pub stats: GapStats,
    /// Mean of the per-instance gap averages; `None` for an empty area.
    pub avg_gap: Option<f64>,
}

/// Whole-school totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallGapSummary {
    pub total_instances: usize,
    pub stats: GapStats,
    pub avg_gap: f64,
}

/// How many analyses flagged an indicator name as critical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalIndicatorCount {
    pub indicator_name: String,
    pub count: usize,
}

/// School-wide gap report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolGapAggregate {
    /// Every area, including those with no analyses.
    pub by_area: BTreeMap<TransformationArea, AreaGapSummary>,
    pub overall: OverallGapSummary,
    /// Most frequently critical indicators, most frequent first.
    pub top_critical_indicators: Vec<CriticalIndicatorCount>,
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Report shaping for the school aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolAggregateOptions {
    /// Length of the critical ranking; `None` keeps every entry.
    pub top_critical_limit: Option<usize>,
}

impl Default for SchoolAggregateOptions {
    fn default() -> Self {
        Self {
            top_critical_limit: Some(DEFAULT_TOP_CRITICAL_LIMIT),
        }
    }
}

impl SchoolAggregateOptions {
    /// Keep the full critical ranking.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            top_critical_limit: None,
        }
    }
}

// =============================================================================
// AGGREGATION
// =============================================================================

/// Aggregate with the default options (top 10 critical indicators).
#[must_use]
pub fn aggregate_school_gap_analysis(analyses: &[AssessmentGapAnalysis]) -> SchoolGapAggregate {
    aggregate_school_gap_analysis_with(analyses, &SchoolAggregateOptions::default())
}

/// Aggregate a batch of analyses.
///
/// Every entry of an analysis's critical list counts toward the ranking, as
/// listed, at most once per indicator name per analysis. Ties keep the order
/// in which names were first seen. Stats of reloaded analyses are summed
/// with saturation.
#[must_use]
pub fn aggregate_school_gap_analysis_with(
    analyses: &[AssessmentGapAnalysis],
    options: &SchoolAggregateOptions,
) -> SchoolGapAggregate {
    let mut area_stats: BTreeMap<TransformationArea, (AreaGapSummary, Mean)> =
        TransformationArea::ALL
            .into_iter()
            .map(|area| (area, Default::default()))
            .collect();
    let mut overall = OverallGapSummary {
        total_instances: analyses.len(),
        ..OverallGapSummary::default()
    };
    let mut overall_mean = Mean::default();
    let mut ranking = CriticalRanking::default();

    for analysis in analyses {
        let (summary, mean) = area_stats.entry(analysis.area).or_default();
        summary.count += 1;
        summary.stats.absorb(&analysis.overall_stats);
        mean.push(analysis.avg_gap);

        overall.stats.absorb(&analysis.overall_stats);
        overall_mean.push(analysis.avg_gap);

        ranking.record(analysis);
    }

    overall.avg_gap = overall_mean.get().unwrap_or(0.0);
    let by_area = area_stats
        .into_iter()
        .map(|(area, (mut summary, mean))| {
            summary.avg_gap = mean.get();
            (area, summary)
        })
        .collect();

    SchoolGapAggregate {
        by_area,
        overall,
        top_critical_indicators: ranking.into_top(options.top_critical_limit),
    }
}

/// Counts of critical indicator names, in first-seen order.
#[derive(Default)]
struct CriticalRanking {
    entries: Vec<CriticalIndicatorCount>,
    position: BTreeMap<String, usize>,
}

impl CriticalRanking {
    fn record(&mut self, analysis: &AssessmentGapAnalysis) {
        let mut seen = BTreeSet::new();
        let names = analysis
            .critical_indicators
            .iter()
            .map(|indicator| indicator.indicator_name.as_str());

        for name in names {
            if !seen.insert(name) {
                continue;
            }
            match self.position.get(name) {
                Some(&index) => self.entries[index].count += 1,
                None => {
                    self.position.insert(name.to_string(), self.entries.len());
                    self.entries.push(CriticalIndicatorCount {
                        indicator_name: name.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    fn into_top(mut self, limit: Option<usize>) -> Vec<CriticalIndicatorCount> {
        // stable sort: ties keep first-seen order
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        if let Some(limit) = limit {
            self.entries.truncate(limit);
        }
        self.entries
    }
}
