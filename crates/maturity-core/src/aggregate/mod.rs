//! # Aggregation
//!
//! Rolls indicator gap records up three levels:
//!
//! | Level | Input | Output |
//! |-------|-------|--------|
//! | Module | indicator records | [`ModuleGapAnalysis`] |
//! | Assessment | module definitions + score map | [`AssessmentGapAnalysis`] |
//! | School | assessment analyses | [`SchoolGapAggregate`] |
//!
//! Every aggregator returns a fresh record and leaves its inputs untouched.

pub mod assessment;
pub mod module;
pub mod school;

pub use assessment::{AssessmentGapAnalysis, calculate_assessment_gap_analysis};
pub use module::{GapStats, ModuleGapAnalysis, calculate_module_gap_analysis};
pub use school::{
    AreaGapSummary, CriticalIndicatorCount, OverallGapSummary, SchoolAggregateOptions,
    SchoolGapAggregate, aggregate_school_gap_analysis, aggregate_school_gap_analysis_with,
};

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` when nothing was pushed.
    pub(crate) fn get(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mean_is_none() {
        assert_eq!(Mean::default().get(), None);
    }

    #[test]
    fn mean_of_values() {
        let mut mean = Mean::default();
        for value in [1.0, -1.0, -3.0] {
            mean.push(value);
        }
        assert_eq!(mean.get(), Some(-1.0));
    }
}
