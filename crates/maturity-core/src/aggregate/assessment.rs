//! Assessment-level rollup over every module of one instance.

use super::Mean;
use super::module::{GapStats, ModuleGapAnalysis, calculate_module_gap_analysis};
use crate::indicator::IndicatorGapAnalysis;
use crate::types::{
    GapClassification, IndicatorScores, ModuleDefinition, TransformationArea, TransformationYear,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// Gap analysis of one assessment instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentGapAnalysis {
    pub instance_id: String,
    pub transformation_year: TransformationYear,
    pub area: TransformationArea,
    pub modules: Vec<ModuleGapAnalysis>,
    pub overall_stats: GapStats,
    /// Mean over every non-null indicator gap, so larger modules weigh more.
    pub avg_gap: f64,
    pub critical_indicators: Vec<IndicatorGapAnalysis>,
    pub behind_indicators: Vec<IndicatorGapAnalysis>,
}

impl AssessmentGapAnalysis {
    /// All indicator records in module order.
    pub fn indicators(&self) -> impl Iterator<Item = &IndicatorGapAnalysis> {
        self.modules.iter().flat_map(|module| module.indicators.iter())
    }
}

/// Analyse every indicator of every module against `indicator_scores`.
///
/// Indicators missing from the score map score 0. The first invalid
/// indicator aborts the analysis; the error names the indicator and its module.
pub fn calculate_assessment_gap_analysis(
    instance_id: &str,
    transformation_year: TransformationYear,
    area: TransformationArea,
    modules: &[ModuleDefinition],
    indicator_scores: &IndicatorScores,
) -> Result<AssessmentGapAnalysis, ValidationError> {
    let mut analysed = Vec::with_capacity(modules.len());
    let mut overall_stats = GapStats::default();
    let mut mean = Mean::default();

    for module in modules {
        let indicators = module
            .indicators
            .iter()
            .map(|definition| {
                let score = indicator_scores.get(&definition.id).copied().unwrap_or(0.0);
                IndicatorGapAnalysis::for_definition(definition, score, transformation_year)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.in_module(&module.id))?;

        for gap in indicators.iter().filter_map(|indicator| indicator.gap) {
            mean.push(f64::from(gap));
        }

        let module_analysis = calculate_module_gap_analysis(&module.id, &module.name, indicators);
        overall_stats.absorb(&module_analysis.stats);
        analysed.push(module_analysis);
    }

    let pick = |wanted: GapClassification| -> Vec<IndicatorGapAnalysis> {
        analysed
            .iter()
            .flat_map(|module| module.indicators.iter())
            .filter(|indicator| indicator.classification == wanted)
            .cloned()
            .collect()
    };
    let critical_indicators = pick(GapClassification::Critical);
    let behind_indicators = pick(GapClassification::Behind);

    Ok(AssessmentGapAnalysis {
        instance_id: instance_id.to_string(),
        transformation_year,
        area,
        modules: analysed,
        overall_stats,
        avg_gap: mean.get().unwrap_or(0.0),
        critical_indicators,
        behind_indicators,
    })
}
