//! # API Endpoint Handlers
//!
//! Every handler validates its request, runs the engine synchronously and
//! wraps the result in an [`ApiResponse`]. Validation failures are 400.

use super::{
    AppState,
    types::{
        ApiResponse, AssessmentGapRequest, HealthResponse, IndicatorGapRequest, SchoolGapRequest,
        ScoreRequest, to_module_definitions,
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use maturity_core::{
    AssessmentGapAnalysis, IndicatorGapAnalysis, IndicatorScores, SchoolGapAggregate,
    ScoreSummary, TransformationYear, ValidationError, aggregate_school_gap_analysis_with,
    calculate_assessment_gap_analysis, indicator_scores_from_responses, summarize_scores,
};

/// Log and wrap a rejected request.
fn rejected<T>(event: &str, err: &ValidationError) -> (StatusCode, Json<ApiResponse<T>>) {
    tracing::warn!(
        event,
        indicator_id = err.indicator_id().unwrap_or("-"),
        "Rejected input: {}",
        err
    );
    (StatusCode::BAD_REQUEST, Json(ApiResponse::invalid(err)))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// INDICATOR GAP HANDLER
// =============================================================================

/// Gap analysis of a single indicator.
pub async fn indicator_gap_handler(
    Json(request): Json<IndicatorGapRequest>,
) -> (StatusCode, Json<ApiResponse<IndicatorGapAnalysis>>) {
    let result = TransformationYear::new(request.transformation_year).and_then(|year| {
        let definition = request.indicator.to_definition()?;
        IndicatorGapAnalysis::for_definition(&definition, request.score, year)
    });

    match result {
        Ok(analysis) => {
            tracing::debug!(
                event = "gap.indicator",
                indicator_id = %analysis.indicator_id,
                classification = %analysis.classification,
                "Indicator analysed"
            );
            (StatusCode::OK, Json(ApiResponse::success(analysis)))
        }
        Err(e) => rejected("gap.indicator", &e),
    }
}

// =============================================================================
// ASSESSMENT GAP HANDLER
// =============================================================================

/// Gap analysis of a whole assessment instance.
pub async fn assessment_gap_handler(
    Json(request): Json<AssessmentGapRequest>,
) -> (StatusCode, Json<ApiResponse<AssessmentGapAnalysis>>) {
    match analyse_assessment(&request) {
        Ok(analysis) => {
            tracing::info!(
                event = "gap.assessment",
                instance_id = %analysis.instance_id,
                area = %analysis.area,
                indicators = analysis.overall_stats.total,
                critical = analysis.overall_stats.critical,
                behind = analysis.overall_stats.behind,
                "Assessment analysed"
            );
            (StatusCode::OK, Json(ApiResponse::success(analysis)))
        }
        Err(e) => rejected("gap.assessment", &e),
    }
}

/// Validate an assessment request and run the engine on it.
///
/// Response-derived scores are merged under the explicit score map.
pub fn analyse_assessment(
    request: &AssessmentGapRequest,
) -> Result<AssessmentGapAnalysis, ValidationError> {
    let (year, area) = request.to_context()?;
    let modules = to_module_definitions(&request.modules)?;

    let mut scores: IndicatorScores = indicator_scores_from_responses(&modules, &request.responses);
    scores.extend(request.scores.iter().map(|(id, score)| (id.clone(), *score)));

    calculate_assessment_gap_analysis(&request.instance_id, year, area, &modules, &scores)
}

// =============================================================================
// SCHOOL GAP HANDLER
// =============================================================================

/// School-wide aggregate over a batch of analyses.
pub async fn school_gap_handler(
    State(state): State<AppState>,
    Json(request): Json<SchoolGapRequest>,
) -> (StatusCode, Json<ApiResponse<SchoolGapAggregate>>) {
    for analysis in request.analyses.iter().filter(|a| !a.overall_stats.is_consistent()) {
        tracing::warn!(
            event = "gap.school",
            instance_id = %analysis.instance_id,
            "Analysis stats do not add up; totals may be skewed"
        );
    }

    let options = state.config.report.school_options();
    let aggregate = aggregate_school_gap_analysis_with(&request.analyses, &options);

    tracing::info!(
        event = "gap.school",
        instances = aggregate.overall.total_instances,
        top_critical = aggregate.top_critical_indicators.len(),
        "School aggregated"
    );

    (StatusCode::OK, Json(ApiResponse::success(aggregate)))
}

// =============================================================================
// SCORE HANDLER
// =============================================================================

/// Score raw responses into per-indicator and per-module scores.
pub async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> (StatusCode, Json<ApiResponse<ScoreSummary>>) {
    let (year, modules) = match request.to_context() {
        Ok(context) => context,
        Err(e) => return rejected("score", &e),
    };

    let summary = summarize_scores(
        &modules,
        &request.responses,
        year,
        &state.config.report.level_thresholds,
    );

    tracing::debug!(
        event = "score",
        answered = summary.scores.len(),
        total_score = summary.total_score,
        meets_expectations = summary.meets_expectations,
        "Responses scored"
    );

    (StatusCode::OK, Json(ApiResponse::success(summary)))
}
