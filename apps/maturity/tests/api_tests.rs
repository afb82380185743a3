//! Integration tests for the Maturity HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use maturity::AppConfig;
use maturity::api::{ApiResponse, AppState, HealthResponse, create_router};
use maturity_core::{
    AssessmentGapAnalysis, GapClassification, GapStats, IndicatorGapAnalysis, MaturityLevel,
    RawAnswer, SchoolGapAggregate, ScoreSummary, TransformationArea,
};
use serde_json::{Value, json};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a test server with rate limiting disabled.
fn create_test_server() -> TestServer {
    let mut config = AppConfig::default();
    config.server.rate_limit = 0;
    create_server_with(config)
}

fn create_server_with(config: AppConfig) -> TestServer {
    let router = create_router(AppState::new(config));
    TestServer::new(router).unwrap()
}

/// Two-module template: a depth ladder, an unconfigured coverage indicator,
/// and a zero-tolerance depth indicator.
fn template() -> Value {
    json!([
        {
            "id": "planificacion",
            "name": "Planificación",
            "indicators": [
                {
                    "id": "p1",
                    "name": "Planificación diferenciada",
                    "code": "P1",
                    "category": "profundidad",
                    "expectations": {
                        "year_1_expected": 1,
                        "year_2_expected": 2,
                        "year_3_expected": 3,
                        "year_4_expected": 3,
                        "year_5_expected": 4,
                        "tolerance": 1
                    }
                },
                { "id": "p2", "name": "Plan anual", "category": "cobertura" }
            ]
        },
        {
            "id": "aula",
            "name": "Trabajo en aula",
            "indicators": [
                {
                    "id": "a1",
                    "name": "Tutorías",
                    "category": "profundidad",
                    "expectations": { "year_3_expected": 4, "tolerance": 0 }
                }
            ]
        }
    ])
}

fn assessment_request(instance_id: &str, area: &str, scores: Value) -> Value {
    json!({
        "instanceId": instance_id,
        "transformationYear": 3,
        "area": area,
        "modules": template(),
        "scores": scores
    })
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// INDICATOR ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_indicator_gap_behind() {
    let server = create_test_server();

    let response = server
        .post("/gap/indicator")
        .json(&json!({
            "indicator": template()[0]["indicators"][0],
            "score": 25.0,
            "transformationYear": 3
        }))
        .await;

    response.assert_status_ok();
    let body: ApiResponse<IndicatorGapAnalysis> = response.json();
    assert!(body.success);
    let analysis = body.data.unwrap();
    assert_eq!(analysis.actual_level, 1);
    assert_eq!(analysis.expected_level, Some(3));
    assert_eq!(analysis.gap, Some(-2));
    assert_eq!(analysis.classification, GapClassification::Behind);
    assert_eq!(analysis.indicator_code.as_deref(), Some("P1"));
}

#[tokio::test]
async fn test_indicator_unknown_category_rejected() {
    let server = create_test_server();

    let response = server
        .post("/gap/indicator")
        .json(&json!({
            "indicator": { "id": "x9", "name": "X", "category": "amplitud" },
            "score": 50.0,
            "transformationYear": 1
        }))
        .await;

    response.assert_status_bad_request();
    let body: ApiResponse<IndicatorGapAnalysis> = response.json();
    assert!(!body.success);
    assert!(body.data.is_none());
    let error = body.error.unwrap();
    assert_eq!(error.indicator_id.as_deref(), Some("x9"));
    assert!(error.message.contains("amplitud"));
}

#[tokio::test]
async fn test_indicator_invalid_year_rejected() {
    let server = create_test_server();

    let response = server
        .post("/gap/indicator")
        .json(&json!({
            "indicator": { "id": "c", "name": "C", "category": "cobertura" },
            "score": 50.0,
            "transformationYear": 6
        }))
        .await;

    response.assert_status_bad_request();
}

// =============================================================================
// ASSESSMENT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_assessment_gap_analysis() {
    let server = create_test_server();

    let response = server
        .post("/gap/assessment")
        .json(&assessment_request(
            "inst-1",
            "personalizacion",
            json!({ "p1": 25.0, "p2": 100.0 }),
        ))
        .await;

    response.assert_status_ok();
    let analysis = response.json::<ApiResponse<AssessmentGapAnalysis>>().data.unwrap();
    assert_eq!(analysis.instance_id, "inst-1");
    assert_eq!(analysis.area, TransformationArea::Personalizacion);
    assert_eq!(analysis.overall_stats.total, 3);
    assert_eq!(analysis.overall_stats.behind, 1);
    assert_eq!(analysis.overall_stats.critical, 1);
    assert_eq!(analysis.overall_stats.not_configured, 1);
    assert_eq!(analysis.avg_gap, -3.0);
    assert_eq!(analysis.critical_indicators[0].indicator_id, "a1");
}

#[tokio::test]
async fn test_assessment_wire_format_is_camel_case() {
    let server = create_test_server();

    let response = server
        .post("/gap/assessment")
        .json(&assessment_request("inst-2", "aprendizaje", json!({})))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());
    let data = &body["data"];
    assert_eq!(data["transformationYear"], 3);
    assert_eq!(data["overallStats"]["notConfigured"], 1);
    assert_eq!(data["modules"][0]["indicators"][0]["indicatorId"], "p1");
}

#[tokio::test]
async fn test_assessment_responses_merge_under_scores() {
    let server = create_test_server();

    let mut request = assessment_request("inst-3", "evaluacion", json!({ "a1": 100.0 }));
    request["responses"] = json!([
        { "indicatorId": "p1", "profundityLevel": 3 },
        { "indicator_id": "a1", "profundity_level": 0 }
    ]);

    let response = server.post("/gap/assessment").json(&request).await;

    response.assert_status_ok();
    let analysis = response.json::<ApiResponse<AssessmentGapAnalysis>>().data.unwrap();
    let scores: Vec<f64> = analysis.indicators().map(|i| i.score).collect();
    // p1 from its response, p2 unanswered, a1 from the explicit score
    assert_eq!(scores, [75.0, 0.0, 100.0]);
    assert!(analysis.critical_indicators.is_empty());
}

#[tokio::test]
async fn test_assessment_score_out_of_range_names_indicator() {
    let server = create_test_server();

    let response = server
        .post("/gap/assessment")
        .json(&assessment_request("inst", "personalizacion", json!({ "a1": 140.0 })))
        .await;

    response.assert_status_bad_request();
    let body: ApiResponse<AssessmentGapAnalysis> = response.json();
    let error = body.error.unwrap();
    assert_eq!(error.indicator_id.as_deref(), Some("a1"));
    assert!(error.message.contains("aula"));
}

#[tokio::test]
async fn test_assessment_unknown_area_rejected() {
    let server = create_test_server();

    let response = server
        .post("/gap/assessment")
        .json(&assessment_request("inst", "deportes", json!({})))
        .await;

    response.assert_status_bad_request();
    let body: ApiResponse<AssessmentGapAnalysis> = response.json();
    assert!(body.error.unwrap().indicator_id.is_none());
}

#[tokio::test]
async fn test_assessment_negative_tolerance_rejected() {
    let server = create_test_server();

    let mut request = assessment_request("inst", "aprendizaje", json!({}));
    request["modules"][1]["indicators"][0]["expectations"]["tolerance"] = json!(-1);

    let response = server.post("/gap/assessment").json(&request).await;

    response.assert_status_bad_request();
}

// =============================================================================
// SCHOOL ENDPOINT TESTS
// =============================================================================

async fn analyse(
    server: &TestServer,
    id: &str,
    area: &str,
    scores: Value,
) -> AssessmentGapAnalysis {
    server
        .post("/gap/assessment")
        .json(&assessment_request(id, area, scores))
        .await
        .json::<ApiResponse<AssessmentGapAnalysis>>()
        .data
        .unwrap()
}

#[tokio::test]
async fn test_school_aggregate() {
    let server = create_test_server();

    let analyses = vec![
        analyse(&server, "i1", "personalizacion", json!({ "p1": 75.0 })).await,
        analyse(&server, "i2", "personalizacion", json!({ "p1": 50.0, "a1": 100.0 })).await,
        analyse(&server, "i3", "aprendizaje", json!({})).await,
    ];

    let response = server
        .post("/gap/school")
        .json(&json!({ "analyses": analyses }))
        .await;

    response.assert_status_ok();
    let school = response.json::<ApiResponse<SchoolGapAggregate>>().data.unwrap();
    assert_eq!(school.overall.total_instances, 3);
    assert_eq!(school.by_area.len(), 7);
    assert_eq!(school.by_area[&TransformationArea::Personalizacion].count, 2);
    assert_eq!(school.by_area[&TransformationArea::Liderazgo].count, 0);
    assert!(school.by_area[&TransformationArea::Liderazgo].avg_gap.is_none());

    // i2 has no critical indicator; p1 is critical only in i3
    let top: Vec<_> = school
        .top_critical_indicators
        .iter()
        .map(|c| (c.indicator_name.as_str(), c.count))
        .collect();
    assert_eq!(top, [("Tutorías", 2), ("Planificación diferenciada", 1)]);
}

#[tokio::test]
async fn test_school_aggregate_respects_configured_limit() {
    let mut config = AppConfig::default();
    config.server.rate_limit = 0;
    config.report.top_critical_limit = 1;
    let server = create_server_with(config);

    let analyses = vec![analyse(&server, "i1", "evaluacion", json!({})).await];

    let response = server
        .post("/gap/school")
        .json(&json!({ "analyses": analyses }))
        .await;

    let school = response.json::<ApiResponse<SchoolGapAggregate>>().data.unwrap();
    assert_eq!(school.top_critical_indicators.len(), 1);
}

#[tokio::test]
async fn test_school_aggregate_saturates_reloaded_stats() {
    let server = create_test_server();

    let mut stored = analyse(&server, "i1", "evaluacion", json!({})).await;
    stored.overall_stats = GapStats {
        total: usize::MAX,
        critical: usize::MAX,
        ..GapStats::default()
    };

    let response = server
        .post("/gap/school")
        .json(&json!({ "analyses": [stored.clone(), stored] }))
        .await;

    response.assert_status_ok();
    let school = response.json::<ApiResponse<SchoolGapAggregate>>().data.unwrap();
    assert_eq!(school.overall.stats.total, usize::MAX);
    assert_eq!(school.overall.total_instances, 2);
}

#[tokio::test]
async fn test_school_aggregate_empty_batch() {
    let server = create_test_server();

    let response = server.post("/gap/school").json(&json!({ "analyses": [] })).await;

    response.assert_status_ok();
    let school = response.json::<ApiResponse<SchoolGapAggregate>>().data.unwrap();
    assert_eq!(school.overall.total_instances, 0);
    assert_eq!(school.overall.avg_gap, 0.0);
}

// =============================================================================
// SCORE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_score_responses() {
    let server = create_test_server();

    let response = server
        .post("/score")
        .json(&json!({
            "transformationYear": 3,
            "modules": template(),
            "responses": [
                { "indicatorId": "p1", "profundityLevel": 4 },
                { "indicatorId": "p2", "coverageValue": true },
                { "indicatorId": "a1", "profundityLevel": 1 }
            ]
        }))
        .await;

    response.assert_status_ok();
    let summary = response.json::<ApiResponse<ScoreSummary>>().data.unwrap();
    assert_eq!(summary.scores["p1"], 100.0);
    assert_eq!(summary.scores["a1"], 25.0);
    assert_eq!(summary.modules[0].score, 100.0);
    assert_eq!(summary.modules[1].score, 25.0);
    assert_eq!(summary.total_score, 62.5);
    assert_eq!(summary.overall_level, MaturityLevel::Avanzado);
    assert_eq!(summary.expected_level, MaturityLevel::EnDesarrollo);
    assert!(summary.meets_expectations);

    let breakdown: Vec<_> = summary
        .modules
        .iter()
        .flat_map(|m| &m.indicators)
        .map(|i| (i.indicator_id.as_str(), i.expected_level, i.is_above_expectation))
        .collect();
    assert_eq!(
        breakdown,
        [("p1", Some(3), true), ("p2", None, true), ("a1", Some(4), false)]
    );
    assert_eq!(summary.modules[0].indicators[1].raw_value, Some(RawAnswer::Flag(true)));
}

#[tokio::test]
async fn test_score_invalid_year_rejected() {
    let server = create_test_server();

    let response = server
        .post("/score")
        .json(&json!({ "transformationYear": 0, "modules": template() }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_score_unknown_category_rejected() {
    let server = create_test_server();

    let response = server
        .post("/score")
        .json(&json!({
            "transformationYear": 1,
            "modules": [{ "id": "m", "name": "M", "indicators": [
                { "id": "z", "name": "Z", "category": "otra" }
            ]}]
        }))
        .await;

    response.assert_status_bad_request();
}

// =============================================================================
// LAYER TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_exceeded() {
    let mut config = AppConfig::default();
    config.server.rate_limit = 1;
    let server = create_server_with(config);

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_body_limit_enforced() {
    let mut config = AppConfig::default();
    config.server.rate_limit = 0;
    config.server.body_limit_bytes = 64;
    let server = create_server_with(config);

    let response = server
        .post("/gap/assessment")
        .json(&assessment_request("inst", "personalizacion", json!({})))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let server = create_test_server();

    let response = server.get("/unknown").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = create_test_server();

    // /health is GET only
    let response = server.post("/health").await;
    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = create_test_server();

    let response = server
        .post("/gap/assessment")
        .bytes(bytes::Bytes::from("not valid json"))
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}
