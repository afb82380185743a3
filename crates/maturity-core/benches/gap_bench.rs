//! # Gap Analysis Benchmarks
//!
//! Performance benchmarks for maturity-core aggregation.
//!
//! Run with: `cargo bench -p maturity-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use maturity_core::{
    AssessmentGapAnalysis, Category, IndicatorDefinition, IndicatorResponse, IndicatorScores,
    LevelThresholds, ModuleDefinition, TransformationArea, TransformationYear, YearExpectation,
    aggregate_school_gap_analysis, calculate_assessment_gap_analysis,
    indicator_scores_from_responses, summarize_scores,
};
use std::hint::black_box;

/// Template with `modules` modules of `per_module` depth indicators each.
fn create_template(modules: usize, per_module: usize) -> Vec<ModuleDefinition> {
    let ladder = YearExpectation::new([Some(1), Some(2), Some(3), Some(3), Some(4)], 1);
    (0..modules)
        .map(|m| {
            let indicators = (0..per_module)
                .map(|i| {
                    IndicatorDefinition::new(
                        format!("m{m}-i{i}"),
                        format!("Indicador {m}.{i}"),
                        Category::Profundidad,
                        Some(ladder),
                    )
                })
                .collect();
            ModuleDefinition::new(format!("m{m}"), format!("Módulo {m}"), indicators)
        })
        .collect()
}

/// Deterministic spread of scores over the template.
fn create_scores(template: &[ModuleDefinition]) -> IndicatorScores {
    template
        .iter()
        .flat_map(|module| module.indicators.iter())
        .enumerate()
        .map(|(n, indicator)| (indicator.id.clone(), (n * 37 % 101) as f64))
        .collect()
}

fn create_analyses(count: usize) -> Vec<AssessmentGapAnalysis> {
    let template = create_template(5, 8);
    let scores = create_scores(&template);
    let year = TransformationYear::new(3).expect("valid year");
    (0..count)
        .map(|n| {
            let area = TransformationArea::ALL[n % TransformationArea::ALL.len()];
            calculate_assessment_gap_analysis(&format!("inst-{n}"), year, area, &template, &scores)
                .expect("valid assessment")
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_assessment(c: &mut Criterion) {
    let mut group = c.benchmark_group("assessment_gap_analysis");
    let year = TransformationYear::new(3).expect("valid year");

    for size in [10, 100, 1000].iter() {
        let template = create_template(*size / 10, 10);
        let scores = create_scores(&template);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                black_box(calculate_assessment_gap_analysis(
                    "inst",
                    year,
                    TransformationArea::Personalizacion,
                    &template,
                    &scores,
                ))
            });
        });
    }

    group.finish();
}

fn bench_school(c: &mut Criterion) {
    let mut group = c.benchmark_group("school_aggregate");

    for size in [10, 100, 500].iter() {
        let analyses = create_analyses(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(aggregate_school_gap_analysis(&analyses)));
        });
    }

    group.finish();
}

fn bench_response_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_scoring");

    for size in [10, 100, 1000].iter() {
        let template = create_template(*size / 10, 10);
        let responses: Vec<IndicatorResponse> = template
            .iter()
            .flat_map(|module| module.indicators.iter())
            .enumerate()
            .map(|(n, indicator)| IndicatorResponse {
                indicator_id: indicator.id.clone(),
                profundity_level: Some((n % 5) as i32),
                ..IndicatorResponse::default()
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("score_map", size), size, |b, _| {
            b.iter(|| black_box(indicator_scores_from_responses(&template, &responses)));
        });

        let thresholds = LevelThresholds::default();
        group.bench_with_input(BenchmarkId::new("summary", size), size, |b, _| {
            b.iter(|| {
                black_box(summarize_scores(
                    &template,
                    &responses,
                    TransformationYear::FIRST,
                    &thresholds,
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assessment, bench_school, bench_response_scoring);
criterion_main!(benches);
