//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{
    self, AssessmentGapRequest, IndicatorGapRequest, ScoreRequest, analyse_assessment,
};
use crate::config::AppConfig;
use crate::error::AppError;
use maturity_core::{
    AreaStatus, AssessmentGapAnalysis, Category, GapStats, IndicatorGapAnalysis, MaturityLevel,
    SchoolGapAggregate, TransformationYear, aggregate_school_gap_analysis_with, classify_gap,
    level::{validate_level, validate_score},
    score_to_actual_level, summarize_scores,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE INPUT
// =============================================================================

/// Maximum size of a JSON input file (50 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_INPUT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AppError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(AppError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize `path` and ensure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path.canonicalize().map_err(|e| {
        AppError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(AppError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate, size-check and parse a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_INPUT_FILE_SIZE)?;

    let text = std::fs::read_to_string(&validated)
        .map_err(|e| AppError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| {
        AppError::Serialization(format!("Invalid JSON in '{}': {}", path.display(), e))
    })
}

/// One analysis or a list of analyses.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum AnalysisFile {
    One(Box<AssessmentGapAnalysis>),
    Many(Vec<AssessmentGapAnalysis>),
}

/// Read every analysis from the given files, in order.
pub fn load_analyses(files: &[PathBuf]) -> Result<Vec<AssessmentGapAnalysis>, AppError> {
    let mut analyses = Vec::new();
    for file in files {
        match read_json_file::<AnalysisFile>(file)? {
            AnalysisFile::One(analysis) => analyses.push(*analysis),
            AnalysisFile::Many(batch) => analyses.extend(batch),
        }
    }
    Ok(analyses)
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.addr();

    println!("Maturity Gap-Analysis Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:     {}", addr);
    println!("  Rate limit:  {} req/s", config.server.rate_limit);
    println!("  Body limit:  {} bytes", config.server.body_limit_bytes);
    println!("  Top critical: {}", config.report.top_critical_limit);
    println!();
    println!("Endpoints:");
    println!("  GET  /health          - Health check");
    println!("  POST /gap/indicator   - Analyse one indicator");
    println!("  POST /gap/assessment  - Analyse an assessment");
    println!("  POST /gap/school      - Aggregate analyses");
    println!("  POST /score           - Score responses");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&addr, config).await
}

// =============================================================================
// LEVEL & CLASSIFY COMMANDS
// =============================================================================

/// Map a score to its level.
pub fn cmd_level(json_mode: bool, score: f64, category: &str) -> Result<(), AppError> {
    let category = Category::parse(category, "cli")?;
    validate_score("cli", score)?;
    let level = score_to_actual_level(score, category);

    if json_mode {
        print_json(&serde_json::json!({
            "score": score,
            "category": category,
            "level": level,
        }));
        return Ok(());
    }

    println!("Score:    {}", score);
    println!("Category: {}", category);
    match MaturityLevel::from_level(level).filter(|_| category == Category::Profundidad) {
        Some(named) => println!("Level:    {}", named),
        None => println!("Level:    {}", level),
    }
    Ok(())
}

/// Classify an actual level against an expectation.
pub fn cmd_classify(
    json_mode: bool,
    actual: u8,
    expected: Option<u8>,
    tolerance: u32,
    category: &str,
) -> Result<(), AppError> {
    let category = Category::parse(category, "cli")?;
    validate_level("cli", actual)?;
    if let Some(expected) = expected {
        validate_level("cli", expected)?;
    }
    let classification = classify_gap(actual, expected, tolerance, category);
    let gap = expected.map(|e| i32::from(actual) - i32::from(e));

    if json_mode {
        print_json(&serde_json::json!({
            "actualLevel": actual,
            "expectedLevel": expected,
            "tolerance": tolerance,
            "gap": gap,
            "classification": classification,
        }));
        return Ok(());
    }

    println!("Actual:         {}", actual);
    match expected {
        Some(e) => println!("Expected:       {}", e),
        None => println!("Expected:       (not configured)"),
    }
    println!("Tolerance:      {}", tolerance);
    println!("Classification: {}", classification);
    Ok(())
}

// =============================================================================
// INDICATOR COMMAND
// =============================================================================

/// Analyse one indicator from a request file.
pub fn cmd_indicator(json_mode: bool, file: &Path) -> Result<(), AppError> {
    let request: IndicatorGapRequest = read_json_file(file)?;
    let year = TransformationYear::new(request.transformation_year)?;
    let definition = request.indicator.to_definition()?;
    let analysis = IndicatorGapAnalysis::for_definition(&definition, request.score, year)?;

    if json_mode {
        print_json(&analysis);
        return Ok(());
    }

    println!("Indicator: {} ({})", analysis.indicator_name, analysis.indicator_id);
    print_indicator_line(&analysis);
    Ok(())
}

fn print_indicator_line(analysis: &IndicatorGapAnalysis) {
    let expected = analysis
        .expected_level
        .map_or_else(|| "-".to_string(), |e| e.to_string());
    let gap = analysis.gap.map_or_else(|| "-".to_string(), |g| format!("{:+}", g));
    println!(
        "  {:<12} actual {} / expected {}  gap {:>3}  score {:>6.2}  {}",
        analysis.category,
        analysis.actual_level,
        expected,
        gap,
        analysis.score,
        analysis.classification
    );
}

// =============================================================================
// ASSESS COMMAND
// =============================================================================

/// Analyse an assessment from a request file.
pub fn cmd_assess(json_mode: bool, file: &Path) -> Result<(), AppError> {
    let request: AssessmentGapRequest = read_json_file(file)?;
    let analysis = analyse_assessment(&request)?;

    tracing::info!(
        event = "gap.assessment",
        instance_id = %analysis.instance_id,
        indicators = analysis.overall_stats.total,
        "Assessment analysed"
    );

    if json_mode {
        print_json(&analysis);
        return Ok(());
    }

    println!("Assessment {}", analysis.instance_id);
    println!("==========={}", "=".repeat(analysis.instance_id.len()));
    println!("Area: {}   Year: {}", analysis.area.label(), analysis.transformation_year);
    println!();
    for module in &analysis.modules {
        println!("{} (avg gap {:+.2})", module.module_name, module.avg_gap);
        for indicator in &module.indicators {
            print_indicator_line(indicator);
        }
        println!();
    }
    print_stats("Overall", &analysis.overall_stats);
    println!("Average gap: {:+.2}", analysis.avg_gap);

    let attention: Vec<_> = analysis
        .indicators()
        .filter(|indicator| indicator.classification.needs_attention())
        .collect();
    if !attention.is_empty() {
        println!();
        println!("Needs attention:");
        for indicator in attention {
            println!("  [{}] {}", indicator.classification, indicator.indicator_name);
        }
    }
    Ok(())
}

fn print_stats(title: &str, stats: &GapStats) {
    println!(
        "{}: {} indicators ({} configured) | ahead {} | on track {} | behind {} | critical {} \
         | not configured {}",
        title,
        stats.total,
        stats.configured(),
        stats.ahead,
        stats.on_track,
        stats.behind,
        stats.critical,
        stats.not_configured
    );
}

// =============================================================================
// AGGREGATE COMMAND
// =============================================================================

/// Aggregate analyses from files into a school report.
pub fn cmd_aggregate(
    json_mode: bool,
    files: &[PathBuf],
    config: &AppConfig,
) -> Result<(), AppError> {
    let analyses = load_analyses(files)?;
    for analysis in analyses.iter().filter(|a| !a.overall_stats.is_consistent()) {
        tracing::warn!(
            instance_id = %analysis.instance_id,
            "Analysis stats do not add up; totals may be skewed"
        );
    }
    let aggregate =
        aggregate_school_gap_analysis_with(&analyses, &config.report.school_options());

    if json_mode {
        print_json(&aggregate);
        return Ok(());
    }

    print_school_report(&aggregate);
    Ok(())
}

fn print_school_report(aggregate: &SchoolGapAggregate) {
    println!("School Gap Report");
    println!("=================");
    println!("Instances: {}", aggregate.overall.total_instances);
    print_stats("Overall", &aggregate.overall.stats);
    println!("Average gap: {:+.2}", aggregate.overall.avg_gap);
    println!();
    println!("By area:");
    for (area, summary) in &aggregate.by_area {
        let avg = summary
            .avg_gap
            .map_or_else(|| "-".to_string(), |g| format!("{:+.2}", g));
        let status = match area.status() {
            AreaStatus::Available => "",
            AreaStatus::ComingSoon => "  (coming soon)",
        };
        println!(
            "  {:<16} instances {:>3}  avg gap {}{}",
            area.label(),
            summary.count,
            avg,
            status
        );
    }
    if !aggregate.top_critical_indicators.is_empty() {
        println!();
        println!("Recurring critical indicators:");
        for entry in &aggregate.top_critical_indicators {
            println!("  {:>3}x {}", entry.count, entry.indicator_name);
        }
    }
}

// =============================================================================
// SCORE COMMAND
// =============================================================================

/// Score raw responses from a request file.
pub fn cmd_score(json_mode: bool, file: &Path, config: &AppConfig) -> Result<(), AppError> {
    let request: ScoreRequest = read_json_file(file)?;
    let (year, modules) = request.to_context()?;
    let thresholds = &config.report.level_thresholds;
    let summary = summarize_scores(&modules, &request.responses, year, thresholds);

    if json_mode {
        print_json(&summary);
        return Ok(());
    }

    for module in &summary.modules {
        println!("{:<32} {:>6.2}", module.module_name, module.score);
        for indicator in &module.indicators {
            let mark = if indicator.is_above_expectation { ' ' } else { '!' };
            println!(
                "  {} {:<28} {:>6.2}",
                mark, indicator.indicator_name, indicator.normalized_score
            );
        }
    }
    let (low, high) = thresholds.range(summary.overall_level.level());
    println!();
    println!("Year:          {}", summary.transformation_year);
    println!("Total score:   {:.2}", summary.total_score);
    println!("Overall level: {}  [{}, {})", summary.overall_level, low, high);
    println!("Expected:      {}", summary.expected_level);
    println!(
        "Status:        {}",
        if summary.meets_expectations { "meets expectations" } else { "below expectations" }
    );
    Ok(())
}
