//! # maturity-core
//!
//! The Maturity Gap-Analysis Engine - THE LOGIC.
//!
//! Turns normalized indicator scores from a school self-assessment into
//! ordinal levels, compares each level with the trajectory expected for the
//! school's transformation year, and rolls the verdicts up to module,
//! assessment and school summaries.
//!
//! ## Pipeline
//!
//! ```text
//! score ──> level ──┐
//!                   ├──> classify ──> indicator ──> module ──> assessment ──> school
//! year ──> expected ┘
//! ```
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no I/O, no logging
//! - Stateless: every operation is a free function over explicit inputs
//! - Inputs are never mutated; every call returns a fresh owned record
//! - Bad input is a [`ValidationError`], never a panic

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod classify;
pub mod expectation;
pub mod indicator;
pub mod level;
pub mod maturity;
pub mod primitives;
pub mod scoring;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Category, GapClassification, IndicatorDefinition, IndicatorScores, ModuleDefinition,
    TransformationArea, TransformationYear, ValidationError, YearExpectation,
};

// =============================================================================
// RE-EXPORTS: Gap Engine
// =============================================================================

pub use aggregate::{
    AreaGapSummary, AssessmentGapAnalysis, CriticalIndicatorCount, GapStats, ModuleGapAnalysis,
    OverallGapSummary, SchoolAggregateOptions, SchoolGapAggregate, aggregate_school_gap_analysis,
    aggregate_school_gap_analysis_with, calculate_assessment_gap_analysis,
    calculate_module_gap_analysis,
};
pub use classify::classify_gap;
pub use expectation::get_expected_level_for_year;
pub use indicator::{IndicatorGapAnalysis, calculate_indicator_gap};
pub use level::score_to_actual_level;

// =============================================================================
// RE-EXPORTS: Scoring & Vocabulary
// =============================================================================

pub use maturity::{
    AreaStatus, LevelThresholds, MaturityLevel, expected_level_by_year, score_to_level,
};
pub use scoring::{
    FrequencyConfig, IndicatorResponse, IndicatorScore, ModuleScore, RawAnswer, ScoreSummary,
    indicator_scores_from_responses, score_coverage, score_depth, score_frequency,
    score_response, summarize_scores, weighted_average,
};
