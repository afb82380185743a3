//! # Engine Primitives
//!
//! Fixed constants of the maturity model.
//!
//! The engine starts with no trajectory data but fixed mapping rules.
//! These values are compiled in and immutable at runtime.

/// Highest ordinal maturity level (`Consolidado`).
pub const MAX_LEVEL: u8 = 4;

/// Lowest accepted normalized score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest accepted normalized score.
///
/// Scores above this are rejected, never clamped: they indicate an upstream
/// data bug.
pub const MAX_SCORE: f64 = 100.0;

/// Width of one depth level on the 0-100 scale (`100 / MAX_LEVEL`).
pub const DEPTH_LEVEL_WIDTH: f64 = 25.0;

/// Score at or above which a binary indicator (coverage, frequency) counts as met.
pub const BINARY_THRESHOLD: f64 = 50.0;

/// Number of years in a transformation trajectory.
pub const TRANSFORMATION_YEARS: u8 = 5;

/// Default length of the school-wide recurring critical indicator ranking.
pub const DEFAULT_TOP_CRITICAL_LIMIT: usize = 10;
