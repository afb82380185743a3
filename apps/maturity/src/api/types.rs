//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. The CLI reads the same request shapes
//! from files.
//!
//! Requests carry category, area and year as raw wire values and are
//! converted with `to_*` methods so that a bad tag becomes a
//! `ValidationError` naming the offending indicator, not an opaque
//! deserialization failure.

use maturity_core::{
    AssessmentGapAnalysis, Category, FrequencyConfig, IndicatorDefinition, IndicatorResponse,
    IndicatorScores, ModuleDefinition, TransformationArea, TransformationYear, ValidationError,
    YearExpectation,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Error body of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator_id: Option<String>,
}

impl From<&ValidationError> for ApiError {
    fn from(err: &ValidationError) -> Self {
        Self {
            message: err.to_string(),
            indicator_id: err.indicator_id().map(str::to_string),
        }
    }
}

/// Envelope wrapping every analysis response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(err: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err),
        }
    }

    pub fn invalid(err: &ValidationError) -> Self {
        Self::error(ApiError::from(err))
    }
}

// =============================================================================
// TEMPLATE DEFINITIONS
// =============================================================================

/// Indicator as received over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub category: String,
    #[serde(default)]
    pub expectations: Option<YearExpectation>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub frequency_config: Option<FrequencyConfig>,
}

impl IndicatorRequest {
    /// Convert to an engine definition, validating the category tag.
    pub fn to_definition(&self) -> Result<IndicatorDefinition, ValidationError> {
        let category = Category::parse(&self.category, &self.id)?;
        let mut definition =
            IndicatorDefinition::new(&self.id, &self.name, category, self.expectations);
        definition.code.clone_from(&self.code);
        if let Some(weight) = self.weight {
            definition.weight = weight;
        }
        definition.frequency_config = self.frequency_config;
        Ok(definition)
    }
}

/// Module as received over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub indicators: Vec<IndicatorRequest>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl ModuleRequest {
    /// Convert to an engine definition, validating every indicator.
    pub fn to_definition(&self) -> Result<ModuleDefinition, ValidationError> {
        let indicators = self
            .indicators
            .iter()
            .map(IndicatorRequest::to_definition)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.in_module(&self.id))?;
        let mut module = ModuleDefinition::new(&self.id, &self.name, indicators);
        if let Some(weight) = self.weight {
            module.weight = weight;
        }
        Ok(module)
    }
}

/// Convert a list of wire modules.
pub fn to_module_definitions(
    modules: &[ModuleRequest],
) -> Result<Vec<ModuleDefinition>, ValidationError> {
    modules.iter().map(ModuleRequest::to_definition).collect()
}

// =============================================================================
// INDICATOR GAP REQUEST
// =============================================================================

/// Single-indicator gap request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorGapRequest {
    pub indicator: IndicatorRequest,
    pub score: f64,
    pub transformation_year: i64,
}

// =============================================================================
// ASSESSMENT GAP REQUEST
// =============================================================================

/// Assessment gap request.
///
/// `responses` are scored first; explicit `scores` then win for the same
/// indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentGapRequest {
    pub instance_id: String,
    pub transformation_year: i64,
    pub area: String,
    pub modules: Vec<ModuleRequest>,
    #[serde(default)]
    pub scores: IndicatorScores,
    #[serde(default)]
    pub responses: Vec<IndicatorResponse>,
}

impl AssessmentGapRequest {
    /// Validate year and area.
    pub fn to_context(&self) -> Result<(TransformationYear, TransformationArea), ValidationError> {
        let year = TransformationYear::new(self.transformation_year)?;
        let area = TransformationArea::parse(&self.area)?;
        Ok((year, area))
    }
}

// =============================================================================
// SCHOOL GAP REQUEST
// =============================================================================

/// School aggregate request over previously computed analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolGapRequest {
    pub analyses: Vec<AssessmentGapAnalysis>,
}

// =============================================================================
// SCORE REQUEST
// =============================================================================

/// Response scoring request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub transformation_year: i64,
    pub modules: Vec<ModuleRequest>,
    #[serde(default)]
    pub responses: Vec<IndicatorResponse>,
}

impl ScoreRequest {
    /// Validate the year and the template.
    pub fn to_context(
        &self,
    ) -> Result<(TransformationYear, Vec<ModuleDefinition>), ValidationError> {
        let year = TransformationYear::new(self.transformation_year)?;
        let modules = to_module_definitions(&self.modules)?;
        Ok((year, modules))
    }
}
