//! # Maturity Vocabulary
//!
//! Display vocabulary shared by reports:
//!
//! | Level | Label | Default score band |
//! |-------|-------|--------------------|
//! | 0 | Por Comenzar | `[0, 12.5)` |
//! | 1 | Incipiente | `[12.5, 37.5)` |
//! | 2 | En Desarrollo | `[37.5, 62.5)` |
//! | 3 | Avanzado | `[62.5, 87.5)` |
//! | 4 | Consolidado | `[87.5, 100]` |
//!
//! The score bands summarize an overall 0-100 response score. They are not
//! the per-indicator level mapping used for gap analysis (see [`crate::level`]).

use crate::primitives::{MAX_SCORE, MIN_SCORE};
use crate::types::{TransformationArea, TransformationYear};
use serde::{Deserialize, Serialize};

// =============================================================================
// MATURITY LEVEL
// =============================================================================

/// Named maturity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    PorComenzar,
    Incipiente,
    EnDesarrollo,
    Avanzado,
    Consolidado,
}

impl MaturityLevel {
    /// Look up a level by its ordinal.
    #[must_use]
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(MaturityLevel::PorComenzar),
            1 => Some(MaturityLevel::Incipiente),
            2 => Some(MaturityLevel::EnDesarrollo),
            3 => Some(MaturityLevel::Avanzado),
            4 => Some(MaturityLevel::Consolidado),
            _ => None,
        }
    }

    /// Ordinal 0-4.
    #[must_use]
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MaturityLevel::PorComenzar => "Por Comenzar",
            MaturityLevel::Incipiente => "Incipiente",
            MaturityLevel::EnDesarrollo => "En Desarrollo",
            MaturityLevel::Avanzado => "Avanzado",
            MaturityLevel::Consolidado => "Consolidado",
        }
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.level())
    }
}

// =============================================================================
// LEVEL THRESHOLDS
// =============================================================================

/// Lower score bound of each level above 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub consolidated: f64,
    pub advanced: f64,
    pub developing: f64,
    pub emerging: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            consolidated: 87.5,
            advanced: 62.5,
            developing: 37.5,
            emerging: 12.5,
        }
    }
}

impl LevelThresholds {
    /// `(min, max)` score band of `level`; levels above 4 get the top band.
    #[must_use]
    pub fn range(&self, level: u8) -> (f64, f64) {
        match level {
            0 => (MIN_SCORE, self.emerging),
            1 => (self.emerging, self.developing),
            2 => (self.developing, self.advanced),
            3 => (self.advanced, self.consolidated),
            _ => (self.consolidated, MAX_SCORE),
        }
    }
}

/// Band a 0-100 score into a level 0-4.
#[must_use]
pub fn score_to_level(score: f64, thresholds: &LevelThresholds) -> u8 {
    if score >= thresholds.consolidated {
        4
    } else if score >= thresholds.advanced {
        3
    } else if score >= thresholds.developing {
        2
    } else if score >= thresholds.emerging {
        1
    } else {
        0
    }
}

/// Overall level a school is expected to reach in `year`, independent of
/// any indicator's own expectations.
#[must_use]
pub fn expected_level_by_year(year: TransformationYear) -> MaturityLevel {
    match year.get() {
        1 | 2 => MaturityLevel::Incipiente,
        3 => MaturityLevel::EnDesarrollo,
        _ => MaturityLevel::Avanzado,
    }
}

// =============================================================================
// AREA VOCABULARY
// =============================================================================

/// Whether assessments can be run for an area yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaStatus {
    Available,
    ComingSoon,
}

impl TransformationArea {
    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TransformationArea::Personalizacion => "Personalización",
            TransformationArea::Aprendizaje => "Aprendizaje",
            TransformationArea::Evaluacion => "Evaluación",
            TransformationArea::Proposito => "Propósito",
            TransformationArea::Familias => "Familias",
            TransformationArea::TrabajoDocente => "Trabajo Docente",
            TransformationArea::Liderazgo => "Liderazgo",
        }
    }

    /// Availability of the area.
    #[must_use]
    pub fn status(&self) -> AreaStatus {
        match self {
            TransformationArea::Personalizacion
            | TransformationArea::Aprendizaje
            | TransformationArea::Evaluacion => AreaStatus::Available,
            _ => AreaStatus::ComingSoon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_lookup_round_trips() {
        for level in 0..=4 {
            let named = MaturityLevel::from_level(level);
            assert_eq!(named.map(|m| m.level()), Some(level));
        }
        assert_eq!(MaturityLevel::from_level(5), None);
    }

    #[test]
    fn level_labels() {
        assert_eq!(MaturityLevel::PorComenzar.label(), "Por Comenzar");
        assert_eq!(MaturityLevel::EnDesarrollo.label(), "En Desarrollo");
        assert_eq!(MaturityLevel::Consolidado.to_string(), "Consolidado (4)");
    }

    #[test]
    fn default_banding() {
        let t = LevelThresholds::default();
        assert_eq!(score_to_level(0.0, &t), 0);
        assert_eq!(score_to_level(12.49, &t), 0);
        assert_eq!(score_to_level(12.5, &t), 1);
        assert_eq!(score_to_level(37.5, &t), 2);
        assert_eq!(score_to_level(62.49, &t), 2);
        assert_eq!(score_to_level(62.5, &t), 3);
        assert_eq!(score_to_level(87.5, &t), 4);
        assert_eq!(score_to_level(100.0, &t), 4);
    }

    #[test]
    fn band_lower_bound_maps_back_to_level() {
        let t = LevelThresholds::default();
        for level in 0..=4 {
            let (min, max) = t.range(level);
            assert!(min < max);
            assert_eq!(score_to_level(min, &t), level);
        }
    }

    #[test]
    fn custom_thresholds() {
        let t = LevelThresholds {
            consolidated: 90.0,
            advanced: 70.0,
            developing: 50.0,
            emerging: 20.0,
        };
        assert_eq!(score_to_level(88.0, &t), 3);
        assert_eq!(score_to_level(19.0, &t), 0);
    }

    #[test]
    fn expected_level_per_year() {
        let levels: Vec<u8> = TransformationYear::all()
            .map(|year| expected_level_by_year(year).level())
            .collect();
        assert_eq!(levels, [1, 1, 2, 3, 3]);
    }

    #[test]
    fn area_vocabulary() {
        assert_eq!(TransformationArea::Evaluacion.label(), "Evaluación");
        assert_eq!(TransformationArea::TrabajoDocente.label(), "Trabajo Docente");
        let available: Vec<_> = TransformationArea::ALL
            .into_iter()
            .filter(|a| a.status() == AreaStatus::Available)
            .collect();
        assert_eq!(
            available,
            [
                TransformationArea::Personalizacion,
                TransformationArea::Aprendizaje,
                TransformationArea::Evaluacion,
            ]
        );
    }
}
