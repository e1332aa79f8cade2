//! Typed clinical findings produced by the rule catalog.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MovementQuality {
    Normal,
    Altered,
    Limited,
}

/// Structural tag attached when a deviation or asymmetry is created, so
/// recommendations never have to search description text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FindingPattern {
    CervicalAnteriorization,
    CervicalRetraction,
    ShoulderElevation,
    ShoulderProtraction,
    PelvicAsymmetry,
    KneeValgus,
    KneeVarus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Finding {
    /// Measured value next to its reference range.
    Observation(String),
    #[serde(rename_all = "camelCase")]
    Deviation {
        segment: String,
        description: String,
        severity: Severity,
        compensation: String,
        pattern: FindingPattern,
    },
    #[serde(rename_all = "camelCase")]
    Asymmetry {
        region: String,
        description: String,
        measurement: String,
        pattern: FindingPattern,
    },
    #[serde(rename_all = "camelCase")]
    FunctionalMovement {
        movement: String,
        quality: MovementQuality,
        observations: String,
    },
    FunctionalLimitation(String),
    RiskFactor(String),
    ClinicalHypothesis(String),
    #[serde(rename_all = "camelCase")]
    SuggestedTest {
        name: String,
        indication: String,
        expected_finding: String,
        clinical_relevance: String,
    },
}

impl Finding {
    pub fn pattern(&self) -> Option<FindingPattern> {
        match self {
            Finding::Deviation { pattern, .. } | Finding::Asymmetry { pattern, .. } => Some(*pattern),
            _ => None,
        }
    }

    pub fn is_deviation_with(&self, wanted: FindingPattern) -> bool {
        matches!(self, Finding::Deviation { pattern, .. } if *pattern == wanted)
    }

    pub fn is_asymmetry_with(&self, wanted: FindingPattern) -> bool {
        matches!(self, Finding::Asymmetry { pattern, .. } if *pattern == wanted)
    }

    /// One-line text used by history summaries.
    pub fn headline(&self) -> String {
        match self {
            Finding::Observation(text)
            | Finding::FunctionalLimitation(text)
            | Finding::RiskFactor(text)
            | Finding::ClinicalHypothesis(text) => text.clone(),
            Finding::Deviation {
                segment,
                description,
                severity,
                ..
            } => format!("{segment}: {description} ({})", severity.as_str()),
            Finding::Asymmetry {
                region,
                description,
                ..
            } => format!("{region}: {description}"),
            Finding::FunctionalMovement {
                movement,
                observations,
                ..
            } => format!("{movement}: {observations}"),
            Finding::SuggestedTest { name, .. } => name.clone(),
        }
    }
}
