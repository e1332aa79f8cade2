use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::media::MediaKind;
use crate::models::{AngleSet, Exercise, Finding, Pose, RecommendationSet};

pub const ANONYMOUS_PATIENT: &str = "Anonymous patient";

/// One cached assessment. Immutable once stored; a new analysis of the same
/// media replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub fingerprint: Fingerprint,
    pub display_name: String,
    pub file_name: String,
    pub media_kind: MediaKind,
    pub created_at: DateTime<Utc>,
    pub confidence: f64,
    pub catalog_version: u32,
    pub pose: Pose,
    pub angles: AngleSet,
    pub findings: Vec<Finding>,
    pub recommendations: RecommendationSet,
    /// Empty on records written before exercise protocols existed.
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Lightweight row for history listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub id: String,
    pub display_name: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub confidence: f64,
    pub finding_count: usize,
    /// Headlines of the deviations and asymmetries, in rule order.
    pub highlights: Vec<String>,
}

impl From<&AnalysisRecord> for AnalysisSummary {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            id: record.id.clone(),
            display_name: record.display_name.clone(),
            file_name: record.file_name.clone(),
            created_at: record.created_at,
            confidence: record.confidence,
            finding_count: record.findings.len(),
            highlights: record
                .findings
                .iter()
                .filter(|finding| finding.pattern().is_some())
                .map(Finding::headline)
                .collect(),
        }
    }
}
