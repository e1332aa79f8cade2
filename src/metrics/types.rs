use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timing of one pipeline run. Stage timings are absent on a cache hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetrics {
    pub timestamp: DateTime<Utc>,
    pub cache_hit: bool,
    pub media_bytes: usize,
    pub fingerprint_ms: u64,
    pub extraction_ms: Option<u64>,
    pub assessment_ms: Option<u64>,
    pub store_ms: Option<u64>,
    pub total_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub recent_analyses: Vec<AnalysisMetrics>,
    pub analysis_count: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Share of records in each confidence band, as whole percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceDistribution {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountedEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub this_week: usize,
    pub average_confidence: f64,
    pub confidence_distribution: ConfidenceDistribution,
    pub common_findings: Vec<CountedEntry>,
    pub common_recommendations: Vec<CountedEntry>,
}
