mod types;

pub use types::{AnalysisMetrics, ConfidenceDistribution, CountedEntry, HistoryStats, MetricsSnapshot};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::db::AnalysisRecord;
use crate::models::Finding;

const MAX_RECENT_ANALYSES: usize = 20;
const TOP_FINDINGS: usize = 4;
const TOP_RECOMMENDATIONS: usize = 6;
const HIGH_CONFIDENCE: f64 = 0.8;
const MEDIUM_CONFIDENCE: f64 = 0.6;

/// In-process pipeline counters. Not persisted.
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

#[derive(Default)]
struct MetricsState {
    recent_analyses: Vec<AnalysisMetrics>,
    analysis_count: u64,
    cache_hits: u64,
    cache_misses: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsState::default())),
        }
    }

    pub async fn record_analysis(&self, metrics: AnalysisMetrics) {
        let mut state = self.inner.lock().await;

        state.analysis_count += 1;
        if metrics.cache_hit {
            state.cache_hits += 1;
        } else {
            state.cache_misses += 1;
        }

        state.recent_analyses.push(metrics);
        if state.recent_analyses.len() > MAX_RECENT_ANALYSES {
            state.recent_analyses.remove(0);
        }
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        let state = self.inner.lock().await;
        MetricsSnapshot {
            recent_analyses: state.recent_analyses.clone(),
            analysis_count: state.analysis_count,
            cache_hits: state.cache_hits,
            cache_misses: state.cache_misses,
        }
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        *state = MetricsState::default();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn percent(part: usize, total: usize) -> u32 {
    ((part as f64 / total as f64) * 100.0).round() as u32
}

/// Most frequent texts first; ties keep first-seen order.
fn top_counts<'a>(texts: impl Iterator<Item = &'a str>, limit: usize) -> Vec<CountedEntry> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for text in texts {
        let count = counts.entry(text).or_insert(0);
        if *count == 0 {
            order.push(text);
        }
        *count += 1;
    }

    let mut entries: Vec<CountedEntry> = order
        .into_iter()
        .map(|name| CountedEntry {
            name: name.to_string(),
            count: counts[name],
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    entries
}

/// Dashboard figures over the retained history. `records` may be in any order.
pub fn summarize_history(records: &[AnalysisRecord], now: DateTime<Utc>) -> HistoryStats {
    if records.is_empty() {
        return HistoryStats::default();
    }

    let total = records.len();
    let week_ago = now - Duration::days(7);
    let this_week = records
        .iter()
        .filter(|record| record.created_at >= week_ago)
        .count();

    let average_confidence =
        records.iter().map(|record| record.confidence).sum::<f64>() / total as f64;

    let high = records
        .iter()
        .filter(|record| record.confidence >= HIGH_CONFIDENCE)
        .count();
    let medium = records
        .iter()
        .filter(|record| (MEDIUM_CONFIDENCE..HIGH_CONFIDENCE).contains(&record.confidence))
        .count();
    let low = total - high - medium;

    let deviations = records.iter().flat_map(|record| {
        record.findings.iter().filter_map(|finding| match finding {
            Finding::Deviation { description, .. } | Finding::Asymmetry { description, .. } => {
                Some(description.as_str())
            }
            _ => None,
        })
    });
    let recommendations = records
        .iter()
        .flat_map(|record| record.recommendations.iter().map(String::as_str));

    HistoryStats {
        total,
        this_week,
        average_confidence,
        confidence_distribution: ConfidenceDistribution {
            high: percent(high, total),
            medium: percent(medium, total),
            low: percent(low, total),
        },
        common_findings: top_counts(deviations, TOP_FINDINGS),
        common_recommendations: top_counts(recommendations, TOP_RECOMMENDATIONS),
    }
}
