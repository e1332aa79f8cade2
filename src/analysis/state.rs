use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStage {
    Received,
    FingerprintComputed,
    CacheHit,
    CacheMiss,
    LandmarksExtracted,
    AnglesComputed,
    FindingsEvaluated,
    RecommendationsSynthesized,
    Stored,
    Returned,
}

impl Default for AnalysisStage {
    fn default() -> Self {
        AnalysisStage::Received
    }
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Received => "received",
            AnalysisStage::FingerprintComputed => "fingerprint computed",
            AnalysisStage::CacheHit => "cache hit",
            AnalysisStage::CacheMiss => "cache miss",
            AnalysisStage::LandmarksExtracted => "landmarks extracted",
            AnalysisStage::AnglesComputed => "angles computed",
            AnalysisStage::FindingsEvaluated => "findings evaluated",
            AnalysisStage::RecommendationsSynthesized => "recommendations synthesized",
            AnalysisStage::Stored => "stored",
            AnalysisStage::Returned => "returned",
        }
    }

    pub fn can_advance_to(&self, next: AnalysisStage) -> bool {
        use AnalysisStage::*;
        matches!(
            (self, next),
            (Received, FingerprintComputed)
                | (FingerprintComputed, CacheHit)
                | (FingerprintComputed, CacheMiss)
                | (CacheHit, Returned)
                | (CacheMiss, LandmarksExtracted)
                | (LandmarksExtracted, AnglesComputed)
                | (AnglesComputed, FindingsEvaluated)
                | (FindingsEvaluated, RecommendationsSynthesized)
                | (RecommendationsSynthesized, Stored)
                | (Stored, Returned)
        )
    }

    /// Advisory completion estimate for progress displays.
    pub fn progress_percent(&self) -> u8 {
        match self {
            AnalysisStage::Received => 0,
            AnalysisStage::FingerprintComputed => 10,
            AnalysisStage::CacheHit => 90,
            AnalysisStage::CacheMiss => 15,
            AnalysisStage::LandmarksExtracted => 60,
            AnalysisStage::AnglesComputed => 70,
            AnalysisStage::FindingsEvaluated => 80,
            AnalysisStage::RecommendationsSynthesized => 90,
            AnalysisStage::Stored => 95,
            AnalysisStage::Returned => 100,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStage::Returned)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisProgress {
    pub stage: AnalysisStage,
    pub percent: u8,
}

/// Walks one request through its stages and mirrors each step to an optional
/// listener. A dropped listener never affects the request.
pub(crate) struct StageTracker {
    stage: AnalysisStage,
    listener: Option<UnboundedSender<AnalysisProgress>>,
}

impl StageTracker {
    pub fn new(listener: Option<UnboundedSender<AnalysisProgress>>) -> Self {
        let tracker = Self {
            stage: AnalysisStage::Received,
            listener,
        };
        tracker.emit();
        tracker
    }

    pub fn stage(&self) -> AnalysisStage {
        self.stage
    }

    pub fn advance(&mut self, next: AnalysisStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "invalid stage transition {:?} -> {:?}",
            self.stage,
            next
        );
        self.stage = next;
        self.emit();
    }

    fn emit(&self) {
        if let Some(listener) = &self.listener {
            let _ = listener.send(AnalysisProgress {
                stage: self.stage,
                percent: self.stage.progress_percent(),
            });
        }
    }
}
