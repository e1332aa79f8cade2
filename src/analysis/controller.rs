use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
    time::Instant,
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::{mpsc::UnboundedSender, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    assessment::{
        compute_angle_set, confidence_score, evaluate, exercises, synthesize, AssessmentConfig,
        CATALOG_VERSION,
    },
    db::{models::ANONYMOUS_PATIENT, AnalysisRecord, Database},
    error::AnalysisError,
    fingerprint::{compute_fingerprint, Fingerprint},
    log_debug, log_info,
    media::{validate_media, MediaKind},
    metrics::{AnalysisMetrics, MetricsCollector},
};

use super::{
    producer::LandmarkProducer,
    state::{AnalysisProgress, AnalysisStage, StageTracker},
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub media: Vec<u8>,
    pub file_name: String,
    pub display_name: Option<String>,
    pub media_type: Option<String>,
}

impl AnalysisRequest {
    pub fn new(media: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            media,
            file_name: file_name.into(),
            display_name: None,
            media_type: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    fn resolved_display_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_PATIENT)
            .to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub progress: Option<UnboundedSender<AnalysisProgress>>,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub record: AnalysisRecord,
    pub cache_hit: bool,
}

type KeyLocks = Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>;

/// Holds a per-fingerprint lock slot; the slot is dropped from the registry
/// once nobody else is waiting on it.
struct KeyLease {
    registry: KeyLocks,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for KeyLease {
    fn drop(&mut self) {
        let mut registry = match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // One reference in the registry, one here.
        if Arc::strong_count(&self.lock) <= 2 {
            registry.remove(&self.key);
        }
    }
}

/// Runs uploads through fingerprint, cache lookup, extraction, assessment and
/// storage. Requests for the same media serialize on a per-fingerprint lock,
/// so identical concurrent uploads compute once; distinct media run in parallel.
#[derive(Clone)]
pub struct AnalysisController {
    db: Database,
    config: AssessmentConfig,
    max_media_bytes: usize,
    metrics: MetricsCollector,
    in_flight: KeyLocks,
}

impl AnalysisController {
    pub fn new(db: Database, config: AssessmentConfig, max_media_bytes: usize) -> Self {
        Self {
            db,
            config,
            max_media_bytes,
            metrics: MetricsCollector::new(),
            in_flight: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub async fn analyze(
        &self,
        request: AnalysisRequest,
        producer: Arc<dyn LandmarkProducer>,
    ) -> Result<AnalysisOutcome> {
        self.analyze_with(request, producer, AnalysisOptions::default())
            .await
    }

    pub async fn analyze_with(
        &self,
        request: AnalysisRequest,
        producer: Arc<dyn LandmarkProducer>,
        options: AnalysisOptions,
    ) -> Result<AnalysisOutcome> {
        let started = Instant::now();
        let mut tracker = StageTracker::new(options.progress);
        let media_bytes = request.media.len();

        let kind = validate_media(
            &request.media,
            request.media_type.as_deref(),
            self.max_media_bytes,
        )
        .with_context(|| format!("rejected upload {}", request.file_name))?;
        let fingerprint = compute_fingerprint(&request.media)
            .with_context(|| format!("failed to fingerprint {}", request.file_name))?;
        let fingerprint_ms = started.elapsed().as_millis() as u64;
        tracker.advance(AnalysisStage::FingerprintComputed);

        let lease = self.lease(&fingerprint);
        let _guard = lease.lock.lock().await;

        if let Some(record) = self.cached(&fingerprint).await? {
            tracker.advance(AnalysisStage::CacheHit);
            log_info!("Cache hit for {} ({fingerprint})", request.file_name);
            self.metrics
                .record_analysis(AnalysisMetrics {
                    timestamp: Utc::now(),
                    cache_hit: true,
                    media_bytes,
                    fingerprint_ms,
                    extraction_ms: None,
                    assessment_ms: None,
                    store_ms: None,
                    total_ms: started.elapsed().as_millis() as u64,
                })
                .await;
            tracker.advance(AnalysisStage::Returned);
            return Ok(AnalysisOutcome {
                record,
                cache_hit: true,
            });
        }

        tracker.advance(AnalysisStage::CacheMiss);
        log_info!("Cache miss for {} ({fingerprint})", request.file_name);

        if options.cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled.into());
        }

        let display_name = request.resolved_display_name();
        let AnalysisRequest {
            media, file_name, ..
        } = request;

        let extraction_started = Instant::now();
        let pose = self
            .extract(media, kind, producer, &options.cancel)
            .await
            .with_context(|| format!("landmark extraction failed for {file_name}"))?;
        let extraction_ms = extraction_started.elapsed().as_millis() as u64;
        tracker.advance(AnalysisStage::LandmarksExtracted);

        let assessment_started = Instant::now();
        let angles = compute_angle_set(&pose, &self.config);
        tracker.advance(AnalysisStage::AnglesComputed);
        let findings = evaluate(&pose, &angles, &self.config);
        tracker.advance(AnalysisStage::FindingsEvaluated);
        let recommendations = synthesize(&findings);
        let exercises = exercises(&findings);
        tracker.advance(AnalysisStage::RecommendationsSynthesized);
        let assessment_ms = assessment_started.elapsed().as_millis() as u64;

        log_debug!(
            "Assessed {file_name}: {} angles, {} findings",
            angles.len(),
            findings.len()
        );

        let record = AnalysisRecord {
            id: Uuid::new_v4().to_string(),
            fingerprint,
            display_name,
            file_name,
            media_kind: kind,
            created_at: Utc::now(),
            confidence: confidence_score(&pose),
            catalog_version: CATALOG_VERSION,
            pose,
            angles,
            findings,
            recommendations,
            exercises,
        };

        if options.cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled.into());
        }

        let store_started = Instant::now();
        self.db
            .store(&record)
            .await
            .context("failed to store analysis")?;
        let store_ms = store_started.elapsed().as_millis() as u64;
        tracker.advance(AnalysisStage::Stored);

        self.metrics
            .record_analysis(AnalysisMetrics {
                timestamp: Utc::now(),
                cache_hit: false,
                media_bytes,
                fingerprint_ms,
                extraction_ms: Some(extraction_ms),
                assessment_ms: Some(assessment_ms),
                store_ms: Some(store_ms),
                total_ms: started.elapsed().as_millis() as u64,
            })
            .await;

        tracker.advance(AnalysisStage::Returned);
        Ok(AnalysisOutcome {
            record,
            cache_hit: false,
        })
    }

    /// A record produced by an older rule catalog is treated as a miss.
    async fn cached(&self, fingerprint: &Fingerprint) -> Result<Option<AnalysisRecord>> {
        let record = self
            .db
            .lookup(fingerprint)
            .await
            .context("failed to query analysis cache")?;

        Ok(record.filter(|record| {
            let current = record.catalog_version == CATALOG_VERSION;
            if !current {
                log_info!(
                    "Cached analysis {} uses catalog v{}, recomputing",
                    record.id,
                    record.catalog_version
                );
            }
            current
        }))
    }

    async fn extract(
        &self,
        media: Vec<u8>,
        kind: MediaKind,
        producer: Arc<dyn LandmarkProducer>,
        cancel: &CancellationToken,
    ) -> Result<crate::models::Pose> {
        let task = tokio::task::spawn_blocking(move || producer.extract(&media, kind));

        tokio::select! {
            _ = cancel.cancelled() => Err(AnalysisError::Cancelled.into()),
            joined = task => joined.context("landmark extraction task panicked")?,
        }
    }

    fn lease(&self, fingerprint: &Fingerprint) -> KeyLease {
        let mut registry = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let lock = registry
            .entry(fingerprint.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        KeyLease {
            registry: Arc::clone(&self.in_flight),
            key: fingerprint.as_str().to_string(),
            lock,
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        match self.in_flight.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SuppliedPose;
    use crate::assessment::fixtures::neutral_pose;
    use crate::error::InputError;
    use crate::media::DEFAULT_MAX_MEDIA_BYTES;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR-test-image";

    fn controller(dir: &tempfile::TempDir) -> AnalysisController {
        let db = Database::new(dir.path().join("history.db")).unwrap();
        AnalysisController::new(db, AssessmentConfig::default(), DEFAULT_MAX_MEDIA_BYTES)
    }

    #[test]
    fn blank_display_name_falls_back() {
        let request = AnalysisRequest::new(PNG.to_vec(), "a.png").with_display_name("   ");
        assert_eq!(request.resolved_display_name(), ANONYMOUS_PATIENT);
        let named = AnalysisRequest::new(PNG.to_vec(), "a.png").with_display_name(" Ana ");
        assert_eq!(named.resolved_display_name(), "Ana");
    }

    #[tokio::test]
    async fn lock_slots_are_released() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(&dir);
        let producer: Arc<dyn LandmarkProducer> = Arc::new(SuppliedPose::new(neutral_pose()));

        controller
            .analyze(AnalysisRequest::new(PNG.to_vec(), "a.png"), producer.clone())
            .await
            .unwrap();
        assert_eq!(controller.in_flight_len(), 0);

        let err = controller
            .analyze(AnalysisRequest::new(Vec::new(), "empty.png"), producer)
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<InputError>(), Some(&InputError::EmptyMedia));
        assert_eq!(controller.in_flight_len(), 0);
    }

    #[tokio::test]
    async fn stale_catalog_version_is_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(&dir);
        let producer: Arc<dyn LandmarkProducer> = Arc::new(SuppliedPose::new(neutral_pose()));

        let first = controller
            .analyze(AnalysisRequest::new(PNG.to_vec(), "a.png"), producer.clone())
            .await
            .unwrap();

        let mut stale = first.record.clone();
        stale.catalog_version = CATALOG_VERSION + 1;
        controller.database().store(&stale).await.unwrap();

        let second = controller
            .analyze(AnalysisRequest::new(PNG.to_vec(), "a.png"), producer)
            .await
            .unwrap();
        assert!(!second.cache_hit);
        assert_ne!(second.record.id, first.record.id);
        assert_eq!(controller.database().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn progress_follows_the_miss_path() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(&dir);
        let producer: Arc<dyn LandmarkProducer> = Arc::new(SuppliedPose::new(neutral_pose()));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        controller
            .analyze_with(
                AnalysisRequest::new(PNG.to_vec(), "a.png"),
                producer,
                AnalysisOptions {
                    progress: Some(tx),
                    ..AnalysisOptions::default()
                },
            )
            .await
            .unwrap();

        let mut stages = Vec::new();
        while let Ok(progress) = rx.try_recv() {
            stages.push(progress.stage);
        }
        assert_eq!(stages.first(), Some(&AnalysisStage::Received));
        assert!(stages.contains(&AnalysisStage::CacheMiss));
        assert!(stages.contains(&AnalysisStage::Stored));
        assert_eq!(stages.last(), Some(&AnalysisStage::Returned));

        let snapshot = controller.metrics().get_snapshot().await;
        assert_eq!(snapshot.cache_misses, 1);
    }
}
