mod common;

use chrono::Duration;
use common::{base_time, open_database, record, timeline};
use physioassist_lib::db::StoreOutcome;

#[tokio::test]
async fn store_then_lookup_returns_equal_record() {
    let (_dir, db) = open_database(50);
    let stored = record(1, "Ana", base_time());

    let outcome = db.store(&stored).await.unwrap();
    assert_eq!(outcome, StoreOutcome::default());

    let found = db.lookup(&stored.fingerprint).await.unwrap();
    assert_eq!(found, Some(stored.clone()));
    assert_eq!(db.get_by_id(&stored.id).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn lookup_of_unknown_fingerprint_is_none() {
    let (_dir, db) = open_database(50);
    let absent = record(7, "Nobody", base_time());
    assert_eq!(db.lookup(&absent.fingerprint).await.unwrap(), None);
    assert_eq!(db.get_by_id("missing").await.unwrap(), None);
}

#[tokio::test]
async fn same_fingerprint_overwrites() {
    let (_dir, db) = open_database(50);
    let first = record(1, "Ana", base_time());
    db.store(&first).await.unwrap();

    let mut second = record(1, "Ana Lima", base_time() + Duration::hours(1));
    second.id = "analysis-1-rerun".into();
    let outcome = db.store(&second).await.unwrap();

    assert!(outcome.replaced);
    assert_eq!(db.count().await.unwrap(), 1);
    assert_eq!(db.lookup(&first.fingerprint).await.unwrap(), Some(second));
    assert_eq!(db.get_by_id(&first.id).await.unwrap(), None);
}

#[tokio::test]
async fn retention_keeps_the_newest_fifty() {
    let (_dir, db) = open_database(50);
    let records = timeline(60);

    let mut evicted = 0;
    for record in &records {
        evicted += db.store(record).await.unwrap().evicted;
    }

    assert_eq!(evicted, 10);
    assert_eq!(db.count().await.unwrap(), 50);
    for old in &records[..10] {
        assert_eq!(db.lookup(&old.fingerprint).await.unwrap(), None, "{}", old.id);
    }
    for kept in &records[10..] {
        assert!(db.lookup(&kept.fingerprint).await.unwrap().is_some(), "{}", kept.id);
    }
}

#[tokio::test]
async fn list_recent_is_newest_first() {
    let (_dir, db) = open_database(50);
    for record in timeline(5) {
        db.store(&record).await.unwrap();
    }

    let ids: Vec<String> = db
        .list_recent(3)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, ["analysis-4", "analysis-3", "analysis-2"]);
}

#[tokio::test]
async fn identical_timestamps_order_by_insertion() {
    let (_dir, db) = open_database(50);
    for seed in 0..3 {
        db.store(&record(seed, "Same time", base_time())).await.unwrap();
    }

    let ids: Vec<String> = db
        .list_recent(10)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, ["analysis-2", "analysis-1", "analysis-0"]);
}

#[tokio::test]
async fn delete_reports_whether_anything_was_removed() {
    let (_dir, db) = open_database(50);
    let stored = record(1, "Ana", base_time());
    db.store(&stored).await.unwrap();

    assert!(db.delete_by_id(&stored.id).await.unwrap());
    assert!(!db.delete_by_id(&stored.id).await.unwrap());
    assert_eq!(db.lookup(&stored.fingerprint).await.unwrap(), None);
}

#[tokio::test]
async fn search_matches_name_or_file_case_insensitively() {
    let (_dir, db) = open_database(50);
    db.store(&record(1, "Ana Lima", base_time())).await.unwrap();
    db.store(&record(2, "Bruno Costa", base_time() + Duration::minutes(1)))
        .await
        .unwrap();
    db.store(&record(3, "ANA Souza", base_time() + Duration::minutes(2)))
        .await
        .unwrap();

    let names: Vec<String> = db
        .search_by_text("ana")
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.display_name)
        .collect();
    assert_eq!(names, ["ANA Souza", "Ana Lima"]);

    let by_file = db.search_by_text("UPLOAD-2").await.unwrap();
    assert_eq!(by_file.len(), 1);
    assert_eq!(by_file[0].display_name, "Bruno Costa");

    assert!(db.search_by_text("zzz").await.unwrap().is_empty());

    // Surrounding spaces are part of the needle.
    let spaced: Vec<String> = db
        .search_by_text(" lima")
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.display_name)
        .collect();
    assert_eq!(spaced, ["Ana Lima"]);
    assert!(db.search_by_text("lima ").await.unwrap().is_empty());
    assert_eq!(db.search_by_text("").await.unwrap().len(), 3);
}

#[tokio::test]
async fn stats_summarize_retained_history() {
    let (_dir, db) = open_database(50);
    let now = base_time() + Duration::days(10);

    let mut old = record(1, "Ana", base_time());
    old.confidence = 0.9;
    let mut recent = record(2, "Bruno", now - Duration::days(1));
    recent.confidence = 0.7;
    let mut latest = record(3, "Caio", now - Duration::hours(1));
    latest.confidence = 0.4;
    for record in [&old, &recent, &latest] {
        db.store(record).await.unwrap();
    }

    let stats = db.history_stats(now).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.this_week, 2);
    approx::assert_relative_eq!(stats.average_confidence, (0.9 + 0.7 + 0.4) / 3.0, epsilon = 1e-12);
    assert_eq!(stats.confidence_distribution.high, 33);
    assert_eq!(stats.confidence_distribution.medium, 33);
    assert_eq!(stats.confidence_distribution.low, 33);
    // Neutral poses produce no deviations and the four general recommendations.
    assert!(stats.common_findings.is_empty());
    assert_eq!(stats.common_recommendations.len(), 4);
    assert!(stats.common_recommendations.iter().all(|entry| entry.count == 3));
}

#[tokio::test]
async fn history_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    let stored = record(1, "Ana", base_time());

    {
        let db = physioassist_lib::db::Database::new(path.clone()).unwrap();
        db.store(&stored).await.unwrap();
    }

    let reopened = physioassist_lib::db::Database::new(path).unwrap();
    assert_eq!(reopened.lookup(&stored.fingerprint).await.unwrap(), Some(stored));
}

#[test]
fn summaries_list_structural_findings() {
    use physioassist_lib::{
        assessment::{assess, AssessmentConfig},
        db::models::AnalysisSummary,
    };

    let mut stored = record(1, "Ana", base_time());
    let assessment = assess(&common::dropped_shoulder_pose(9.0), &AssessmentConfig::default());
    stored.findings = assessment.findings;

    let summary = AnalysisSummary::from(&stored);
    assert_eq!(
        summary.highlights,
        [
            "Shoulder girdle: Elevated left shoulder",
            "Shoulders: Unilateral elevation - left shoulder (moderate)",
        ]
    );
    assert!(summary.finding_count > summary.highlights.len());
}
