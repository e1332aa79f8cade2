#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use physioassist_lib::{
    assessment::{assess, AssessmentConfig, CATALOG_VERSION},
    db::{AnalysisRecord, Database},
    fingerprint::compute_fingerprint,
    media::MediaKind,
    models::{Landmark, LandmarkIndex, Pose, POSE_LANDMARK_COUNT},
};
use tempfile::TempDir;

const VISIBLE: f64 = 0.9;

/// Upright frontal pose: CVA 50°, level shoulders and hips, knees at 172.5°.
pub fn neutral_pose() -> Pose {
    use LandmarkIndex::*;

    let cva = 50f64.to_radians();
    let sx = 300.0 + 100.0 * cva.cos();
    let sy = 100.0 + 100.0 * cva.sin();
    let knee = 150.0 * 3.75f64.to_radians().tan();

    let mut landmarks = vec![Landmark::new(sx, sy, VISIBLE); POSE_LANDMARK_COUNT];
    let mut place = |index: LandmarkIndex, x: f64, y: f64| {
        landmarks[index.as_usize()] = Landmark::new(x, y, VISIBLE);
    };

    place(Nose, 330.0, 95.0);
    place(LeftEar, 280.0, 100.0);
    place(RightEar, 320.0, 100.0);
    place(LeftShoulder, sx - 60.0, sy);
    place(RightShoulder, sx + 60.0, sy);
    place(LeftElbow, sx - 60.0, sy + 100.0);
    place(RightElbow, sx + 60.0, sy + 100.0);
    place(LeftWrist, sx - 60.0, sy + 200.0);
    place(RightWrist, sx + 60.0, sy + 200.0);
    place(LeftHip, sx - 40.0, sy + 300.0);
    place(RightHip, sx + 40.0, sy + 300.0);
    place(LeftKnee, sx - 40.0 - knee, sy + 450.0);
    place(RightKnee, sx + 40.0 + knee, sy + 450.0);
    place(LeftAnkle, sx - 40.0, sy + 600.0);
    place(RightAnkle, sx + 40.0, sy + 600.0);
    place(LeftFootIndex, sx - 15.0, sy + 610.0);
    place(RightFootIndex, sx + 15.0, sy + 610.0);

    Pose::new(landmarks).expect("neutral pose is well formed")
}

/// Neutral pose with the right shoulder dropped by `percent` of torso length.
pub fn dropped_shoulder_pose(percent: f64) -> Pose {
    let mut landmarks = neutral_pose().landmarks().to_vec();
    landmarks[LandmarkIndex::RightShoulder.as_usize()].y += 3.0 * percent;
    Pose::new(landmarks).expect("edited pose is well formed")
}

/// Neutral pose with every coordinate multiplied by `factor`.
pub fn scaled_pose(factor: f64) -> Pose {
    let landmarks = neutral_pose()
        .landmarks()
        .iter()
        .map(|landmark| Landmark::new(landmark.x * factor, landmark.y * factor, landmark.visibility))
        .collect();
    Pose::new(landmarks).expect("scaled pose is well formed")
}

/// A minimal PNG signature followed by `seed`, so every seed fingerprints differently.
pub fn png_bytes(seed: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    bytes.extend_from_slice(&seed.to_be_bytes());
    bytes
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

pub fn record(seed: u32, display_name: &str, created_at: DateTime<Utc>) -> AnalysisRecord {
    let pose = neutral_pose();
    let assessment = assess(&pose, &AssessmentConfig::default());
    AnalysisRecord {
        id: format!("analysis-{seed}"),
        fingerprint: compute_fingerprint(&png_bytes(seed)).unwrap(),
        display_name: display_name.to_string(),
        file_name: format!("upload-{seed}.png"),
        media_kind: MediaKind::Png,
        created_at,
        confidence: assessment.confidence,
        catalog_version: CATALOG_VERSION,
        pose,
        angles: assessment.angles,
        findings: assessment.findings,
        recommendations: assessment.recommendations,
        exercises: assessment.exercises,
    }
}

/// Records one minute apart starting at `base_time()`.
pub fn timeline(count: u32) -> Vec<AnalysisRecord> {
    (0..count)
        .map(|seed| {
            record(
                seed,
                &format!("Patient {seed}"),
                base_time() + Duration::minutes(i64::from(seed)),
            )
        })
        .collect()
}

pub fn open_database(history_cap: usize) -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::with_history_cap(dir.path().join("history.db"), history_cap).unwrap();
    (dir, db)
}
