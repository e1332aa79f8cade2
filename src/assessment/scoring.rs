use crate::models::{LandmarkIndex, Pose, Severity};

/// Landmarks the rule catalog reads; their mean visibility is the confidence score.
const SCORED_LANDMARKS: [LandmarkIndex; 15] = [
    LandmarkIndex::Nose,
    LandmarkIndex::LeftEar,
    LandmarkIndex::RightEar,
    LandmarkIndex::LeftShoulder,
    LandmarkIndex::RightShoulder,
    LandmarkIndex::LeftElbow,
    LandmarkIndex::RightElbow,
    LandmarkIndex::LeftWrist,
    LandmarkIndex::RightWrist,
    LandmarkIndex::LeftHip,
    LandmarkIndex::RightHip,
    LandmarkIndex::LeftKnee,
    LandmarkIndex::RightKnee,
    LandmarkIndex::LeftAnkle,
    LandmarkIndex::RightAnkle,
];

/// Three-band classifier shared by every rule.
/// Below `mild_ceiling` is mild, below `moderate_ceiling` is moderate, else severe.
pub fn classify_severity(magnitude: f64, mild_ceiling: f64, moderate_ceiling: f64) -> Severity {
    if magnitude < mild_ceiling {
        Severity::Mild
    } else if magnitude < moderate_ceiling {
        Severity::Moderate
    } else {
        Severity::Severe
    }
}

/// Mean visibility of the scored landmarks, clamped to [0, 1].
pub fn confidence_score(pose: &Pose) -> f64 {
    let total: f64 = SCORED_LANDMARKS
        .iter()
        .map(|index| pose.get(*index).visibility)
        .sum();
    (total / SCORED_LANDMARKS.len() as f64).clamp(0.0, 1.0)
}
