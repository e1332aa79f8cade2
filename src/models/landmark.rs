//! Body landmark data models.
//!
//! A `Pose` is always the full 33-point BlazePose layout. Index meaning is a
//! fixed contract shared with every rule in `assessment::rules`; reordering or
//! resizing it changes what every rule measures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point;

pub const POSE_LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Detection confidence in [0, 1]; a weight, not a flag.
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility,
        }
    }

    /// Strictly above the threshold counts as visible.
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkIndex::Nose => "nose",
            LandmarkIndex::LeftEyeInner => "left_eye_inner",
            LandmarkIndex::LeftEye => "left_eye",
            LandmarkIndex::LeftEyeOuter => "left_eye_outer",
            LandmarkIndex::RightEyeInner => "right_eye_inner",
            LandmarkIndex::RightEye => "right_eye",
            LandmarkIndex::RightEyeOuter => "right_eye_outer",
            LandmarkIndex::LeftEar => "left_ear",
            LandmarkIndex::RightEar => "right_ear",
            LandmarkIndex::MouthLeft => "mouth_left",
            LandmarkIndex::MouthRight => "mouth_right",
            LandmarkIndex::LeftShoulder => "left_shoulder",
            LandmarkIndex::RightShoulder => "right_shoulder",
            LandmarkIndex::LeftElbow => "left_elbow",
            LandmarkIndex::RightElbow => "right_elbow",
            LandmarkIndex::LeftWrist => "left_wrist",
            LandmarkIndex::RightWrist => "right_wrist",
            LandmarkIndex::LeftPinky => "left_pinky",
            LandmarkIndex::RightPinky => "right_pinky",
            LandmarkIndex::LeftIndex => "left_index",
            LandmarkIndex::RightIndex => "right_index",
            LandmarkIndex::LeftThumb => "left_thumb",
            LandmarkIndex::RightThumb => "right_thumb",
            LandmarkIndex::LeftHip => "left_hip",
            LandmarkIndex::RightHip => "right_hip",
            LandmarkIndex::LeftKnee => "left_knee",
            LandmarkIndex::RightKnee => "right_knee",
            LandmarkIndex::LeftAnkle => "left_ankle",
            LandmarkIndex::RightAnkle => "right_ankle",
            LandmarkIndex::LeftHeel => "left_heel",
            LandmarkIndex::RightHeel => "right_heel",
            LandmarkIndex::LeftFootIndex => "left_foot_index",
            LandmarkIndex::RightFootIndex => "right_foot_index",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PoseError {
    #[error("pose must contain {expected} landmarks, got {actual}")]
    WrongLandmarkCount { expected: usize, actual: usize },
    #[error("landmark {index} has non-finite coordinates")]
    NonFiniteCoordinate { index: usize },
    #[error("landmark {index} visibility {visibility} is outside [0, 1]")]
    VisibilityOutOfRange { index: usize, visibility: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct Pose {
    landmarks: Vec<Landmark>,
}

impl Pose {
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, PoseError> {
        if landmarks.len() != POSE_LANDMARK_COUNT {
            return Err(PoseError::WrongLandmarkCount {
                expected: POSE_LANDMARK_COUNT,
                actual: landmarks.len(),
            });
        }

        for (index, landmark) in landmarks.iter().enumerate() {
            if !(landmark.x.is_finite() && landmark.y.is_finite() && landmark.z.is_finite()) {
                return Err(PoseError::NonFiniteCoordinate { index });
            }
            if !(0.0..=1.0).contains(&landmark.visibility) {
                return Err(PoseError::VisibilityOutOfRange {
                    index,
                    visibility: landmark.visibility,
                });
            }
        }

        Ok(Self { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index.as_usize()]
    }

    /// Returns the landmark only when it clears the visibility threshold.
    pub fn visible(&self, index: LandmarkIndex, threshold: f64) -> Option<&Landmark> {
        let landmark = self.get(index);
        landmark.is_visible(threshold).then_some(landmark)
    }

    /// Fetches several landmarks at once, or `None` if any of them is not visible.
    pub fn require<const N: usize>(
        &self,
        indices: [LandmarkIndex; N],
        threshold: f64,
    ) -> Option<[&Landmark; N]> {
        let mut out = [&self.landmarks[0]; N];
        for (slot, index) in out.iter_mut().zip(indices) {
            *slot = self.visible(index, threshold)?;
        }
        Some(out)
    }

    /// First of `indices` that is not visible, if any.
    pub fn first_hidden(&self, indices: &[LandmarkIndex], threshold: f64) -> Option<LandmarkIndex> {
        indices
            .iter()
            .copied()
            .find(|index| !self.get(*index).is_visible(threshold))
    }
}

impl TryFrom<Vec<Landmark>> for Pose {
    type Error = PoseError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        Pose::new(landmarks)
    }
}

impl From<Pose> for Vec<Landmark> {
    fn from(pose: Pose) -> Self {
        pose.landmarks
    }
}
