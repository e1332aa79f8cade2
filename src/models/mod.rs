pub mod angles;
pub mod exercise;
pub mod finding;
pub mod landmark;
pub mod recommendation;

pub use angles::{AngleSet, Joint};
pub use exercise::Exercise;
pub use finding::{Finding, FindingPattern, MovementQuality, Severity};
pub use landmark::{Landmark, LandmarkIndex, Pose, PoseError, POSE_LANDMARK_COUNT};
pub use recommendation::{RecommendationCategory, RecommendationSet};
