//! Pure postural assessment: pose in, angles, findings, a treatment plan and a
//! home exercise protocol out.
//!
//! Nothing here touches storage or blocks; the same pose and config always
//! produce the same [`Assessment`].

pub mod angles;
pub mod config;
pub mod exercises;
pub mod recommendations;
pub mod rules;
pub mod scoring;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::{Deserialize, Serialize};

use crate::models::{AngleSet, Exercise, Finding, Pose, RecommendationSet};

pub use angles::compute_angle_set;
pub use config::AssessmentConfig;
pub use exercises::exercises;
pub use recommendations::synthesize;
pub use rules::{evaluate, CATALOG_VERSION};
pub use scoring::confidence_score;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub angles: AngleSet,
    pub findings: Vec<Finding>,
    pub recommendations: RecommendationSet,
    pub exercises: Vec<Exercise>,
    pub confidence: f64,
}

pub fn assess(pose: &Pose, config: &AssessmentConfig) -> Assessment {
    let angles = compute_angle_set(pose, config);
    let findings = evaluate(pose, &angles, config);
    let recommendations = synthesize(&findings);
    let exercises = exercises(&findings);

    Assessment {
        confidence: confidence_score(pose),
        angles,
        findings,
        recommendations,
        exercises,
    }
}
