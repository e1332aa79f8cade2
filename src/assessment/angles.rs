use crate::geometry::{angle_between, midpoint, GeometryError, Point};
use crate::models::{AngleSet, Joint, LandmarkIndex, Pose};
use crate::log_debug;

use super::config::AssessmentConfig;

const ENABLE_LOGS: bool = true;

/// Length of the synthetic horizontal ray used for the craniovertebral angle.
const HORIZONTAL_RAY: f64 = 100.0;

/// Landmark triple (first, vertex, third) measured for each limb joint.
fn limb_triple(joint: Joint) -> Option<[LandmarkIndex; 3]> {
    use LandmarkIndex::*;
    let triple = match joint {
        Joint::CervicalFlexion => return None,
        Joint::LeftShoulderFlexion => [LeftHip, LeftShoulder, LeftElbow],
        Joint::RightShoulderFlexion => [RightHip, RightShoulder, RightElbow],
        Joint::LeftElbowFlexion => [LeftShoulder, LeftElbow, LeftWrist],
        Joint::RightElbowFlexion => [RightShoulder, RightElbow, RightWrist],
        Joint::LeftHipFlexion => [LeftShoulder, LeftHip, LeftKnee],
        Joint::RightHipFlexion => [RightShoulder, RightHip, RightKnee],
        Joint::LeftKneeFlexion => [LeftHip, LeftKnee, LeftAnkle],
        Joint::RightKneeFlexion => [RightHip, RightKnee, RightAnkle],
        Joint::LeftAnkleDorsiflexion => [LeftKnee, LeftAnkle, LeftFootIndex],
        Joint::RightAnkleDorsiflexion => [RightKnee, RightAnkle, RightFootIndex],
    };
    Some(triple)
}

/// Angle at the ear midpoint between a horizontal ray and the shoulder midpoint.
/// Around 50° in a neutral sagittal posture.
pub fn craniovertebral_angle(ear_midpoint: Point, shoulder_midpoint: Point) -> Result<f64, GeometryError> {
    angle_between(
        ear_midpoint.offset(HORIZONTAL_RAY, 0.0),
        ear_midpoint,
        shoulder_midpoint,
    )
}

fn cervical_angle(pose: &Pose, threshold: f64) -> Option<Result<f64, GeometryError>> {
    let [left_ear, right_ear, left_shoulder, right_shoulder] = pose.require(
        [
            LandmarkIndex::LeftEar,
            LandmarkIndex::RightEar,
            LandmarkIndex::LeftShoulder,
            LandmarkIndex::RightShoulder,
        ],
        threshold,
    )?;

    Some(craniovertebral_angle(
        midpoint(left_ear.point(), right_ear.point()),
        midpoint(left_shoulder.point(), right_shoulder.point()),
    ))
}

fn joint_angle(pose: &Pose, joint: Joint, threshold: f64) -> Option<Result<f64, GeometryError>> {
    let Some(triple) = limb_triple(joint) else {
        return cervical_angle(pose, threshold);
    };
    let [first, vertex, third] = pose.require(triple, threshold)?;
    Some(angle_between(first.point(), vertex.point(), third.point()))
}

/// Every joint angle measurable on this pose. Joints with hidden landmarks or
/// degenerate geometry are left out.
pub fn compute_angle_set(pose: &Pose, config: &AssessmentConfig) -> AngleSet {
    Joint::ALL
        .iter()
        .filter_map(|joint| match joint_angle(pose, *joint, config.visibility_threshold)? {
            Ok(degrees) => Some((*joint, degrees)),
            Err(err) => {
                log_debug!("Skipping {}: {err}", joint.as_str());
                None
            }
        })
        .collect()
}
