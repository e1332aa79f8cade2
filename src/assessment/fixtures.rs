//! Test poses. The neutral pose sits exactly on every rule's reference value:
//! CVA 50°, level shoulders and hips, shoulders stacked over hips, knees at
//! 172.5° and symmetric straight arms.

use crate::models::{Landmark, LandmarkIndex, Pose, POSE_LANDMARK_COUNT};

pub const VISIBLE: f64 = 0.95;

fn shoulder_mid_x() -> f64 {
    300.0 + 100.0 * 50f64.to_radians().cos()
}

fn knee_offset() -> f64 {
    150.0 * 3.75f64.to_radians().tan()
}

pub fn neutral_landmarks() -> Vec<Landmark> {
    use LandmarkIndex::*;

    let sx = shoulder_mid_x();
    let shoulder_y = 100.0 + 100.0 * 50f64.to_radians().sin();
    let hip_y = shoulder_y + 300.0;
    let knee_y = hip_y + 150.0;
    let ankle_y = hip_y + 300.0;
    let (left_x, right_x) = (sx - 60.0, sx + 60.0);
    let (left_hip_x, right_hip_x) = (sx - 40.0, sx + 40.0);

    let mut landmarks = vec![Landmark::new(0.0, 0.0, VISIBLE); POSE_LANDMARK_COUNT];
    let mut place = |index: LandmarkIndex, x: f64, y: f64| {
        landmarks[index.as_usize()] = Landmark::new(x, y, VISIBLE);
    };

    place(Nose, 330.0, 95.0);
    place(LeftEyeInner, 322.0, 90.0);
    place(LeftEye, 318.0, 90.0);
    place(LeftEyeOuter, 314.0, 90.0);
    place(RightEyeInner, 338.0, 90.0);
    place(RightEye, 342.0, 90.0);
    place(RightEyeOuter, 346.0, 90.0);
    place(LeftEar, 280.0, 100.0);
    place(RightEar, 320.0, 100.0);
    place(MouthLeft, 324.0, 108.0);
    place(MouthRight, 336.0, 108.0);
    place(LeftShoulder, left_x, shoulder_y);
    place(RightShoulder, right_x, shoulder_y);
    place(LeftElbow, left_x, shoulder_y + 100.0);
    place(RightElbow, right_x, shoulder_y + 100.0);
    place(LeftWrist, left_x, shoulder_y + 200.0);
    place(RightWrist, right_x, shoulder_y + 200.0);
    place(LeftPinky, left_x - 4.0, shoulder_y + 215.0);
    place(RightPinky, right_x + 4.0, shoulder_y + 215.0);
    place(LeftIndex, left_x, shoulder_y + 218.0);
    place(RightIndex, right_x, shoulder_y + 218.0);
    place(LeftThumb, left_x + 4.0, shoulder_y + 212.0);
    place(RightThumb, right_x - 4.0, shoulder_y + 212.0);
    place(LeftHip, left_hip_x, hip_y);
    place(RightHip, right_hip_x, hip_y);
    place(LeftKnee, left_hip_x - knee_offset(), knee_y);
    place(RightKnee, right_hip_x + knee_offset(), knee_y);
    place(LeftAnkle, left_hip_x, ankle_y);
    place(RightAnkle, right_hip_x, ankle_y);
    place(LeftHeel, left_hip_x - 5.0, ankle_y + 10.0);
    place(RightHeel, right_hip_x + 5.0, ankle_y + 10.0);
    place(LeftFootIndex, left_hip_x + 25.0, ankle_y + 10.0);
    place(RightFootIndex, right_hip_x - 25.0, ankle_y + 10.0);

    landmarks
}

pub fn neutral_pose() -> Pose {
    Pose::new(neutral_landmarks()).expect("neutral pose is well formed")
}

pub fn pose_with(edit: impl FnOnce(&mut Vec<Landmark>)) -> Pose {
    let mut landmarks = neutral_landmarks();
    edit(&mut landmarks);
    Pose::new(landmarks).expect("edited pose is well formed")
}

pub fn landmark_mut(landmarks: &mut [Landmark], index: LandmarkIndex) -> &mut Landmark {
    &mut landmarks[index.as_usize()]
}
