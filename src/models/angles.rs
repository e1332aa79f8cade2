use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Joint or movement an angle is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Joint {
    #[serde(rename = "cervical flexion")]
    CervicalFlexion,
    #[serde(rename = "left shoulder flexion")]
    LeftShoulderFlexion,
    #[serde(rename = "right shoulder flexion")]
    RightShoulderFlexion,
    #[serde(rename = "left elbow flexion")]
    LeftElbowFlexion,
    #[serde(rename = "right elbow flexion")]
    RightElbowFlexion,
    #[serde(rename = "left hip flexion")]
    LeftHipFlexion,
    #[serde(rename = "right hip flexion")]
    RightHipFlexion,
    #[serde(rename = "left knee flexion")]
    LeftKneeFlexion,
    #[serde(rename = "right knee flexion")]
    RightKneeFlexion,
    #[serde(rename = "left ankle dorsiflexion")]
    LeftAnkleDorsiflexion,
    #[serde(rename = "right ankle dorsiflexion")]
    RightAnkleDorsiflexion,
}

impl Joint {
    pub const ALL: [Joint; 11] = [
        Joint::CervicalFlexion,
        Joint::LeftShoulderFlexion,
        Joint::RightShoulderFlexion,
        Joint::LeftElbowFlexion,
        Joint::RightElbowFlexion,
        Joint::LeftHipFlexion,
        Joint::RightHipFlexion,
        Joint::LeftKneeFlexion,
        Joint::RightKneeFlexion,
        Joint::LeftAnkleDorsiflexion,
        Joint::RightAnkleDorsiflexion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Joint::CervicalFlexion => "cervical flexion",
            Joint::LeftShoulderFlexion => "left shoulder flexion",
            Joint::RightShoulderFlexion => "right shoulder flexion",
            Joint::LeftElbowFlexion => "left elbow flexion",
            Joint::RightElbowFlexion => "right elbow flexion",
            Joint::LeftHipFlexion => "left hip flexion",
            Joint::RightHipFlexion => "right hip flexion",
            Joint::LeftKneeFlexion => "left knee flexion",
            Joint::RightKneeFlexion => "right knee flexion",
            Joint::LeftAnkleDorsiflexion => "left ankle dorsiflexion",
            Joint::RightAnkleDorsiflexion => "right ankle dorsiflexion",
        }
    }
}

/// Angles in degrees, computed once per pose. There is no mutating API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngleSet {
    angles: BTreeMap<Joint, f64>,
}

impl AngleSet {
    pub fn get(&self, joint: Joint) -> Option<f64> {
        self.angles.get(&joint).copied()
    }

    pub fn contains(&self, joint: Joint) -> bool {
        self.angles.contains_key(&joint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, f64)> + '_ {
        self.angles.iter().map(|(joint, degrees)| (*joint, *degrees))
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

impl FromIterator<(Joint, f64)> for AngleSet {
    fn from_iter<I: IntoIterator<Item = (Joint, f64)>>(iter: I) -> Self {
        Self {
            angles: iter.into_iter().collect(),
        }
    }
}
