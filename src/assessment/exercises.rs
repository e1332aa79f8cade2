//! Home exercise protocol derived from the structural findings.

use crate::models::{Exercise, Finding, FindingPattern};

struct Template {
    name: &'static str,
    description: &'static str,
    duration: &'static str,
    repetitions: &'static str,
    frequency: &'static str,
    precautions: &'static [&'static str],
    target_areas: &'static [&'static str],
}

impl Template {
    fn to_exercise(&self) -> Exercise {
        Exercise {
            name: self.name.to_string(),
            description: self.description.to_string(),
            duration: self.duration.to_string(),
            repetitions: self.repetitions.to_string(),
            frequency: self.frequency.to_string(),
            precautions: self.precautions.iter().map(|text| text.to_string()).collect(),
            target_areas: self.target_areas.iter().map(|text| text.to_string()).collect(),
        }
    }
}

/// Each template is prescribed once when any finding carries one of its patterns.
const PROTOCOL: [(&[FindingPattern], Template); 4] = [
    (
        &[FindingPattern::CervicalAnteriorization, FindingPattern::CervicalRetraction],
        Template {
            name: "Cervical retraction",
            description: "Chin tuck to correct head posture and strengthen the deep cervical flexors.",
            duration: "10 seconds per repetition",
            repetitions: "10-15 repetitions",
            frequency: "3x daily",
            precautions: &["Do not force the movement", "Stop if you feel dizzy"],
            target_areas: &["Cervical spine", "Head posture"],
        },
    ),
    (
        &[FindingPattern::ShoulderElevation, FindingPattern::ShoulderProtraction],
        Template {
            name: "Scapular retraction",
            description: "Rhomboid and middle trapezius strengthening to correct scapular protraction.",
            duration: "5-8 seconds per contraction",
            repetitions: "12-15 repetitions",
            frequency: "2x daily",
            precautions: &["Keep the shoulders relaxed", "Avoid shrugging"],
            target_areas: &["Scapulae", "Shoulder posture"],
        },
    ),
    (
        &[FindingPattern::PelvicAsymmetry],
        Template {
            name: "Pelvic tilt",
            description: "Pelvic mobility and control work to improve lumbopelvic alignment.",
            duration: "5 seconds in each position",
            repetitions: "10-12 repetitions",
            frequency: "2-3x daily",
            precautions: &["Move slowly and with control", "Do not force the range"],
            target_areas: &["Pelvis", "Lumbar spine"],
        },
    ),
    (
        &[FindingPattern::KneeValgus, FindingPattern::KneeVarus],
        Template {
            name: "Gluteus medius strengthening",
            description: "Side-lying hip abduction to strengthen gluteus medius and correct dynamic knee alignment.",
            duration: "3-5 seconds per lift",
            repetitions: "15-20 repetitions each side",
            frequency: "1x daily",
            precautions: &["Keep the body aligned", "Do not rotate the hip"],
            target_areas: &["Gluteus medius", "Knee stability"],
        },
    ),
];

const POSTERIOR_CHAIN: Template = Template {
    name: "Posterior chain stretch",
    description: "Global stretch of the posterior muscle chain to improve flexibility.",
    duration: "30-60 seconds",
    repetitions: "3-4 repetitions",
    frequency: "1x daily",
    precautions: &["Do not force the stretch", "Breathe normally"],
    target_areas: &["General flexibility", "Posterior chain"],
};

/// Exercises for `findings` in protocol order, always ending with the
/// posterior chain stretch.
pub fn exercises(findings: &[Finding]) -> Vec<Exercise> {
    let present: Vec<FindingPattern> = findings.iter().filter_map(Finding::pattern).collect();

    PROTOCOL
        .iter()
        .filter(|(patterns, _)| patterns.iter().any(|pattern| present.contains(pattern)))
        .map(|(_, template)| template)
        .chain(std::iter::once(&POSTERIOR_CHAIN))
        .map(Template::to_exercise)
        .collect()
}
