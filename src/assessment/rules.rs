//! Clinical rule catalog.
//!
//! Each rule reads a fixed set of landmarks, measures one metric against a
//! reference range and emits findings when it falls outside tolerance. Rules
//! never see each other's output; the evaluator concatenates them in catalog
//! order. Bump [`CATALOG_VERSION`] whenever a threshold or rule changes.

use crate::geometry::{distance, midpoint, percent_of, GeometryError};
use crate::log_debug;
use crate::models::{
    AngleSet, Finding, FindingPattern, Joint, LandmarkIndex, MovementQuality, Pose,
};

use super::config::AssessmentConfig;
use super::scoring::classify_severity;

const ENABLE_LOGS: bool = true;

pub const CATALOG_VERSION: u32 = 2;

// Cervical: craniovertebral angle, degrees.
const CVA_IDEAL: f64 = 50.0;
const CVA_TOLERANCE: f64 = 5.0;
const CVA_NORMAL_LOW: f64 = 48.0;
const CVA_ESCALATION: f64 = 45.0;
const CVA_MILD: f64 = 8.0;
const CVA_MODERATE: f64 = 15.0;

// Shoulder height, percent of the shoulder-to-hip length.
const SHOULDER_HEIGHT_TOLERANCE: f64 = 3.0;
const SHOULDER_HEIGHT_ESCALATION: f64 = 8.0;
const SHOULDER_HEIGHT_MILD: f64 = 5.0;
const SHOULDER_HEIGHT_MODERATE: f64 = 10.0;

// Shoulder protraction, percent of torso length.
const PROTRACTION_TOLERANCE: f64 = 15.0;
const PROTRACTION_ESCALATION: f64 = 20.0;
const PROTRACTION_MILD: f64 = 20.0;
const PROTRACTION_MODERATE: f64 = 30.0;

// Pelvic obliquity, percent of the hip-to-knee length.
const PELVIC_TOLERANCE: f64 = 2.0;
const PELVIC_ESCALATION: f64 = 4.0;
const PELVIC_MILD: f64 = 3.0;
const PELVIC_MODERATE: f64 = 6.0;

// Knee alignment (hip-knee-ankle), degrees.
const KNEE_IDEAL: f64 = 172.5;
const KNEE_TOLERANCE: f64 = 5.0;
const KNEE_VALGUS_BELOW: f64 = 170.0;
const KNEE_MILD: f64 = 8.0;
const KNEE_MODERATE: f64 = 15.0;

// Bilateral arm elevation difference, degrees.
const ARM_ELEVATION_TOLERANCE: f64 = 15.0;
const ARM_ELEVATION_ESCALATION: f64 = 20.0;

pub(crate) struct RuleContext<'a> {
    pub pose: &'a Pose,
    pub angles: &'a AngleSet,
    pub config: &'a AssessmentConfig,
}

impl RuleContext<'_> {
    fn angle(&self, joint: Joint) -> Result<f64, GeometryError> {
        self.angles
            .get(joint)
            .ok_or(GeometryError::DegenerateGeometry("joint angle unavailable"))
    }

    fn y(&self, index: LandmarkIndex) -> f64 {
        self.pose.get(index).y
    }
}

type RuleFn = fn(&RuleContext<'_>) -> Result<Vec<Finding>, GeometryError>;

pub struct Rule {
    pub name: &'static str,
    pub required: &'static [LandmarkIndex],
    evaluate: RuleFn,
}

pub static CATALOG: [Rule; 6] = [
    Rule {
        name: "cervical alignment",
        required: &[
            LandmarkIndex::Nose,
            LandmarkIndex::LeftEar,
            LandmarkIndex::RightEar,
            LandmarkIndex::LeftShoulder,
            LandmarkIndex::RightShoulder,
        ],
        evaluate: cervical_alignment,
    },
    Rule {
        name: "shoulder height",
        required: &[
            LandmarkIndex::LeftShoulder,
            LandmarkIndex::RightShoulder,
            LandmarkIndex::LeftHip,
        ],
        evaluate: shoulder_height,
    },
    Rule {
        name: "shoulder protraction",
        required: &[
            LandmarkIndex::LeftShoulder,
            LandmarkIndex::RightShoulder,
            LandmarkIndex::LeftHip,
            LandmarkIndex::RightHip,
        ],
        evaluate: shoulder_protraction,
    },
    Rule {
        name: "pelvic level",
        required: &[
            LandmarkIndex::LeftHip,
            LandmarkIndex::RightHip,
            LandmarkIndex::LeftKnee,
            LandmarkIndex::RightKnee,
        ],
        evaluate: pelvic_level,
    },
    Rule {
        name: "knee alignment",
        required: &[
            LandmarkIndex::LeftHip,
            LandmarkIndex::RightHip,
            LandmarkIndex::LeftKnee,
            LandmarkIndex::RightKnee,
            LandmarkIndex::LeftAnkle,
            LandmarkIndex::RightAnkle,
        ],
        evaluate: knee_alignment,
    },
    Rule {
        name: "arm elevation symmetry",
        required: &[
            LandmarkIndex::LeftShoulder,
            LandmarkIndex::RightShoulder,
            LandmarkIndex::LeftElbow,
            LandmarkIndex::RightElbow,
            LandmarkIndex::LeftWrist,
            LandmarkIndex::RightWrist,
        ],
        evaluate: arm_elevation_symmetry,
    },
];

/// Runs the whole catalog. A rule with a hidden landmark or a degenerate
/// reference segment contributes nothing; the remaining rules still run.
pub fn evaluate(pose: &Pose, angles: &AngleSet, config: &AssessmentConfig) -> Vec<Finding> {
    let ctx = RuleContext {
        pose,
        angles,
        config,
    };

    let mut findings = Vec::new();
    for rule in CATALOG.iter() {
        if let Some(hidden) = pose.first_hidden(rule.required, config.visibility_threshold) {
            log_debug!("Rule '{}' skipped: {} not visible", rule.name, hidden.as_str());
            continue;
        }

        match (rule.evaluate)(&ctx) {
            Ok(mut emitted) => findings.append(&mut emitted),
            Err(err) => log_debug!("Rule '{}' skipped: {err}", rule.name),
        }
    }
    findings
}

fn side_name(left: bool) -> &'static str {
    if left {
        "left"
    } else {
        "right"
    }
}

fn suggested_test(
    name: &str,
    indication: impl Into<String>,
    expected_finding: impl Into<String>,
    clinical_relevance: &str,
) -> Finding {
    Finding::SuggestedTest {
        name: name.to_string(),
        indication: indication.into(),
        expected_finding: expected_finding.into(),
        clinical_relevance: clinical_relevance.to_string(),
    }
}

fn cervical_alignment(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, GeometryError> {
    let cva = ctx.angle(Joint::CervicalFlexion)?;
    let deviation = (cva - CVA_IDEAL).abs();
    if deviation <= CVA_TOLERANCE {
        return Ok(Vec::new());
    }

    let forward_head = cva < CVA_NORMAL_LOW;
    let mut findings = vec![
        Finding::Observation(format!("Craniovertebral angle: {cva:.1}° (normal: 48-52°)")),
        Finding::Deviation {
            segment: "Cervical spine".into(),
            description: if forward_head {
                "Forward head posture".into()
            } else {
                "Excessive cervical retraction".into()
            },
            severity: classify_severity(deviation, CVA_MILD, CVA_MODERATE),
            compensation: if forward_head {
                "Upper cervical hyperextension (C1-C2)".into()
            } else {
                "Compensatory cervical flexion".into()
            },
            pattern: if forward_head {
                FindingPattern::CervicalAnteriorization
            } else {
                FindingPattern::CervicalRetraction
            },
        },
    ];

    if cva < CVA_ESCALATION {
        findings.extend([
            Finding::FunctionalLimitation(
                "Marked loss of cervical extension mobility".into(),
            ),
            Finding::RiskFactor(
                "High risk of cervicogenic headache and suboccipital pain".into(),
            ),
            Finding::ClinicalHypothesis("Upper crossed syndrome".into()),
            suggested_test(
                "Cervical flexion-rotation test (C1-C2)",
                "Assess atlantoaxial mobility restricted by forward head posture",
                format!("Restriction >10° (normal: 44°±5°) given a CVA of {cva:.1}°"),
                "Confirms C1-C2 dysfunction as the primary source of headache",
            ),
        ]);
    }

    Ok(findings)
}

fn shoulder_height(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, GeometryError> {
    let left = ctx.y(LandmarkIndex::LeftShoulder);
    let right = ctx.y(LandmarkIndex::RightShoulder);
    let reference = (left - ctx.y(LandmarkIndex::LeftHip)).abs();
    let percent = percent_of((left - right).abs(), reference)?;
    if percent <= SHOULDER_HEIGHT_TOLERANCE {
        return Ok(Vec::new());
    }

    // Image y grows downwards, so the smaller y is the higher shoulder.
    let higher = side_name(left < right);
    let lower = side_name(left >= right);

    let mut findings = vec![
        Finding::Observation(format!(
            "Shoulder height asymmetry: {percent:.1}% (normal: <3%)"
        )),
        Finding::Asymmetry {
            region: "Shoulder girdle".into(),
            description: format!("Elevated {higher} shoulder"),
            measurement: format!("{percent:.1}% asymmetry"),
            pattern: FindingPattern::ShoulderElevation,
        },
        Finding::Deviation {
            segment: "Shoulders".into(),
            description: format!("Unilateral elevation - {higher} shoulder"),
            severity: classify_severity(percent, SHOULDER_HEIGHT_MILD, SHOULDER_HEIGHT_MODERATE),
            compensation: format!("Lateral cervical flexion toward the {lower} side"),
            pattern: FindingPattern::ShoulderElevation,
        },
    ];

    if percent > SHOULDER_HEIGHT_ESCALATION {
        findings.extend([
            Finding::FunctionalLimitation(format!("Restricted elevation of the {lower} shoulder")),
            Finding::RiskFactor(
                "Possible functional scoliosis or upper limb length discrepancy".into(),
            ),
            Finding::ClinicalHypothesis(format!("Upper trapezius syndrome ({higher} side)")),
            suggested_test(
                "Upper trapezius length test",
                format!("Assess shortening of the {higher} upper trapezius"),
                format!(
                    "Restriction of {:.0}° in contralateral lateral flexion",
                    (percent * 2.0).round()
                ),
                "Confirms muscle tension as the cause of shoulder elevation",
            ),
        ]);
    }

    Ok(findings)
}

fn shoulder_protraction(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, GeometryError> {
    let pose = ctx.pose;
    let shoulders = midpoint(
        pose.get(LandmarkIndex::LeftShoulder).point(),
        pose.get(LandmarkIndex::RightShoulder).point(),
    );
    let hips = midpoint(
        pose.get(LandmarkIndex::LeftHip).point(),
        pose.get(LandmarkIndex::RightHip).point(),
    );
    let percent = percent_of((shoulders.x - hips.x).abs(), distance(shoulders, hips))?;
    if percent <= PROTRACTION_TOLERANCE {
        return Ok(Vec::new());
    }

    let mut findings = vec![
        Finding::Observation(format!("Shoulder protraction: {percent:.1}% (normal: <15%)")),
        Finding::Deviation {
            segment: "Shoulders".into(),
            description: "Bilateral protraction".into(),
            severity: classify_severity(percent, PROTRACTION_MILD, PROTRACTION_MODERATE),
            compensation: "Compensatory thoracic kyphosis".into(),
            pattern: FindingPattern::ShoulderProtraction,
        },
    ];

    if percent > PROTRACTION_ESCALATION {
        findings.extend([
            Finding::FunctionalLimitation("Reduced range of scapular retraction".into()),
            Finding::RiskFactor("Bilateral subacromial impingement syndrome".into()),
            Finding::ClinicalHypothesis("Pectoralis minor syndrome".into()),
            suggested_test(
                "Pectoralis minor length test",
                "Assess the shortening that drives scapular protraction",
                format!(
                    "Posterior acromion height >2.5 cm (normal: <1 cm) given {percent:.1}% protraction"
                ),
                "Identifies a primary muscular cause of protraction",
            ),
        ]);
    }

    Ok(findings)
}

fn pelvic_level(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, GeometryError> {
    let left = ctx.y(LandmarkIndex::LeftHip);
    let right = ctx.y(LandmarkIndex::RightHip);
    let reference = (left - ctx.y(LandmarkIndex::LeftKnee)).abs();
    let percent = percent_of((left - right).abs(), reference)?;
    if percent <= PELVIC_TOLERANCE {
        return Ok(Vec::new());
    }

    let higher = side_name(left < right);

    let mut findings = vec![
        Finding::Observation(format!("Pelvic obliquity: {percent:.1}% (normal: <2%)")),
        Finding::Asymmetry {
            region: "Pelvis".into(),
            description: format!("Elevated {higher} hip"),
            measurement: format!("{percent:.1}% obliquity"),
            pattern: FindingPattern::PelvicAsymmetry,
        },
        Finding::Deviation {
            segment: "Pelvis".into(),
            description: format!("Unilateral elevation - {higher} hip"),
            severity: classify_severity(percent, PELVIC_MILD, PELVIC_MODERATE),
            compensation: "Compensatory lumbar scoliosis".into(),
            pattern: FindingPattern::PelvicAsymmetry,
        },
    ];

    if percent > PELVIC_ESCALATION {
        findings.extend([
            Finding::FunctionalLimitation("Limited pelvic mobility in lateral tilt".into()),
            Finding::RiskFactor(
                "Possible leg length discrepancy or sacroiliac dysfunction".into(),
            ),
            Finding::ClinicalHypothesis("Quadratus lumborum syndrome".into()),
            suggested_test(
                "Trendelenburg test",
                "Assess gluteus medius strength and pelvic stability",
                format!("Positive on the {higher} side with contralateral pelvic drop"),
                "Confirms muscle weakness as the cause of pelvic obliquity",
            ),
            suggested_test(
                "Gillet test",
                "Assess sacroiliac joint mobility",
                "Possible unilateral sacroiliac joint restriction",
                "Distinguishes an articular from a muscular cause",
            ),
        ]);
    }

    Ok(findings)
}

fn knee_alignment(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, GeometryError> {
    let left = ctx.angle(Joint::LeftKneeFlexion)?;
    let right = ctx.angle(Joint::RightKneeFlexion)?;
    let left_deviation = (left - KNEE_IDEAL).abs();
    let right_deviation = (right - KNEE_IDEAL).abs();
    if left_deviation <= KNEE_TOLERANCE && right_deviation <= KNEE_TOLERANCE {
        return Ok(Vec::new());
    }

    let left_worse = left_deviation > right_deviation;
    let side = side_name(left_worse);
    let angle = if left_worse { left } else { right };
    let valgus = angle < KNEE_VALGUS_BELOW;
    let label = if valgus { "valgus" } else { "varus" };
    let capitalized = if valgus { "Valgus" } else { "Varus" };

    let mut findings = vec![
        Finding::Observation(format!(
            "{capitalized} deviation of the {side} knee: {angle:.1}° (normal: 170-175°)"
        )),
        Finding::Deviation {
            segment: "Knees".into(),
            description: format!("Dynamic {label} - {side} knee"),
            severity: classify_severity(
                left_deviation.max(right_deviation),
                KNEE_MILD,
                KNEE_MODERATE,
            ),
            compensation: if valgus {
                "Femoral internal rotation".into()
            } else {
                "Femoral external rotation".into()
            },
            pattern: if valgus {
                FindingPattern::KneeValgus
            } else {
                FindingPattern::KneeVarus
            },
        },
        Finding::FunctionalMovement {
            movement: "Squat".into(),
            quality: MovementQuality::Altered,
            observations: format!("Dynamic {label} during flexion - angle {angle:.1}°"),
        },
    ];

    if valgus {
        findings.extend([
            Finding::FunctionalLimitation(
                "Inadequate neuromuscular control during functional activities".into(),
            ),
            Finding::RiskFactor("High risk of patellofemoral pain syndrome".into()),
            Finding::ClinicalHypothesis("Iliotibial band syndrome".into()),
            suggested_test(
                "Modified Ober test",
                "Assess iliotibial band tension contributing to valgus",
                "Positive with adduction angle <10° (normal: 15-20°)",
                "Confirms lateral tension as a contributor to dynamic valgus",
            ),
            suggested_test(
                "Single leg squat test",
                "Assess neuromuscular control during a functional movement",
                "Dynamic valgus >10° from midline during single-leg squat",
                "Quantifies the motor control deficit that predisposes to injury",
            ),
        ]);
    }

    Ok(findings)
}

fn arm_elevation_symmetry(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, GeometryError> {
    let left = ctx.angle(Joint::LeftElbowFlexion)?;
    let right = ctx.angle(Joint::RightElbowFlexion)?;
    let difference = (left - right).abs();

    if difference <= ARM_ELEVATION_TOLERANCE {
        if !ctx.config.report_normal_movements {
            return Ok(Vec::new());
        }
        return Ok(vec![Finding::FunctionalMovement {
            movement: "Arm elevation".into(),
            quality: MovementQuality::Normal,
            observations: format!("Symmetric bilateral elevation (difference: {difference:.1}°)"),
        }]);
    }

    let escalated = difference > ARM_ELEVATION_ESCALATION;
    let mut findings = vec![Finding::FunctionalMovement {
        movement: "Arm elevation".into(),
        quality: if escalated {
            MovementQuality::Limited
        } else {
            MovementQuality::Altered
        },
        observations: format!(
            "Asymmetry of {difference:.1}° between arms (L: {left:.1}°, R: {right:.1}°)"
        ),
    }];

    if escalated {
        let restricted = side_name(left < right);
        findings.extend([
            Finding::FunctionalLimitation(format!("Restricted elevation of the {restricted} arm")),
            suggested_test(
                "Neer impingement test",
                format!("Assess subacromial impingement in the {restricted} shoulder"),
                "Possibly positive with pain during passive elevation",
                "Identifies subacromial impingement as the cause of the restriction",
            ),
        ]);
    }

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::angles::compute_angle_set;
    use crate::assessment::fixtures::{landmark_mut, neutral_pose, pose_with};
    use crate::models::Severity;

    fn run(pose: &Pose) -> Vec<Finding> {
        run_with(pose, &AssessmentConfig::default())
    }

    fn run_with(pose: &Pose, config: &AssessmentConfig) -> Vec<Finding> {
        let angles = compute_angle_set(pose, config);
        evaluate(pose, &angles, config)
    }

    fn deviation_in<'a>(findings: &'a [Finding], wanted: &str) -> Option<&'a Finding> {
        findings
            .iter()
            .find(|f| matches!(f, Finding::Deviation { segment, .. } if segment == wanted))
    }

    fn asymmetry_in<'a>(findings: &'a [Finding], wanted: &str) -> Option<&'a Finding> {
        findings
            .iter()
            .find(|f| matches!(f, Finding::Asymmetry { region, .. } if region == wanted))
    }

    /// Lowers the right shoulder by `percent` of the 300-unit shoulder-to-hip length.
    fn lowered_right_shoulder(percent: f64) -> Pose {
        pose_with(|landmarks| {
            landmark_mut(landmarks, LandmarkIndex::RightShoulder).y += 3.0 * percent;
        })
    }

    #[test]
    fn neutral_pose_has_no_findings() {
        assert!(run(&neutral_pose()).is_empty());
    }

    #[test]
    fn shoulder_asymmetry_of_nine_percent_is_moderate() {
        let findings = run(&lowered_right_shoulder(9.0));

        match deviation_in(&findings, "Shoulders") {
            Some(Finding::Deviation {
                severity,
                description,
                pattern,
                ..
            }) => {
                assert_eq!(*severity, Severity::Moderate);
                assert_eq!(description, "Unilateral elevation - left shoulder");
                assert_eq!(*pattern, FindingPattern::ShoulderElevation);
            }
            other => panic!("expected shoulder deviation, got {other:?}"),
        }
        assert!(asymmetry_in(&findings, "Shoulder girdle").is_some());
        // 9% is past the escalation threshold.
        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::SuggestedTest { name, .. } if name == "Upper trapezius length test")));
    }

    #[test]
    fn shoulder_asymmetry_below_tolerance_is_silent() {
        let findings = run(&lowered_right_shoulder(2.5));
        assert!(deviation_in(&findings, "Shoulders").is_none());
        assert!(asymmetry_in(&findings, "Shoulder girdle").is_none());
    }

    #[test]
    fn mild_shoulder_asymmetry_does_not_escalate() {
        let findings = run(&lowered_right_shoulder(4.0));
        assert!(matches!(
            deviation_in(&findings, "Shoulders"),
            Some(Finding::Deviation {
                severity: Severity::Mild,
                ..
            })
        ));
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::ClinicalHypothesis(_) | Finding::SuggestedTest { .. })));
    }

    #[test]
    fn hidden_landmark_silences_only_its_rules() {
        let pose = pose_with(|landmarks| {
            landmark_mut(landmarks, LandmarkIndex::RightShoulder).y += 27.0;
            landmark_mut(landmarks, LandmarkIndex::RightHip).y += 6.0;
            landmark_mut(landmarks, LandmarkIndex::LeftKnee).visibility = 0.3;
        });
        let findings = run(&pose);

        assert!(deviation_in(&findings, "Pelvis").is_none());
        assert!(deviation_in(&findings, "Knees").is_none());
        assert!(deviation_in(&findings, "Shoulders").is_some());

        let visible = pose_with(|landmarks| {
            landmark_mut(landmarks, LandmarkIndex::RightShoulder).y += 27.0;
            landmark_mut(landmarks, LandmarkIndex::RightHip).y += 6.0;
        });
        assert!(deviation_in(&run(&visible), "Pelvis").is_some());
    }

    #[test]
    fn forward_head_escalates_below_45_degrees() {
        // Moving the ears forward over the shoulders flattens the CVA.
        let pose = pose_with(|landmarks| {
            landmark_mut(landmarks, LandmarkIndex::LeftEar).x -= 30.0;
            landmark_mut(landmarks, LandmarkIndex::RightEar).x -= 30.0;
        });
        let findings = run(&pose);

        assert!(matches!(&findings[0], Finding::Observation(text) if text.starts_with("Craniovertebral angle")));
        match &findings[1] {
            Finding::Deviation {
                segment, pattern, ..
            } => {
                assert_eq!(segment, "Cervical spine");
                assert_eq!(*pattern, FindingPattern::CervicalAnteriorization);
            }
            other => panic!("expected cervical deviation, got {other:?}"),
        }
        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::ClinicalHypothesis(h) if h == "Upper crossed syndrome")));
    }

    #[test]
    fn pelvic_obliquity_reports_higher_side() {
        // 6.75 / 143.25 of the hip-to-knee length, about 4.7%.
        let pose = pose_with(|landmarks| {
            landmark_mut(landmarks, LandmarkIndex::LeftHip).y += 6.75;
        });
        let findings = run(&pose);

        match asymmetry_in(&findings, "Pelvis") {
            Some(Finding::Asymmetry { description, .. }) => {
                assert_eq!(description, "Elevated right hip")
            }
            other => panic!("expected pelvic asymmetry, got {other:?}"),
        }
        let tests: Vec<_> = findings
            .iter()
            .filter_map(|f| match f {
                Finding::SuggestedTest { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tests, ["Trendelenburg test", "Gillet test"]);
    }

    #[test]
    fn knee_valgus_is_flagged_with_squat_rating() {
        let pose = pose_with(|landmarks| {
            landmark_mut(landmarks, LandmarkIndex::LeftKnee).x += 40.0;
        });
        let findings = run(&pose);

        let deviation = deviation_in(&findings, "Knees").expect("knee deviation");
        assert!(deviation.is_deviation_with(FindingPattern::KneeValgus));
        assert!(findings.iter().any(|f| matches!(
            f,
            Finding::FunctionalMovement { movement, quality: MovementQuality::Altered, .. } if movement == "Squat"
        )));
        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::RiskFactor(r) if r.contains("patellofemoral"))));
    }

    #[test]
    fn straight_legs_read_as_varus() {
        let pose = pose_with(|landmarks| {
            let hip_x = landmarks[LandmarkIndex::RightHip.as_usize()].x;
            landmark_mut(landmarks, LandmarkIndex::RightKnee).x = hip_x;
        });
        let findings = run(&pose);

        let deviation = deviation_in(&findings, "Knees").expect("knee deviation");
        assert!(deviation.is_deviation_with(FindingPattern::KneeVarus));
        assert!(!findings.iter().any(|f| matches!(f, Finding::RiskFactor(_))));
    }

    #[test]
    fn arm_elevation_asymmetry_grades_quality() {
        // Bending the left elbow by moving the wrist sideways.
        let bent = |dx: f64| {
            pose_with(|landmarks| {
                landmark_mut(landmarks, LandmarkIndex::LeftWrist).x += dx;
            })
        };

        // atan(30/100) ≈ 16.7°: altered only.
        let findings = run(&bent(30.0));
        assert!(matches!(
            findings.as_slice(),
            [Finding::FunctionalMovement { quality: MovementQuality::Altered, .. }]
        ));

        // atan(60/100) ≈ 31°: limited, with a suggested test.
        let findings = run(&bent(60.0));
        assert!(matches!(
            findings[0],
            Finding::FunctionalMovement { quality: MovementQuality::Limited, .. }
        ));
        assert!(matches!(&findings[1], Finding::FunctionalLimitation(text) if text.contains("left arm")));
        assert!(matches!(&findings[2], Finding::SuggestedTest { name, .. } if name == "Neer impingement test"));
    }

    #[test]
    fn normal_movement_rating_is_opt_in() {
        let config = AssessmentConfig {
            report_normal_movements: true,
            ..AssessmentConfig::default()
        };
        let findings = run_with(&neutral_pose(), &config);
        assert!(matches!(
            findings.as_slice(),
            [Finding::FunctionalMovement { quality: MovementQuality::Normal, .. }]
        ));
    }

    #[test]
    fn zero_length_reference_fails_closed() {
        // Shoulder and hip at the same height: no reference length for the shoulder rule.
        let pose = pose_with(|landmarks| {
            let shoulder_y = landmarks[LandmarkIndex::LeftShoulder.as_usize()].y;
            landmark_mut(landmarks, LandmarkIndex::LeftHip).y = shoulder_y;
            landmark_mut(landmarks, LandmarkIndex::RightShoulder).y += 10.0;
        });
        let findings = run(&pose);
        assert!(asymmetry_in(&findings, "Shoulder girdle").is_none());
    }

    #[test]
    fn catalog_order_is_stable() {
        let names: Vec<_> = CATALOG.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            [
                "cervical alignment",
                "shoulder height",
                "shoulder protraction",
                "pelvic level",
                "knee alignment",
                "arm elevation symmetry",
            ]
        );
    }
}
