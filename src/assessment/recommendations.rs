use crate::models::{Finding, FindingPattern, RecommendationCategory, RecommendationSet};

use RecommendationCategory::{Functional, Mobility, Proprioception, Strengthening};

type Entries = &'static [(RecommendationCategory, &'static str)];

enum Trigger {
    Deviation(FindingPattern),
    Asymmetry(FindingPattern),
}

impl Trigger {
    fn matches(&self, finding: &Finding) -> bool {
        match self {
            Trigger::Deviation(pattern) => finding.is_deviation_with(*pattern),
            Trigger::Asymmetry(pattern) => finding.is_asymmetry_with(*pattern),
        }
    }
}

/// Checked in order; each contributes its entries once when any finding matches.
const PLANS: [(Trigger, Entries); 4] = [
    (
        Trigger::Deviation(FindingPattern::CervicalAnteriorization),
        &[
            (Strengthening, "Deep neck flexor strengthening (3x10 reps, 10 s hold)"),
            (Mobility, "Brachial plexus neural mobilisation and suboccipital stretching"),
            (Functional, "Postural re-education with biofeedback to correct the CVA"),
        ],
    ),
    (
        Trigger::Deviation(FindingPattern::ShoulderProtraction),
        &[
            (Strengthening, "Rhomboid and middle trapezius strengthening (3x15 reps with resistance)"),
            (Mobility, "Myofascial release and targeted pectoralis minor stretching"),
            (Proprioception, "Scapular awareness drills with tactile feedback"),
        ],
    ),
    (
        Trigger::Asymmetry(FindingPattern::PelvicAsymmetry),
        &[
            (Strengthening, "Unilateral gluteus medius strengthening with functional progression"),
            (Proprioception, "Pelvic stabilisation training on unstable surfaces"),
            (Functional, "Movement pattern correction during activities of daily living"),
        ],
    ),
    (
        Trigger::Deviation(FindingPattern::KneeValgus),
        &[
            (Strengthening, "Gluteus medius and hip external rotator strengthening"),
            (Mobility, "Iliotibial band release and adductor stretching"),
            (Proprioception, "Neuromuscular control training focused on knee alignment"),
            (Functional, "Squat progression with dynamic valgus correction"),
        ],
    ),
];

const GENERAL_PLAN: Entries = &[
    (Strengthening, "Core and postural stabiliser strengthening programme"),
    (Mobility, "Global mobility routine focused on the posterior chain"),
    (Proprioception, "Progressive balance and proprioception exercises"),
    (Functional, "Fundamental movement pattern training"),
];

/// Maps findings to a treatment plan. Never returns an empty set.
pub fn synthesize(findings: &[Finding]) -> RecommendationSet {
    let mut plan = RecommendationSet::default();

    for (trigger, entries) in PLANS.iter() {
        if findings.iter().any(|finding| trigger.matches(finding)) {
            for (category, text) in entries.iter() {
                plan.push(*category, *text);
            }
        }
    }

    if plan.is_empty() {
        for (category, text) in GENERAL_PLAN {
            plan.push(*category, *text);
        }
    }

    plan
}
