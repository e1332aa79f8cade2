/// Tunables for the rule catalog. Clinical thresholds themselves are fixed in
/// `rules`; these only decide what the catalog may see and report.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Landmarks at or below this visibility are treated as not visible.
    pub visibility_threshold: f64,

    /// Emit a `normal` arm-elevation rating when both sides are within tolerance.
    pub report_normal_movements: bool,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.5,
            report_normal_movements: false,
        }
    }
}
