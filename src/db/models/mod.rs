pub mod analysis;

pub use analysis::{AnalysisRecord, AnalysisSummary, ANONYMOUS_PATIENT};
