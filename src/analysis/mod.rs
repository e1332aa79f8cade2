pub mod controller;
pub mod producer;
pub mod state;

pub use controller::{AnalysisController, AnalysisOptions, AnalysisOutcome, AnalysisRequest};
pub use producer::{LandmarkProducer, SuppliedPose};
pub use state::{AnalysisProgress, AnalysisStage};
