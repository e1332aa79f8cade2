use anyhow::Result;

use crate::media::MediaKind;
use crate::models::Pose;

/// Upstream pose estimation. Implementations may block; the controller runs
/// them on the blocking pool.
pub trait LandmarkProducer: Send + Sync {
    fn extract(&self, media: &[u8], kind: MediaKind) -> Result<Pose>;
}

/// A pose that was already extracted elsewhere, e.g. loaded from a JSON file.
#[derive(Debug, Clone)]
pub struct SuppliedPose {
    pose: Pose,
}

impl SuppliedPose {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }
}

impl LandmarkProducer for SuppliedPose {
    fn extract(&self, _media: &[u8], _kind: MediaKind) -> Result<Pose> {
        Ok(self.pose.clone())
    }
}
