use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::InputError;

/// Lowercase hex SHA-256 of the raw media bytes. Cache key of the history store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps a digest read back from storage.
    pub(crate) fn from_stored(hex: String) -> Self {
        Self(hex)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn compute_fingerprint(media: &[u8]) -> Result<Fingerprint, InputError> {
    if media.is_empty() {
        return Err(InputError::EmptyMedia);
    }

    let mut hasher = Sha256::new();
    hasher.update(media);
    Ok(Fingerprint(hex::encode(hasher.finalize())))
}
