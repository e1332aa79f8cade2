use serde::{Deserialize, Serialize};

/// One prescribed home exercise with its dosage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub repetitions: String,
    pub frequency: String,
    pub precautions: Vec<String>,
    pub target_areas: Vec<String>,
}
