use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationCategory {
    Strengthening,
    Mobility,
    Proprioception,
    Functional,
}

impl RecommendationCategory {
    pub const ALL: [RecommendationCategory; 4] = [
        RecommendationCategory::Strengthening,
        RecommendationCategory::Mobility,
        RecommendationCategory::Proprioception,
        RecommendationCategory::Functional,
    ];
}

/// Treatment plan grouped by category. Entries keep rule-firing order and are
/// never deduplicated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub strengthening: Vec<String>,
    pub mobility: Vec<String>,
    pub proprioception: Vec<String>,
    pub functional: Vec<String>,
}

impl RecommendationSet {
    pub fn push(&mut self, category: RecommendationCategory, text: impl Into<String>) {
        self.category_mut(category).push(text.into());
    }

    pub fn get(&self, category: RecommendationCategory) -> &[String] {
        match category {
            RecommendationCategory::Strengthening => &self.strengthening,
            RecommendationCategory::Mobility => &self.mobility,
            RecommendationCategory::Proprioception => &self.proprioception,
            RecommendationCategory::Functional => &self.functional,
        }
    }

    fn category_mut(&mut self, category: RecommendationCategory) -> &mut Vec<String> {
        match category {
            RecommendationCategory::Strengthening => &mut self.strengthening,
            RecommendationCategory::Mobility => &mut self.mobility,
            RecommendationCategory::Proprioception => &mut self.proprioception,
            RecommendationCategory::Functional => &mut self.functional,
        }
    }

    pub fn is_empty(&self) -> bool {
        RecommendationCategory::ALL
            .iter()
            .all(|category| self.get(*category).is_empty())
    }

    /// All entries in category order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.strengthening
            .iter()
            .chain(&self.mobility)
            .chain(&self.proprioception)
            .chain(&self.functional)
    }
}
