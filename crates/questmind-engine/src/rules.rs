//! Tunable game rules consumed by the validator and optimizer.

use questmind_types::QuestType;

/// Bounds and tunables read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    /// Quest sub-types the validator accepts.
    pub quest_types: Vec<QuestType>,
    /// Shortest allowed quest in hours.
    pub min_quest_duration: f64,
    /// Longest allowed quest in hours.
    pub max_quest_duration: f64,
    /// Level ceiling.
    pub max_level: u32,
    /// Multiplier in the duration cap `max(1, stamina/5 * time_efficiency * k)`.
    pub time_efficiency_multiplier: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            quest_types: QuestType::ALL.to_vec(),
            min_quest_duration: 1.0,
            max_quest_duration: 24.0,
            max_level: 100,
            time_efficiency_multiplier: 2.0,
        }
    }
}

impl GameRules {
    /// Whether `quest_type` is enabled.
    pub fn allows(&self, quest_type: QuestType) -> bool {
        self.quest_types.contains(&quest_type)
    }
}
