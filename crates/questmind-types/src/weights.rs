//! Learned optimization weights.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Four scalar weights biasing automatic parameter choices.
///
/// They sum loosely to 1.0; the sum is not enforced. Serialized field names
/// match the persisted JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OptimizationWeights {
    /// Multiplier applied to quest auto-selection scores.
    #[serde(default = "default_quest_success_rate")]
    pub quest_success_rate: f64,
    /// Observed reward efficiency.
    #[serde(default = "default_reward_efficiency")]
    pub reward_efficiency: f64,
    /// Reserved for stamina-aware scheduling.
    #[serde(default = "default_stamina_management")]
    pub stamina_management: f64,
    /// Scales the quest duration cap.
    #[serde(default = "default_time_efficiency")]
    pub time_efficiency: f64,
}

const fn default_quest_success_rate() -> f64 {
    0.4
}

const fn default_reward_efficiency() -> f64 {
    0.3
}

const fn default_stamina_management() -> f64 {
    0.2
}

const fn default_time_efficiency() -> f64 {
    0.1
}

impl Default for OptimizationWeights {
    fn default() -> Self {
        Self {
            quest_success_rate: default_quest_success_rate(),
            reward_efficiency: default_reward_efficiency(),
            stamina_management: default_stamina_management(),
            time_efficiency: default_time_efficiency(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: Result<OptimizationWeights, _> =
            serde_json::from_str(r#"{"quest_success_rate": 0.9}"#);
        let weights = parsed.unwrap_or_default();
        assert!((weights.quest_success_rate - 0.9).abs() < f64::EPSILON);
        assert!((weights.time_efficiency - 0.1).abs() < f64::EPSILON);
    }
}
