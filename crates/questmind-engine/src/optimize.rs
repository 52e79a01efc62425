//! Quest parameter optimization applied right before execution.

use questmind_types::{HeroSnapshot, OptimizationWeights, QuestRequest, QuestType};

use crate::enhance::best_quest;
use crate::rules::GameRules;

/// Sub-type and duration the orchestrator will actually submit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizedQuest {
    /// Resolved sub-type.
    pub quest_type: QuestType,
    /// Duration in hours, one decimal place.
    pub duration: f64,
    /// Whether the sub-type was chosen or the duration changed.
    pub optimization_applied: bool,
}

/// Resolve `auto` and cap the duration using the learned weights.
///
/// `auto` (or an absent sub-type) picks the best affinity score scaled by
/// `quest_success_rate` among the sub-types enabled in `rules`. The
/// duration becomes
/// `min(requested, stamina/5, max(1, stamina/5 * time_efficiency * k))`
/// rounded to one decimal, where `k` is
/// [`GameRules::time_efficiency_multiplier`]. Returns `None` when the
/// request names a sub-type that is unknown or disabled, or when no
/// sub-type is enabled at all.
pub fn optimize_quest(
    request: Option<&QuestRequest>,
    requested_duration: f64,
    hero: &HeroSnapshot,
    weights: &OptimizationWeights,
    rules: &GameRules,
) -> Option<OptimizedQuest> {
    let (quest_type, chosen) = match request {
        Some(QuestRequest::Kind(kind)) if rules.allows(*kind) => (*kind, false),
        Some(QuestRequest::Auto) | None => (
            best_quest(
                &hero.attributes,
                weights.quest_success_rate,
                &rules.quest_types,
            )?,
            true,
        ),
        Some(QuestRequest::Kind(_) | QuestRequest::Unrecognized(_)) => return None,
    };

    let affordable = hero.affordable_hours();
    let efficient = (affordable * weights.time_efficiency * rules.time_efficiency_multiplier).max(1.0);
    let duration = round_tenths(requested_duration.min(affordable).min(efficient));

    Some(OptimizedQuest {
        quest_type,
        duration,
        optimization_applied: chosen || (duration - requested_duration).abs() > f64::EPSILON,
    })
}

fn round_tenths(hours: f64) -> f64 {
    (hours * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use questmind_types::Attributes;

    use super::*;
    use crate::enhance::tests::{dev_attributes, hero};

    #[test]
    fn default_weights_cap_dev_hero_at_one_hour() {
        // stamina 25 -> 5h affordable; 5 * 0.1 * 2 = 1.0
        let out = optimize_quest(
            Some(&QuestRequest::Kind(QuestType::Fishing)),
            3.0,
            &hero(25, dev_attributes()),
            &OptimizationWeights::default(),
            &GameRules::default(),
        );
        assert_eq!(
            out,
            Some(OptimizedQuest {
                quest_type: QuestType::Fishing,
                duration: 1.0,
                optimization_applied: true,
            })
        );
    }

    #[test]
    fn generous_time_efficiency_keeps_request() {
        let weights = OptimizationWeights {
            time_efficiency: 0.5,
            ..OptimizationWeights::default()
        };
        let out = optimize_quest(
            Some(&QuestRequest::Kind(QuestType::Mining)),
            3.0,
            &hero(25, dev_attributes()),
            &weights,
            &GameRules::default(),
        );
        assert_eq!(out.map(|o| o.duration), Some(3.0));
        assert_eq!(out.map(|o| o.optimization_applied), Some(false));
    }

    #[test]
    fn duration_rounds_to_one_decimal() {
        let weights = OptimizationWeights {
            time_efficiency: 1.0,
            ..OptimizationWeights::default()
        };
        // stamina 12 -> 2.4h affordable
        let out = optimize_quest(
            Some(&QuestRequest::Kind(QuestType::Mining)),
            10.0,
            &hero(12, dev_attributes()),
            &weights,
            &GameRules::default(),
        );
        assert_eq!(out.map(|o| o.duration), Some(2.4));
    }

    #[test]
    fn auto_resolves_by_weighted_score() {
        let attrs = Attributes {
            agility: 20,
            luck: 20,
            ..Attributes::default()
        };
        let out = optimize_quest(
            Some(&QuestRequest::Auto),
            1.0,
            &hero(25, attrs),
            &OptimizationWeights::default(),
            &GameRules::default(),
        );
        assert_eq!(out.map(|o| o.quest_type), Some(QuestType::Fishing));
        assert_eq!(out.map(|o| o.optimization_applied), Some(true));
    }

    #[test]
    fn auto_only_picks_enabled_types() {
        // intelligence and wisdom favour gardening
        let attrs = Attributes {
            intelligence: 30,
            wisdom: 30,
            ..Attributes::default()
        };
        let rules = GameRules {
            quest_types: vec![QuestType::Mining],
            ..GameRules::default()
        };
        for request in [Some(&QuestRequest::Auto), None] {
            let out = optimize_quest(
                request,
                1.0,
                &hero(25, attrs),
                &OptimizationWeights::default(),
                &rules,
            );
            assert_eq!(out.map(|o| o.quest_type), Some(QuestType::Mining));
        }

        let none_enabled = GameRules {
            quest_types: Vec::new(),
            ..GameRules::default()
        };
        let out = optimize_quest(
            Some(&QuestRequest::Auto),
            1.0,
            &hero(25, attrs),
            &OptimizationWeights::default(),
            &none_enabled,
        );
        assert!(out.is_none());
    }

    #[test]
    fn disabled_kind_is_not_optimized() {
        let rules = GameRules {
            quest_types: vec![QuestType::Mining],
            ..GameRules::default()
        };
        let out = optimize_quest(
            Some(&QuestRequest::Kind(QuestType::Gardening)),
            1.0,
            &hero(25, dev_attributes()),
            &OptimizationWeights::default(),
            &rules,
        );
        assert!(out.is_none());
    }

    #[test]
    fn unknown_name_is_not_optimized() {
        let out = optimize_quest(
            Some(&QuestRequest::Unrecognized("volcano".to_owned())),
            1.0,
            &hero(25, dev_attributes()),
            &OptimizationWeights::default(),
            &GameRules::default(),
        );
        assert!(out.is_none());
    }
}
