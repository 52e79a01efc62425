//! Context-aware parameter adjustment using the hero snapshot.

use questmind_types::{Attributes, CommandParams, HeroSnapshot, Intent, QuestRequest, QuestType};

use crate::catalog::affinity;
use crate::rules::GameRules;

/// Affinity score of `attributes` for `quest_type`.
pub fn quest_score(attributes: &Attributes, quest_type: QuestType) -> f64 {
    affinity(quest_type)
        .iter()
        .map(|(attribute, coefficient)| attributes.weight(*attribute) * coefficient)
        .sum()
}

/// Highest-scoring sub-type among the enabled ones, each score scaled by
/// `multiplier`. `None` when `enabled` is empty.
///
/// Ties go to the earliest sub-type in [`QuestType::ALL`], whatever order
/// `enabled` lists them in.
pub fn best_quest(
    attributes: &Attributes,
    multiplier: f64,
    enabled: &[QuestType],
) -> Option<QuestType> {
    let mut best = None;
    let mut best_score = f64::NEG_INFINITY;
    for quest_type in QuestType::ALL.into_iter().filter(|q| enabled.contains(q)) {
        let score = quest_score(attributes, quest_type) * multiplier;
        if best.is_none() || score > best_score {
            best = Some(quest_type);
            best_score = score;
        }
    }
    best
}

/// Adjust raw parameters to what the hero can actually do.
///
/// Only quest commands are touched: a requested duration is lowered to
/// what current stamina affords (never raised), and a missing sub-type is
/// filled with the best affinity match among the enabled sub-types.
pub fn enhance(
    params: CommandParams,
    intent: Intent,
    hero: &HeroSnapshot,
    rules: &GameRules,
) -> CommandParams {
    if intent != Intent::Quest {
        return params;
    }
    let mut params = params;
    if let Some(duration) = params.duration {
        params.duration = Some(duration.min(hero.affordable_hours()));
    }
    if params.quest_type.is_none() {
        params.quest_type =
            best_quest(&hero.attributes, 1.0, &rules.quest_types).map(QuestRequest::Kind);
    }
    params
}

#[cfg(test)]
pub(crate) mod tests {
    use questmind_types::HeroId;

    use super::*;

    pub(crate) fn hero(stamina: u32, attributes: Attributes) -> HeroSnapshot {
        HeroSnapshot {
            hero_id: HeroId::new(),
            level: 15,
            experience: 1200,
            next_level_xp: 1500,
            stamina,
            max_stamina: 25,
            attributes,
            quests_completed: 47,
            active_quest: None,
            inventory: vec!["Health Potion".to_owned(), "Mining Pick".to_owned()],
        }
    }

    pub(crate) fn dev_attributes() -> Attributes {
        Attributes {
            strength: 10,
            agility: 8,
            intelligence: 12,
            wisdom: 9,
            vitality: 11,
            endurance: 10,
            luck: 7,
        }
    }

    fn quest(duration: Option<f64>, quest_type: Option<QuestRequest>) -> CommandParams {
        CommandParams {
            quest_type,
            duration,
            ..CommandParams::default()
        }
    }

    #[test]
    fn duration_is_clamped_to_stamina() {
        for stamina in [0_u32, 3, 10, 25] {
            for requested in [0.5, 1.0, 2.0, 5.0, 12.0] {
                let out = enhance(
                    quest(Some(requested), Some(QuestType::Mining.into())),
                    Intent::Quest,
                    &hero(stamina, dev_attributes()),
                    &GameRules::default(),
                );
                let expected = requested.min(f64::from(stamina) / 5.0);
                assert!(out.duration.is_some_and(|d| (d - expected).abs() < 1e-9));
            }
        }
    }

    #[test]
    fn missing_sub_type_is_filled_from_attributes() {
        // dev hero: mining 10.0, gardening 9.9, fishing 7.5, combat 9.7
        let out = enhance(
            quest(None, None),
            Intent::Quest,
            &hero(25, dev_attributes()),
            &GameRules::default(),
        );
        assert_eq!(out.quest_type, Some(QuestRequest::Kind(QuestType::Mining)));
        assert_eq!(out.duration, None);
    }

    #[test]
    fn missing_sub_type_is_filled_from_enabled_types_only() {
        let rules = GameRules {
            quest_types: vec![QuestType::Combat, QuestType::Fishing],
            ..GameRules::default()
        };
        // dev hero prefers mining, then gardening, then combat
        let out = enhance(quest(None, None), Intent::Quest, &hero(25, dev_attributes()), &rules);
        assert_eq!(out.quest_type, Some(QuestRequest::Kind(QuestType::Combat)));

        let rules = GameRules {
            quest_types: Vec::new(),
            ..GameRules::default()
        };
        let out = enhance(quest(None, None), Intent::Quest, &hero(25, dev_attributes()), &rules);
        assert_eq!(out.quest_type, None);
    }

    #[test]
    fn ties_go_to_enumeration_order() {
        // mining = 0.6*10 + 0.4*10 = 10; fishing = 0.5*10 + 0.5*10 = 10
        let attrs = Attributes {
            strength: 10,
            endurance: 10,
            agility: 10,
            luck: 10,
            ..Attributes::default()
        };
        assert_eq!(best_quest(&attrs, 1.0, &QuestType::ALL), Some(QuestType::Mining));

        // gardening = 0.7*10 + 0.3*10 = 10 equals fishing; gardening is earlier
        let attrs = Attributes {
            wisdom: 10,
            intelligence: 10,
            agility: 10,
            luck: 10,
            ..Attributes::default()
        };
        assert_eq!(best_quest(&attrs, 1.0, &QuestType::ALL), Some(QuestType::Gardening));
        // listing order of the enabled set does not change the tie-break
        let enabled = [QuestType::Fishing, QuestType::Gardening];
        assert_eq!(best_quest(&attrs, 1.0, &enabled), Some(QuestType::Gardening));
    }

    #[test]
    fn non_quest_intents_pass_through() {
        let params = CommandParams {
            target_level: Some(20),
            ..CommandParams::default()
        };
        let out = enhance(
            params.clone(),
            Intent::LevelUp,
            &hero(0, dev_attributes()),
            &GameRules::default(),
        );
        assert_eq!(out, params);
    }

    #[test]
    fn explicit_request_is_kept() {
        let out = enhance(
            quest(Some(1.0), Some(QuestRequest::Auto)),
            Intent::Quest,
            &hero(25, dev_attributes()),
            &GameRules::default(),
        );
        assert_eq!(out.quest_type, Some(QuestRequest::Auto));
    }
}
