//! Precondition checks run before any mutating action.
//!
//! A failed check is an expected outcome, returned as a [`Rejection`] value
//! carrying both the player-facing message and the structured reason.

use chrono::{DateTime, Utc};

use questmind_types::{
    CommandParams, CommandResult, FailureReason, HeroSnapshot, Intent, QuestRequest,
};

use crate::progression::{levels_to_gain, xp_required};
use crate::rules::GameRules;

/// A failed precondition.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Player-facing explanation.
    pub message: String,
    /// Structured reason.
    pub reason: FailureReason,
}

impl Rejection {
    /// Pair a message with its reason.
    pub fn new(message: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            message: message.into(),
            reason,
        }
    }

    /// Convert into a failed [`CommandResult`].
    pub fn into_result(self) -> CommandResult {
        CommandResult::failed(self.message, self.reason)
    }
}

/// Check the domain rules for `intent` against the hero at `now`.
///
/// Intents without preconditions always pass; dispatching them is the
/// orchestrator's concern.
pub fn validate(
    intent: Intent,
    params: &CommandParams,
    hero: &HeroSnapshot,
    rules: &GameRules,
    now: DateTime<Utc>,
) -> Result<(), Rejection> {
    match intent {
        Intent::Quest => validate_quest(params, hero, rules),
        Intent::LevelUp => validate_level_up(params, hero, rules),
        Intent::CollectRewards => validate_collect(hero, now),
        Intent::CheckStatus | Intent::BuyItems | Intent::Unknown => Ok(()),
    }
}

fn validate_quest(
    params: &CommandParams,
    hero: &HeroSnapshot,
    rules: &GameRules,
) -> Result<(), Rejection> {
    let requested = match &params.quest_type {
        Some(QuestRequest::Kind(kind)) if !rules.allows(*kind) => Some(kind.as_str().to_owned()),
        Some(QuestRequest::Unrecognized(raw)) => Some(raw.clone()),
        Some(QuestRequest::Auto) if rules.quest_types.is_empty() => Some("auto".to_owned()),
        None if rules.quest_types.is_empty() => Some(String::new()),
        Some(QuestRequest::Kind(_) | QuestRequest::Auto) | None => None,
    };
    if let Some(requested) = requested {
        let allowed: Vec<&str> = rules.quest_types.iter().map(|q| q.as_str()).collect();
        return Err(Rejection::new(
            format!("Invalid quest type. Must be one of: {}", allowed.join(", ")),
            FailureReason::InvalidQuestType {
                requested,
                allowed: rules.quest_types.clone(),
            },
        ));
    }

    let duration = params.duration_or_default();
    if !(rules.min_quest_duration..=rules.max_quest_duration).contains(&duration) {
        return Err(Rejection::new(
            format!(
                "Quest duration must be between {} and {} hours",
                rules.min_quest_duration, rules.max_quest_duration
            ),
            FailureReason::InvalidDuration {
                requested: duration,
                min: rules.min_quest_duration,
                max: rules.max_quest_duration,
            },
        ));
    }

    if let Some(active) = &hero.active_quest {
        return Err(Rejection::new(
            "Hero is already on a quest",
            FailureReason::QuestInProgress {
                quest_type: active.quest_type,
                expected_completion: active.expected_completion,
            },
        ));
    }

    let required = HeroSnapshot::stamina_cost(duration);
    if f64::from(hero.stamina) < required {
        return Err(Rejection::new(
            format!(
                "Not enough stamina. Required: {required}, Available: {}",
                hero.stamina
            ),
            FailureReason::InsufficientStamina {
                required,
                available: hero.stamina,
            },
        ));
    }
    Ok(())
}

fn validate_level_up(
    params: &CommandParams,
    hero: &HeroSnapshot,
    rules: &GameRules,
) -> Result<(), Rejection> {
    if hero.level >= rules.max_level {
        return Err(Rejection::new(
            format!("Hero is already at maximum level ({})", rules.max_level),
            FailureReason::MaxLevelReached {
                current_level: hero.level,
                max_level: rules.max_level,
            },
        ));
    }

    if let Some(target) = params.target_level.filter(|t| *t <= hero.level) {
        return Err(Rejection::new(
            format!(
                "Target level ({target}) must be higher than current level ({})",
                hero.level
            ),
            FailureReason::TargetLevelNotHigher {
                current_level: hero.level,
                target_level: target,
            },
        ));
    }

    let levels = levels_to_gain(hero.level, params.target_level, rules.max_level);
    let required = xp_required(hero.level, levels).unwrap_or(u64::MAX);
    if hero.experience < required {
        return Err(Rejection::new(
            format!(
                "Not enough experience points. Required: {required}, Available: {}",
                hero.experience
            ),
            FailureReason::InsufficientExperience {
                required,
                available: hero.experience,
            },
        ));
    }
    Ok(())
}

fn validate_collect(hero: &HeroSnapshot, now: DateTime<Utc>) -> Result<(), Rejection> {
    let Some(active) = &hero.active_quest else {
        return Err(Rejection::new(
            "No active quest to collect rewards from",
            FailureReason::NoActiveQuest,
        ));
    };
    if let Some(remaining) = active.remaining(now) {
        let minutes = remaining.num_minutes();
        return Err(Rejection::new(
            format!("Quest still in progress. {minutes} minutes remaining"),
            FailureReason::QuestNotFinished {
                quest_type: active.quest_type,
                expected_completion: active.expected_completion,
                remaining_seconds: remaining.num_seconds(),
            },
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use questmind_types::{ActiveQuest, Attributes, OptimizationWeights, QuestType};

    use super::*;
    use crate::enhance::enhance;
    use crate::enhance::tests::{dev_attributes, hero};
    use crate::optimize::optimize_quest;
    use crate::parse::parse;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(1)
    }

    fn quest(kind: QuestRequest, duration: f64) -> CommandParams {
        CommandParams {
            quest_type: Some(kind),
            duration: Some(duration),
            ..CommandParams::default()
        }
    }

    fn reason(outcome: Result<(), Rejection>) -> Option<FailureReason> {
        outcome.err().map(|r| r.reason)
    }

    #[test]
    fn valid_quest_passes() {
        let params = quest(QuestType::Mining.into(), 3.0);
        let out = validate(Intent::Quest, &params, &hero(25, dev_attributes()), &GameRules::default(), now());
        assert!(out.is_ok());
    }

    #[test]
    fn unknown_or_disabled_quest_type_is_rejected() {
        let h = hero(25, dev_attributes());
        let params = quest(QuestRequest::Unrecognized("volcano".to_owned()), 2.0);
        let out = reason(validate(Intent::Quest, &params, &h, &GameRules::default(), now()));
        assert!(matches!(out, Some(FailureReason::InvalidQuestType { requested, .. }) if requested == "volcano"));

        let rules = GameRules {
            quest_types: vec![QuestType::Mining],
            ..GameRules::default()
        };
        let params = quest(QuestType::Combat.into(), 2.0);
        let out = reason(validate(Intent::Quest, &params, &h, &rules, now()));
        assert!(matches!(out, Some(FailureReason::InvalidQuestType { .. })));
    }

    #[test]
    fn auto_passes_type_check() {
        let params = quest(QuestRequest::Auto, 1.0);
        let out = validate(Intent::Quest, &params, &hero(25, dev_attributes()), &GameRules::default(), now());
        assert!(out.is_ok());
    }

    #[test]
    fn auto_and_missing_type_resolve_within_enabled_types() {
        let attrs = Attributes {
            intelligence: 30,
            wisdom: 30,
            ..Attributes::default()
        };
        let h = hero(25, attrs);
        let rules = GameRules {
            quest_types: vec![QuestType::Mining],
            ..GameRules::default()
        };

        let params = enhance(parse("start quest, best quest for 1 hour").params, Intent::Quest, &h, &rules);
        assert_eq!(params.quest_type, Some(QuestRequest::Auto));
        assert!(validate(Intent::Quest, &params, &h, &rules, now()).is_ok());
        let plan = optimize_quest(params.quest_type.as_ref(), 1.0, &h, &OptimizationWeights::default(), &rules);
        assert_eq!(plan.map(|p| p.quest_type), Some(QuestType::Mining));

        let params = enhance(parse("start quest for 1 hour").params, Intent::Quest, &h, &rules);
        assert_eq!(params.quest_type, Some(QuestRequest::Kind(QuestType::Mining)));
        assert!(validate(Intent::Quest, &params, &h, &rules, now()).is_ok());
    }

    #[test]
    fn auto_is_rejected_when_nothing_is_enabled() {
        let rules = GameRules {
            quest_types: Vec::new(),
            ..GameRules::default()
        };
        let out = reason(validate(Intent::Quest, &quest(QuestRequest::Auto, 1.0), &hero(25, dev_attributes()), &rules, now()));
        assert!(matches!(out, Some(FailureReason::InvalidQuestType { requested, .. }) if requested == "auto"));
    }

    #[test]
    fn duration_bounds() {
        let h = hero(200, dev_attributes());
        for bad in [0.5, 24.5, f64::NAN] {
            let out = reason(validate(Intent::Quest, &quest(QuestType::Mining.into(), bad), &h, &GameRules::default(), now()));
            assert!(matches!(out, Some(FailureReason::InvalidDuration { .. })));
        }
    }

    #[test]
    fn active_quest_blocks_second_quest() {
        let mut h = hero(25, dev_attributes());
        h.active_quest = Some(ActiveQuest::begin(QuestType::Fishing, 2.0, now()));
        let out = reason(validate(Intent::Quest, &quest(QuestType::Mining.into(), 1.0), &h, &GameRules::default(), now()));
        assert!(matches!(out, Some(FailureReason::QuestInProgress { quest_type: QuestType::Fishing, .. })));
    }

    #[test]
    fn stamina_must_cover_duration() {
        let h = hero(10, dev_attributes());
        let out = validate(Intent::Quest, &quest(QuestType::Mining.into(), 3.0), &h, &GameRules::default(), now());
        let rejection = out.err();
        assert_eq!(
            rejection.as_ref().map(|r| r.message.as_str()),
            Some("Not enough stamina. Required: 15, Available: 10")
        );
        assert!(rejection.is_some_and(|r| r.reason.is_retryable()));
    }

    #[test]
    fn level_ceiling_and_target() {
        let mut h = hero(25, dev_attributes());
        h.level = 100;
        let out = reason(validate(Intent::LevelUp, &CommandParams::default(), &h, &GameRules::default(), now()));
        assert!(matches!(out, Some(FailureReason::MaxLevelReached { .. })));

        h.level = 15;
        let params = CommandParams {
            target_level: Some(15),
            ..CommandParams::default()
        };
        let out = reason(validate(Intent::LevelUp, &params, &h, &GameRules::default(), now()));
        assert!(matches!(out, Some(FailureReason::TargetLevelNotHigher { target_level: 15, .. })));
    }

    #[test]
    fn level_up_needs_enough_experience() {
        let mut h = hero(25, dev_attributes());
        h.level = 3;
        h.experience = 449;
        // 50 * 9 = 450
        let out = reason(validate(Intent::LevelUp, &CommandParams::default(), &h, &GameRules::default(), now()));
        assert_eq!(out, Some(FailureReason::InsufficientExperience { required: 450, available: 449 }));

        h.experience = 450;
        assert!(validate(Intent::LevelUp, &CommandParams::default(), &h, &GameRules::default(), now()).is_ok());
    }

    #[test]
    fn collect_requires_finished_quest() {
        let mut h = hero(25, dev_attributes());
        let out = reason(validate(Intent::CollectRewards, &CommandParams::default(), &h, &GameRules::default(), now()));
        assert_eq!(out, Some(FailureReason::NoActiveQuest));

        let start = now() - TimeDelta::minutes(30);
        h.active_quest = Some(ActiveQuest::begin(QuestType::Mining, 1.0, start));
        let out = reason(validate(Intent::CollectRewards, &CommandParams::default(), &h, &GameRules::default(), now()));
        assert!(matches!(out, Some(FailureReason::QuestNotFinished { remaining_seconds: 1800, .. })));

        let out = validate(
            Intent::CollectRewards,
            &CommandParams::default(),
            &h,
            &GameRules::default(),
            now() + TimeDelta::minutes(30),
        );
        assert!(out.is_ok());
    }
}
