//! Execution orchestrator: one instruction from text to ledger transaction.
//!
//! Pipeline per instruction:
//! 1. Length check
//! 2. Parse into intent and parameters
//! 3. Access check for mutating intents
//! 4. Hero snapshot from the cache, else from the game-state gateway
//! 5. Context enhancement (stamina clamp, quest auto-selection)
//! 6. Precondition validation
//! 7. Ledger transaction
//! 8. Optimistic cache update and optimization weight update
//!
//! Every outcome, including gateway failures, comes back as a
//! [`CommandResult`]. Early exits travel as [`Rejection`]s internally.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use questmind_engine::progression::{distribute_stats, levels_to_gain, next_level_xp, xp_required};
use questmind_engine::{
    GameRules, GenerationParams, Outcome, Rejection, enhance, generate, optimize_quest, parse,
    rewards, validate,
};
use questmind_types::{
    CollectionReport, CommandParams, CommandPayload, CommandResult, FailureReason, HeroSnapshot,
    Intent, LevelUpReport, PlayerId, QuestStartReport, SummonOptions, SummonReport, add_hours,
};

use crate::cache::GameStateCache;
use crate::error::GatewayError;
use crate::gateway::{GameStateGateway, LedgerGateway};
use crate::weight_store::{WeightPersistence, WeightStore};

/// Outcome recorded for every successful mutating action.
const SUCCESS_RATE: f64 = 1.0;

type Step<T> = Result<T, Rejection>;

/// Runs instructions against the game backend.
pub struct Orchestrator<S, L, P> {
    state: Arc<S>,
    ledger: Arc<L>,
    cache: GameStateCache,
    weights: WeightStore<P>,
    rules: GameRules,
    max_instruction_length: usize,
}

impl<S, L, P> Orchestrator<S, L, P>
where
    S: GameStateGateway,
    L: LedgerGateway,
    P: WeightPersistence,
{
    /// Wire the orchestrator to its collaborators.
    pub const fn new(
        state: Arc<S>,
        ledger: Arc<L>,
        cache: GameStateCache,
        weights: WeightStore<P>,
        rules: GameRules,
        max_instruction_length: usize,
    ) -> Self {
        Self {
            state,
            ledger,
            cache,
            weights,
            rules,
            max_instruction_length,
        }
    }

    /// The shared hero snapshot cache.
    pub const fn cache(&self) -> &GameStateCache {
        &self.cache
    }

    /// The shared optimization weights.
    pub const fn weights(&self) -> &WeightStore<P> {
        &self.weights
    }

    /// Game rules in force.
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Interpret and execute one instruction for `player`.
    ///
    /// `rng` drives reward rolls. Callers serialize instructions per player;
    /// this method does not.
    pub async fn process<R: Rng + Send>(
        &self,
        player: PlayerId,
        text: &str,
        rng: &mut R,
    ) -> CommandResult {
        self.try_process(player, text, rng)
            .await
            .unwrap_or_else(Rejection::into_result)
    }

    /// Generate a new hero for `player` and mint it on the ledger.
    pub async fn summon_hero<R: Rng + Send>(
        &self,
        player: PlayerId,
        options: &SummonOptions,
        rng: &mut R,
    ) -> CommandResult {
        self.try_summon(player, options, rng)
            .await
            .unwrap_or_else(Rejection::into_result)
    }

    async fn try_process<R: Rng + Send>(
        &self,
        player: PlayerId,
        text: &str,
        rng: &mut R,
    ) -> Step<CommandResult> {
        let length = text.chars().count();
        if length > self.max_instruction_length {
            return Err(Rejection::new(
                format!(
                    "Instruction too long ({length} characters, maximum {})",
                    self.max_instruction_length
                ),
                FailureReason::InstructionTooLong {
                    length,
                    max: self.max_instruction_length,
                },
            ));
        }

        let parsed = parse(text);
        let intent = parsed.intent;
        info!(player_id = %player, intent = %intent, "instruction parsed");

        if intent == Intent::Unknown {
            return Err(Rejection::new(
                "Unknown command type",
                FailureReason::UnrecognizedCommand,
            ));
        }
        if intent.is_mutating() {
            self.ensure_access(player).await?;
        }
        if intent == Intent::BuyItems {
            return Err(Rejection::new(
                "Buying items is not supported yet",
                FailureReason::UnsupportedCommand { intent },
            ));
        }

        let hero = self.hero(player).await?;
        let params = enhance(parsed.params, intent, &hero, &self.rules);
        debug!(player_id = %player, intent = %intent, ?params, "parameters enhanced");
        validate(intent, &params, &hero, &self.rules, Utc::now())?;

        match intent {
            Intent::Quest => self.start_quest(player, &params, &hero).await,
            Intent::LevelUp => self.level_up(player, &params, &hero).await,
            Intent::CollectRewards => self.collect_rewards(player, &hero, rng).await,
            Intent::CheckStatus => Ok(CommandResult::completed(
                "Hero status retrieved",
                CommandPayload::Status(hero),
            )),
            Intent::BuyItems | Intent::Unknown => Err(Rejection::new(
                "Unknown command type",
                FailureReason::UnrecognizedCommand,
            )),
        }
    }

    async fn start_quest(
        &self,
        player: PlayerId,
        params: &CommandParams,
        hero: &HeroSnapshot,
    ) -> Step<CommandResult> {
        let requested = params.duration_or_default();
        let weights = self.weights.current();
        let Some(plan) =
            optimize_quest(params.quest_type.as_ref(), requested, hero, &weights, &self.rules)
        else {
            let requested = params
                .quest_type
                .as_ref()
                .map_or_else(String::new, ToString::to_string);
            return Err(Rejection::new(
                "Invalid quest type",
                FailureReason::InvalidQuestType {
                    requested,
                    allowed: self.rules.quest_types.clone(),
                },
            ));
        };

        let receipt = self
            .ledger
            .start_quest(player, plan.quest_type, plan.duration)
            .await
            .map_err(|e| gateway_failure("Failed to start quest", player, &e))?;

        let now = Utc::now();
        let stamina_spent = HeroSnapshot::stamina_spent(plan.duration).min(hero.stamina);
        let expected_completion = add_hours(now, plan.duration);
        if !self.cache.update(player, |h| {
            h.begin_quest(plan.quest_type, plan.duration, now);
        }) {
            debug!(player_id = %player, "no cached snapshot to update after quest start");
        }

        let expected_rewards =
            rewards::estimate(plan.quest_type, plan.duration, hero.level, &hero.attributes);
        self.weights.update(Outcome {
            success_rate: SUCCESS_RATE,
            reward_efficiency: ratio(plan.duration, requested),
        }).await;

        info!(
            player_id = %player,
            quest_type = %plan.quest_type,
            duration_hours = plan.duration,
            optimization_applied = plan.optimization_applied,
            tx_ref = %receipt.tx_ref,
            "quest started"
        );
        Ok(CommandResult::completed(
            format!(
                "Quest started successfully. Type: {}, Duration: {} hours",
                plan.quest_type, plan.duration
            ),
            CommandPayload::QuestStarted(QuestStartReport {
                hero_id: hero.hero_id,
                quest_type: plan.quest_type,
                duration_hours: plan.duration,
                stamina_spent,
                expected_completion,
                expected_rewards,
                tx_ref: receipt.tx_ref,
                optimization_applied: plan.optimization_applied,
            }),
        ))
    }

    async fn level_up(
        &self,
        player: PlayerId,
        params: &CommandParams,
        hero: &HeroSnapshot,
    ) -> Step<CommandResult> {
        let levels = levels_to_gain(hero.level, params.target_level, self.rules.max_level);
        let experience_used = xp_required(hero.level, levels).map_err(|e| {
            Rejection::new(
                format!("Failed to level up hero: {e}"),
                FailureReason::Fault {
                    category: "arithmetic".to_owned(),
                    message: e.to_string(),
                },
            )
        })?;
        let stat_increases = distribute_stats(levels, params.focus_skill);

        let receipt = self
            .ledger
            .level_up(player, levels, &stat_increases)
            .await
            .map_err(|e| gateway_failure("Failed to level up hero", player, &e))?;

        let new_level = hero.level.saturating_add(levels);
        let next_xp = next_level_xp(new_level);
        self.cache.update(player, |h| {
            h.gain_levels(levels, experience_used, &stat_increases, next_xp);
        });
        self.weights.update(Outcome {
            success_rate: SUCCESS_RATE,
            reward_efficiency: 1.0,
        }).await;

        info!(
            player_id = %player,
            previous_level = hero.level,
            new_level,
            tx_ref = %receipt.tx_ref,
            "hero leveled up"
        );
        Ok(CommandResult::completed(
            format!(
                "Hero leveled up successfully from level {} to {new_level}",
                hero.level
            ),
            CommandPayload::LevelUp(LevelUpReport {
                hero_id: hero.hero_id,
                previous_level: hero.level,
                new_level,
                experience_used,
                experience_remaining: hero.experience.saturating_sub(experience_used),
                stat_increases,
                new_attributes: hero.attributes.plus(&stat_increases),
                tx_ref: receipt.tx_ref,
            }),
        ))
    }

    async fn collect_rewards<R: Rng + Send>(
        &self,
        player: PlayerId,
        hero: &HeroSnapshot,
        rng: &mut R,
    ) -> Step<CommandResult> {
        let Some(quest) = hero.active_quest.as_ref() else {
            return Err(Rejection::new(
                "No active quest to collect rewards from",
                FailureReason::NoActiveQuest,
            ));
        };
        let (quest_type, duration) = (quest.quest_type, quest.duration_hours);
        let realized = rewards::realize(quest_type, duration, hero.level, &hero.attributes, rng);

        let receipt = self
            .ledger
            .collect_rewards(player, &realized)
            .await
            .map_err(|e| gateway_failure("Failed to collect rewards", player, &e))?;

        self.cache.update(player, |h| h.claim_rewards(&realized));
        let expected = rewards::estimate(quest_type, duration, hero.level, &hero.attributes);
        self.weights.update(Outcome {
            success_rate: SUCCESS_RATE,
            reward_efficiency: rewards::efficiency(&realized, &expected),
        }).await;

        info!(
            player_id = %player,
            quest_type = %quest_type,
            experience = realized.experience,
            currency = realized.currency,
            rare_item = ?realized.rare_item,
            tx_ref = %receipt.tx_ref,
            "rewards collected"
        );
        Ok(CommandResult::completed(
            format!("Rewards collected successfully from {quest_type} quest"),
            CommandPayload::RewardsCollected(CollectionReport {
                hero_id: hero.hero_id,
                quest_type,
                rewards: realized,
                quests_completed: hero.quests_completed.saturating_add(1),
                tx_ref: receipt.tx_ref,
            }),
        ))
    }

    async fn try_summon<R: Rng + Send>(
        &self,
        player: PlayerId,
        options: &SummonOptions,
        rng: &mut R,
    ) -> Step<CommandResult> {
        self.ensure_access(player).await?;
        let params = GenerationParams::from_options(options);
        let hero = generate(&params, rng).map_err(|e| {
            Rejection::new(
                format!("Failed to summon hero: {e}"),
                FailureReason::Fault {
                    category: "generation".to_owned(),
                    message: e.to_string(),
                },
            )
        })?;
        let receipt = self
            .ledger
            .summon_hero(player, &params)
            .await
            .map_err(|e| gateway_failure("Failed to summon hero", player, &e))?;

        info!(
            player_id = %player,
            class = %hero.class,
            rarity = %hero.rarity,
            tx_ref = %receipt.tx_ref,
            "hero summoned"
        );
        Ok(CommandResult::completed(
            "New hero summoned successfully",
            CommandPayload::HeroSummoned(SummonReport {
                hero,
                tx_ref: receipt.tx_ref,
            }),
        ))
    }

    async fn ensure_access(&self, player: PlayerId) -> Step<()> {
        match self.state.verify_access(player).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(player_id = %player, "access denied");
                Err(Rejection::new(
                    "Access denied for this hero",
                    FailureReason::AccessDenied,
                ))
            }
            Err(e) => Err(gateway_failure("Failed to verify access", player, &e)),
        }
    }

    async fn hero(&self, player: PlayerId) -> Step<HeroSnapshot> {
        if let Some(hero) = self.cache.get(player) {
            return Ok(hero);
        }
        match self.state.get_hero_snapshot(player).await {
            Ok(Some(hero)) => {
                self.cache.put(player, hero.clone());
                Ok(hero)
            }
            Ok(None) => Err(Rejection::new("No heroes found", FailureReason::HeroNotFound)),
            Err(e) => Err(gateway_failure("Failed to get hero status", player, &e)),
        }
    }
}

fn gateway_failure(context: &str, player: PlayerId, error: &GatewayError) -> Rejection {
    warn!(player_id = %player, error = %error, "{context}");
    Rejection::new(
        format!("{context}: {error}"),
        FailureReason::GatewayFailure {
            message: error.to_string(),
        },
    )
}

/// `part / whole` clamped to `[0, 1]`; an empty whole counts as fully met.
fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeDelta;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use questmind_types::{ActiveQuest, QuestType};

    use super::*;
    use crate::sim::{SimulatedChain, dev_hero};
    use crate::weight_store::Ephemeral;

    type SimOrchestrator = Orchestrator<SimulatedChain, SimulatedChain, Ephemeral>;

    fn setup(hero: Option<HeroSnapshot>) -> (Arc<SimulatedChain>, SimOrchestrator, PlayerId) {
        let chain = Arc::new(SimulatedChain::new());
        let player = PlayerId::new();
        if let Some(hero) = hero {
            chain.seed(player, hero);
        }
        let orchestrator = Orchestrator::new(
            Arc::clone(&chain),
            Arc::clone(&chain),
            GameStateCache::new(Duration::from_secs(300)),
            WeightStore::open(Ephemeral),
            GameRules::default(),
            500,
        );
        (chain, orchestrator, player)
    }

    fn reason(result: &CommandResult) -> Option<&FailureReason> {
        result.failure()
    }

    #[tokio::test]
    async fn quest_start_updates_cache_and_weights() {
        let (chain, orch, player) = setup(Some(dev_hero()));
        let mut rng = SmallRng::seed_from_u64(1);
        let out = orch.process(player, "start mining quest for 3 hours", &mut rng).await;

        let report = match &out {
            CommandResult::Completed {
                data: CommandPayload::QuestStarted(report),
                ..
            } => Some(report),
            _ => None,
        };
        assert!(report.is_some(), "unexpected result: {out:?}");
        let Some(report) = report else { return };
        assert_eq!(report.quest_type, QuestType::Mining);
        // stamina 25 with default weights: max(1, 5 * 0.1 * 2) caps at 1h
        assert!((report.duration_hours - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.stamina_spent, 5);
        assert!(report.optimization_applied);

        let cached = orch.cache().get(player);
        assert_eq!(cached.as_ref().map(|h| h.stamina), Some(20));
        assert!(cached.is_some_and(|h| h.is_questing()));
        assert!(chain.record(player).is_some_and(|r| r.hero.is_questing()));

        let weights = orch.weights().current();
        assert!((weights.quest_success_rate - 0.46).abs() < 1e-12);
    }

    #[tokio::test]
    async fn second_quest_fails_validation_from_cache() {
        let (_chain, orch, player) = setup(Some(dev_hero()));
        let mut rng = SmallRng::seed_from_u64(2);
        let first = orch.process(player, "start fishing for 1 hour", &mut rng).await;
        assert!(first.is_success());
        let second = orch.process(player, "start mining for 1 hour", &mut rng).await;
        assert!(matches!(
            reason(&second),
            Some(FailureReason::QuestInProgress {
                quest_type: QuestType::Fishing,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unknown_and_unsupported_commands() {
        let (_chain, orch, player) = setup(Some(dev_hero()));
        let mut rng = SmallRng::seed_from_u64(3);
        let out = orch.process(player, "dance wildly", &mut rng).await;
        assert_eq!(reason(&out), Some(&FailureReason::UnrecognizedCommand));

        let out = orch.process(player, "buy item health potion x 3", &mut rng).await;
        assert_eq!(
            reason(&out),
            Some(&FailureReason::UnsupportedCommand {
                intent: Intent::BuyItems
            })
        );
    }

    #[tokio::test]
    async fn overlong_instruction_is_rejected_before_parsing() {
        let (_chain, orch, player) = setup(Some(dev_hero()));
        let text = "a".repeat(501);
        let out = orch.process(player, &text, &mut SmallRng::seed_from_u64(4)).await;
        assert_eq!(
            reason(&out),
            Some(&FailureReason::InstructionTooLong {
                length: 501,
                max: 500
            })
        );
    }

    #[tokio::test]
    async fn missing_hero_and_denied_access() {
        let (chain, orch, player) = setup(None);
        let mut rng = SmallRng::seed_from_u64(5);
        let out = orch.process(player, "check status", &mut rng).await;
        assert_eq!(reason(&out), Some(&FailureReason::HeroNotFound));

        chain.seed(player, dev_hero());
        chain.deny(player);
        let out = orch.process(player, "start mining for 1 hour", &mut rng).await;
        assert_eq!(reason(&out), Some(&FailureReason::AccessDenied));
        // read-only intents skip the access check
        assert!(orch.process(player, "check status", &mut rng).await.is_success());
    }

    #[tokio::test]
    async fn gateway_revert_becomes_structured_failure() {
        let (chain, orch, player) = setup(Some(dev_hero()));
        chain.set_revert_reason(Some("nonce too low".to_owned()));
        let out = orch
            .process(player, "start mining for 1 hour", &mut SmallRng::seed_from_u64(6))
            .await;
        assert!(
            matches!(reason(&out), Some(FailureReason::GatewayFailure { message }) if message.contains("nonce too low")),
            "unexpected result: {out:?}"
        );
        assert!(out.message().starts_with("Failed to start quest"));
        assert_eq!(orch.weights().current(), questmind_types::OptimizationWeights::default());
    }

    #[tokio::test]
    async fn level_up_spends_experience() {
        let mut hero = dev_hero();
        hero.level = 3;
        hero.experience = 1000;
        let (chain, orch, player) = setup(Some(hero));
        let out = orch
            .process(player, "level up focus strength", &mut SmallRng::seed_from_u64(7))
            .await;
        let report = match &out {
            CommandResult::Completed {
                data: CommandPayload::LevelUp(report),
                ..
            } => Some(report),
            _ => None,
        };
        assert!(report.is_some(), "unexpected result: {out:?}");
        let Some(report) = report else { return };
        assert_eq!((report.previous_level, report.new_level), (3, 4));
        assert_eq!(report.experience_used, 450);
        assert_eq!(report.experience_remaining, 550);
        assert_eq!(report.stat_increases.strength, 3);
        assert_eq!(report.stat_increases.total(), 5);
        assert_eq!(chain.record(player).map(|r| r.hero.level), Some(4));
        assert_eq!(orch.cache().get(player).map(|h| h.next_level_xp), Some(800));
    }

    #[tokio::test]
    async fn finished_quest_rewards_are_collected() {
        let mut hero = dev_hero();
        let start = Utc::now() - TimeDelta::hours(3);
        hero.active_quest = Some(ActiveQuest::begin(QuestType::Mining, 2.0, start));
        let (chain, orch, player) = setup(Some(hero));

        let out = orch
            .process(player, "collect rewards", &mut SmallRng::seed_from_u64(8))
            .await;
        let report = match &out {
            CommandResult::Completed {
                data: CommandPayload::RewardsCollected(report),
                ..
            } => Some(report),
            _ => None,
        };
        assert!(report.is_some(), "unexpected result: {out:?}");
        let Some(report) = report else { return };
        assert_eq!(report.quest_type, QuestType::Mining);
        assert_eq!(report.quests_completed, 48);
        assert!(report.rewards.experience > 0);

        let record = chain.record(player);
        assert_eq!(record.as_ref().map(|r| r.currency), Some(report.rewards.currency));
        assert!(record.is_some_and(|r| !r.hero.is_questing()));
        assert!(orch.cache().get(player).is_some_and(|h| !h.is_questing()));
    }

    #[tokio::test]
    async fn unfinished_quest_cannot_be_collected() {
        let mut hero = dev_hero();
        hero.active_quest = Some(ActiveQuest::begin(QuestType::Fishing, 2.0, Utc::now()));
        let (_chain, orch, player) = setup(Some(hero));
        let out = orch
            .process(player, "claim rewards", &mut SmallRng::seed_from_u64(9))
            .await;
        assert!(matches!(reason(&out), Some(FailureReason::QuestNotFinished { .. })));
        assert!(out.failure().is_some_and(FailureReason::is_retryable));
    }

    #[tokio::test]
    async fn summon_generates_and_mints() {
        let (chain, orch, player) = setup(Some(dev_hero()));
        let options = SummonOptions {
            class_preference: Some(questmind_types::HeroClass::Priest),
            ..SummonOptions::default()
        };
        let out = orch
            .summon_hero(player, &options, &mut SmallRng::seed_from_u64(10))
            .await;
        assert!(matches!(
            &out,
            CommandResult::Completed {
                data: CommandPayload::HeroSummoned(_),
                ..
            }
        ));
        assert_eq!(chain.record(player).map(|r| r.summoned), Some(1));
    }

    #[test]
    fn ratio_is_clamped() {
        assert!((ratio(1.0, 3.0) - 1.0 / 3.0).abs() < 1e-12);
        assert!((ratio(4.0, 2.0) - 1.0).abs() < f64::EPSILON);
        assert!((ratio(1.0, 0.0) - 1.0).abs() < f64::EPSILON);
    }
}
