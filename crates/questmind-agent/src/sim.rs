//! In-memory game backend implementing both gateway contracts.
//!
//! Used by the binary and the test suite in place of a real chain. State
//! lives in a [`DashMap`] keyed by player; every ledger call mutates it the
//! way the on-chain contract would, so later snapshot reads observe the
//! effect. Failure injection hooks let tests exercise the gateway error and
//! timeout paths.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use dashmap::{DashMap, DashSet};
use tracing::debug;

use questmind_engine::GenerationParams;
use questmind_engine::progression::{next_level_xp, xp_required};
use questmind_types::{Attributes, HeroId, HeroSnapshot, PlayerId, QuestType, RewardBundle};

use crate::error::GatewayError;
use crate::gateway::{GameStateGateway, LedgerGateway, TxReceipt};

/// Backend-side state for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    /// The player's hero.
    pub hero: HeroSnapshot,
    /// Currency balance.
    pub currency: u64,
    /// Heroes minted through summoning.
    pub summoned: u32,
}

impl PlayerRecord {
    const fn new(hero: HeroSnapshot) -> Self {
        Self {
            hero,
            currency: 0,
            summoned: 0,
        }
    }
}

/// The development hero every auto-provisioned player starts with.
pub fn dev_hero() -> HeroSnapshot {
    HeroSnapshot {
        hero_id: HeroId::new(),
        level: 15,
        experience: 1200,
        next_level_xp: 1500,
        stamina: 25,
        max_stamina: 25,
        attributes: Attributes {
            strength: 10,
            agility: 8,
            intelligence: 12,
            wisdom: 9,
            vitality: 11,
            endurance: 10,
            luck: 7,
        },
        quests_completed: 47,
        active_quest: None,
        inventory: vec!["Health Potion".to_owned(), "Mining Pick".to_owned()],
    }
}

/// Simulated chain backend.
#[derive(Debug, Default)]
pub struct SimulatedChain {
    players: DashMap<PlayerId, PlayerRecord>,
    denied: DashSet<PlayerId>,
    auto_provision: bool,
    latency: Duration,
    revert_reason: Mutex<Option<String>>,
    next_tx: AtomicU64,
}

impl SimulatedChain {
    /// An empty backend: unknown players have no hero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that hands every unknown player a copy of [`dev_hero`].
    pub fn with_dev_heroes() -> Self {
        Self {
            auto_provision: true,
            ..Self::default()
        }
    }

    /// Delay every gateway call by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Give `player` the hero `hero`, replacing any existing record.
    pub fn seed(&self, player: PlayerId, hero: HeroSnapshot) {
        self.players.insert(player, PlayerRecord::new(hero));
    }

    /// Make `verify_access` refuse `player`.
    pub fn deny(&self, player: PlayerId) {
        self.denied.insert(player);
    }

    /// Revert every subsequent ledger call with `reason`, or stop doing so.
    pub fn set_revert_reason(&self, reason: Option<String>) {
        *self
            .revert_reason
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = reason;
    }

    /// Current backend state for `player`.
    pub fn record(&self, player: PlayerId) -> Option<PlayerRecord> {
        self.players.get(&player).map(|r| r.clone())
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn ensure_accepting(&self) -> Result<(), GatewayError> {
        let reason = self
            .revert_reason
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        reason.map_or(Ok(()), |r| Err(GatewayError::Reverted(r)))
    }

    fn receipt(&self) -> TxReceipt {
        let n = self.next_tx.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        TxReceipt {
            tx_ref: format!("0x{n:064x}"),
        }
    }

    /// Run `apply` against the player's record as one transaction.
    fn transact(
        &self,
        player: PlayerId,
        apply: impl FnOnce(&mut PlayerRecord) -> Result<(), String>,
    ) -> Result<TxReceipt, GatewayError> {
        self.ensure_accepting()?;
        let mut record = self
            .players
            .get_mut(&player)
            .ok_or_else(|| GatewayError::Reverted("hero not found".to_owned()))?;
        apply(&mut record).map_err(GatewayError::Reverted)?;
        drop(record);
        let receipt = self.receipt();
        debug!(player_id = %player, tx_ref = %receipt.tx_ref, "simulated transaction mined");
        Ok(receipt)
    }
}

impl GameStateGateway for SimulatedChain {
    async fn get_hero_snapshot(&self, player: PlayerId) -> Result<Option<HeroSnapshot>, GatewayError> {
        self.delay().await;
        if self.auto_provision {
            let record = self
                .players
                .entry(player)
                .or_insert_with(|| PlayerRecord::new(dev_hero()));
            return Ok(Some(record.hero.clone()));
        }
        Ok(self.players.get(&player).map(|r| r.hero.clone()))
    }

    async fn verify_access(&self, player: PlayerId) -> Result<bool, GatewayError> {
        self.delay().await;
        Ok(!self.denied.contains(&player))
    }
}

impl LedgerGateway for SimulatedChain {
    async fn start_quest(
        &self,
        player: PlayerId,
        quest_type: QuestType,
        duration: f64,
    ) -> Result<TxReceipt, GatewayError> {
        self.delay().await;
        self.transact(player, |record| {
            if record.hero.is_questing() {
                return Err("hero already on a quest".to_owned());
            }
            if f64::from(record.hero.stamina) < HeroSnapshot::stamina_cost(duration) {
                return Err("insufficient stamina".to_owned());
            }
            record.hero.begin_quest(quest_type, duration, Utc::now());
            Ok(())
        })
    }

    async fn level_up(
        &self,
        player: PlayerId,
        levels: u32,
        distribution: &Attributes,
    ) -> Result<TxReceipt, GatewayError> {
        self.delay().await;
        self.transact(player, |record| {
            let hero = &mut record.hero;
            let cost = xp_required(hero.level, levels).map_err(|e| e.to_string())?;
            if hero.experience < cost {
                return Err("insufficient experience".to_owned());
            }
            let new_level = hero.level.saturating_add(levels);
            hero.gain_levels(levels, cost, distribution, next_level_xp(new_level));
            Ok(())
        })
    }

    async fn collect_rewards(
        &self,
        player: PlayerId,
        rewards: &RewardBundle,
    ) -> Result<TxReceipt, GatewayError> {
        self.delay().await;
        self.transact(player, |record| {
            if !record.hero.is_questing() {
                return Err("no active quest".to_owned());
            }
            record.hero.claim_rewards(rewards);
            record.currency = record.currency.saturating_add(rewards.currency);
            Ok(())
        })
    }

    async fn summon_hero(
        &self,
        player: PlayerId,
        params: &GenerationParams,
    ) -> Result<TxReceipt, GatewayError> {
        self.delay().await;
        debug!(player_id = %player, stat_focus = ?params.stat_focus, "summoning");
        if self.auto_provision {
            self.players
                .entry(player)
                .or_insert_with(|| PlayerRecord::new(dev_hero()));
        }
        self.transact(player, |record| {
            record.summoned = record.summoned.saturating_add(1);
            Ok(())
        })
    }
}
