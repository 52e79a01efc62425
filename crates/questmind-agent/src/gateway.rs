//! Boundary contracts for the game backend.
//!
//! [`GameStateGateway`] reads hero state, [`LedgerGateway`] submits
//! state-changing transactions. Both are async and fallible; the
//! orchestrator turns every [`GatewayError`] into a structured
//! `gateway_failure` result rather than propagating it.
//!
//! The traits return `impl Future + Send` so the orchestrator stays generic
//! over its collaborators without boxing.

use std::future::Future;

use questmind_engine::GenerationParams;
use questmind_types::{Attributes, HeroSnapshot, PlayerId, QuestType, RewardBundle};

use crate::error::GatewayError;

/// Acknowledgement of an accepted ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Opaque transaction reference.
    pub tx_ref: String,
}

/// Read access to live hero state.
pub trait GameStateGateway: Send + Sync + 'static {
    /// Current hero state, or `None` if the player has no hero.
    fn get_hero_snapshot(
        &self,
        player: PlayerId,
    ) -> impl Future<Output = Result<Option<HeroSnapshot>, GatewayError>> + Send;

    /// Whether `player` may act on their hero.
    fn verify_access(
        &self,
        player: PlayerId,
    ) -> impl Future<Output = Result<bool, GatewayError>> + Send;
}

/// State-changing transactions against the game ledger.
pub trait LedgerGateway: Send + Sync + 'static {
    /// Send the hero on a quest of `duration` hours.
    fn start_quest(
        &self,
        player: PlayerId,
        quest_type: QuestType,
        duration: f64,
    ) -> impl Future<Output = Result<TxReceipt, GatewayError>> + Send;

    /// Gain `levels` levels and apply `distribution` to the attributes.
    fn level_up(
        &self,
        player: PlayerId,
        levels: u32,
        distribution: &Attributes,
    ) -> impl Future<Output = Result<TxReceipt, GatewayError>> + Send;

    /// Close the active quest and credit `rewards`.
    fn collect_rewards(
        &self,
        player: PlayerId,
        rewards: &RewardBundle,
    ) -> impl Future<Output = Result<TxReceipt, GatewayError>> + Send;

    /// Mint a new hero from `params`.
    fn summon_hero(
        &self,
        player: PlayerId,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<TxReceipt, GatewayError>> + Send;
}
