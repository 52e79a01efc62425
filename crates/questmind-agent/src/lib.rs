//! Async runtime for the QuestMind game agent.
//!
//! Takes natural-language instructions from players, interprets them with
//! [`questmind_engine`], and executes the resulting commands against the
//! game backend through the gateway contracts in [`gateway`].
//!
//! # Architecture
//!
//! ```text
//! WorkerPool --(per player, bounded)--> Orchestrator --> GameStateGateway
//!     |                                      |       \-> LedgerGateway
//!     v                                      v
//! LifecycleSink                  GameStateCache + WeightStore
//! ```
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`gateway`] -- Game-state and ledger contracts
//! - [`sim`] -- In-memory backend implementing both contracts
//! - [`cache`] -- TTL cache of hero snapshots
//! - [`weight_store`] -- Shared optimization weights and their persistence
//! - [`orchestrator`] -- Per-instruction pipeline
//! - [`pool`] -- Bounded worker pool with per-player exclusivity
//! - [`sink`] -- Destination for terminal instruction records

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod pool;
pub mod sim;
pub mod sink;
pub mod weight_store;

pub use cache::GameStateCache;
pub use config::{ConfigError, QuestMindConfig};
pub use error::{AgentError, GatewayError, WeightStoreError};
pub use gateway::{GameStateGateway, LedgerGateway, TxReceipt};
pub use orchestrator::Orchestrator;
pub use pool::{PoolConfig, WorkerPool};
pub use sim::SimulatedChain;
pub use sink::{ChannelSink, LifecycleSink};
pub use weight_store::{Ephemeral, JsonFile, WeightPersistence, WeightStore};
