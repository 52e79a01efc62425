//! Error types for the agent runtime.
//!
//! Expected command outcomes (validation failures, gateway failures,
//! timeouts) never surface here: they are folded into
//! [`CommandResult`](questmind_types::CommandResult) values. These types
//! cover the runtime's own plumbing.

use crate::config::ConfigError;

/// Errors raised by the game-state or ledger gateways.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The call never reached the backend or its reply was lost.
    #[error("gateway transport error: {0}")]
    Transport(String),

    /// The backend rejected the transaction.
    #[error("transaction reverted: {0}")]
    Reverted(String),
}

/// Errors raised by weight persistence.
#[derive(Debug, thiserror::Error)]
pub enum WeightStoreError {
    /// Reading or writing the weights file failed.
    #[error("weights file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The weights file is not valid JSON.
    #[error("weights file is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Top-level error type for the agent runtime.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The worker pool is no longer accepting instructions.
    #[error("worker pool is shut down")]
    PoolClosed,
}
