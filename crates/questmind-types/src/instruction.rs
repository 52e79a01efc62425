//! Instruction lifecycle: `pending -> processing -> {completed, failed}`.
//!
//! Terminal states are final. Once an instruction has a result, further
//! transitions are rejected with [`LifecycleError::AlreadyTerminal`] and the
//! stored result is left untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::InstructionStatus;
use crate::ids::{InstructionId, PlayerId};
use crate::results::CommandResult;

/// Errors raised by invalid lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The instruction already reached `completed` or `failed`.
    #[error("instruction {id} is already {status}")]
    AlreadyTerminal {
        /// The instruction.
        id: InstructionId,
        /// Its terminal status.
        status: InstructionStatus,
    },

    /// `begin` was called on an instruction already being processed.
    #[error("instruction {0} is already processing")]
    AlreadyStarted(InstructionId),

    /// `finish` was called before `begin`.
    #[error("instruction {0} was never picked up")]
    NotStarted(InstructionId),
}

/// A natural-language instruction submitted by a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Instruction {
    /// Instruction identity.
    pub id: InstructionId,
    /// Submitting player.
    pub player_id: PlayerId,
    /// Raw instruction text.
    pub text: String,
    /// Current lifecycle state.
    pub status: InstructionStatus,
    /// Outcome, present once terminal.
    pub result: Option<CommandResult>,
    /// When a worker picked it up.
    pub started_at: Option<DateTime<Utc>>,
    /// When it reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Instruction {
    /// A new pending instruction.
    pub fn new(player_id: PlayerId, text: impl Into<String>) -> Self {
        Self {
            id: InstructionId::new(),
            player_id,
            text: text.into(),
            status: InstructionStatus::Pending,
            result: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Transition `pending -> processing`.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        if self.status != InstructionStatus::Pending {
            return Err(LifecycleError::AlreadyStarted(self.id));
        }
        self.status = InstructionStatus::Processing;
        self.started_at = Some(now);
        Ok(())
    }

    /// Transition `processing -> completed | failed` based on `result`.
    pub fn finish(
        &mut self,
        result: CommandResult,
        now: DateTime<Utc>,
    ) -> Result<TerminalRecord, LifecycleError> {
        self.ensure_open()?;
        let started_at = self.started_at.ok_or(LifecycleError::NotStarted(self.id))?;
        self.status = if result.is_success() {
            InstructionStatus::Completed
        } else {
            InstructionStatus::Failed
        };
        self.completed_at = Some(now);
        self.result = Some(result.clone());
        Ok(TerminalRecord {
            instruction_id: self.id,
            player_id: self.player_id,
            status: self.status,
            result,
            started_at,
            completed_at: now,
        })
    }

    const fn ensure_open(&self) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::AlreadyTerminal {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

/// Terminal state handed to the lifecycle owner for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TerminalRecord {
    /// The instruction.
    pub instruction_id: InstructionId,
    /// Submitting player.
    pub player_id: PlayerId,
    /// `completed` or `failed`.
    pub status: InstructionStatus,
    /// Outcome.
    pub result: CommandResult,
    /// Pickup time.
    pub started_at: DateTime<Utc>,
    /// Terminal time.
    pub completed_at: DateTime<Utc>,
}
