//! Typed outcomes of executing a command.
//!
//! Every processed instruction ends in a [`CommandResult`]. Success carries a
//! per-operation [`CommandPayload`]; failure carries a human-readable message
//! plus a machine-checkable [`FailureReason`], serialized with a `reason`
//! tag so callers can match on `data.reason` without parsing messages.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Attribute, HeroClass, Intent, QuestType, Rarity};
use crate::hero::{Attributes, HeroSnapshot};
use crate::ids::HeroId;

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// A resource granted when a quest is collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceDrop {
    /// Resource name, e.g. `"Ore"`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Units granted.
    pub amount: u64,
}

/// Realized rewards for a finished quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RewardBundle {
    /// Experience points.
    pub experience: u64,
    /// In-game currency.
    pub currency: u64,
    /// Optional resource drop.
    pub resource: Option<ResourceDrop>,
    /// Optional rare item name.
    pub rare_item: Option<String>,
}

/// Deterministic reward expectation computed before a quest starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RewardEstimate {
    /// Expected experience.
    pub experience: u64,
    /// Expected currency.
    pub currency: u64,
    /// Drop chance in percent for each associated resource.
    pub resource_chances: BTreeMap<String, f64>,
    /// `round(currency + 0.5 * experience)`.
    pub estimated_value: u64,
}

// ---------------------------------------------------------------------------
// Success payloads
// ---------------------------------------------------------------------------

/// Report returned when a quest starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestStartReport {
    /// Hero sent on the quest.
    pub hero_id: HeroId,
    /// Resolved sub-type.
    pub quest_type: QuestType,
    /// Resolved duration in hours.
    pub duration_hours: f64,
    /// Stamina spent.
    pub stamina_spent: u32,
    /// When rewards become collectable.
    pub expected_completion: DateTime<Utc>,
    /// Expected rewards.
    pub expected_rewards: RewardEstimate,
    /// Ledger transaction reference.
    pub tx_ref: String,
    /// Whether the optimizer changed the sub-type or duration.
    pub optimization_applied: bool,
}

/// Report returned after levelling up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LevelUpReport {
    /// Hero that levelled.
    pub hero_id: HeroId,
    /// Level before the action.
    pub previous_level: u32,
    /// Level after the action.
    pub new_level: u32,
    /// Experience consumed.
    pub experience_used: u64,
    /// Experience left over.
    pub experience_remaining: u64,
    /// Points added per attribute.
    pub stat_increases: Attributes,
    /// Attribute values after the increase.
    pub new_attributes: Attributes,
    /// Ledger transaction reference.
    pub tx_ref: String,
}

/// Report returned after collecting quest rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CollectionReport {
    /// Hero that collected.
    pub hero_id: HeroId,
    /// Sub-type of the finished quest.
    pub quest_type: QuestType,
    /// What was granted.
    pub rewards: RewardBundle,
    /// Lifetime completed quests after this one.
    pub quests_completed: u32,
    /// Ledger transaction reference.
    pub tx_ref: String,
}

/// Cosmetic traits of a summoned hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Appearance {
    /// Hair style.
    pub hair_style: String,
    /// Hair colour.
    pub hair_color: String,
    /// Skin tone.
    pub skin_tone: String,
    /// Eye colour.
    pub eye_color: String,
}

/// Preferences a player may pass when summoning a hero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SummonOptions {
    /// Class to favour in the weighted draw.
    #[serde(default)]
    pub class_preference: Option<HeroClass>,
    /// Attribute to boost by 30%.
    #[serde(default)]
    pub stat_focus: Option<Attribute>,
    /// Hair style; honoured when it is a known option.
    #[serde(default)]
    pub hair_style: Option<String>,
    /// Hair colour; honoured when it is a known option.
    #[serde(default)]
    pub hair_color: Option<String>,
    /// Skin tone; honoured when it is a known option.
    #[serde(default)]
    pub skin_tone: Option<String>,
    /// Eye colour; honoured when it is a known option.
    #[serde(default)]
    pub eye_color: Option<String>,
}

/// A freshly generated hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeneratedHero {
    /// Drawn class.
    pub class: HeroClass,
    /// Drawn rarity.
    pub rarity: Rarity,
    /// Starting attributes.
    pub attributes: Attributes,
    /// Cosmetic traits.
    pub appearance: Appearance,
}

/// Report returned after summoning a hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SummonReport {
    /// The new hero.
    pub hero: GeneratedHero,
    /// Ledger transaction reference.
    pub tx_ref: String,
}

/// Successful outcome of one command, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "action", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
#[allow(clippy::large_enum_variant)]
pub enum CommandPayload {
    /// A quest started.
    QuestStarted(QuestStartReport),
    /// The hero gained levels.
    LevelUp(LevelUpReport),
    /// Quest rewards were collected.
    RewardsCollected(CollectionReport),
    /// Read-only hero status.
    Status(HeroSnapshot),
    /// A new hero was summoned.
    HeroSummoned(SummonReport),
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

/// Machine-checkable failure detail, serialized as `{"reason": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FailureReason {
    /// No trigger phrase matched.
    UnrecognizedCommand,
    /// The intent was recognized but cannot be executed.
    UnsupportedCommand {
        /// The recognized intent.
        intent: Intent,
    },
    /// Instruction text exceeds the configured limit.
    InstructionTooLong {
        /// Length of the submitted text in characters.
        length: usize,
        /// Configured maximum.
        max: usize,
    },
    /// The player may not act on this hero.
    AccessDenied,
    /// The player has no hero.
    HeroNotFound,
    /// Quest sub-type is not one of the accepted values.
    InvalidQuestType {
        /// What was asked for.
        requested: String,
        /// What is accepted.
        allowed: Vec<QuestType>,
    },
    /// Duration outside the configured bounds.
    InvalidDuration {
        /// Requested hours.
        requested: f64,
        /// Lower bound in hours.
        min: f64,
        /// Upper bound in hours.
        max: f64,
    },
    /// The hero is already on a quest.
    QuestInProgress {
        /// The running sub-type.
        quest_type: QuestType,
        /// When it finishes.
        expected_completion: DateTime<Utc>,
    },
    /// Not enough stamina for the requested duration.
    InsufficientStamina {
        /// Stamina needed.
        required: f64,
        /// Stamina on hand.
        available: u32,
    },
    /// The hero is at the level ceiling.
    MaxLevelReached {
        /// Current level.
        current_level: u32,
        /// Ceiling.
        max_level: u32,
    },
    /// Target level is not above the current level.
    TargetLevelNotHigher {
        /// Current level.
        current_level: u32,
        /// Requested target.
        target_level: u32,
    },
    /// Not enough experience for the level delta.
    InsufficientExperience {
        /// Experience needed.
        required: u64,
        /// Experience on hand.
        available: u64,
    },
    /// There is no quest to collect.
    NoActiveQuest,
    /// The active quest has time left.
    QuestNotFinished {
        /// The running sub-type.
        quest_type: QuestType,
        /// When it finishes.
        expected_completion: DateTime<Utc>,
        /// Seconds until it finishes.
        remaining_seconds: i64,
    },
    /// A gateway call failed.
    GatewayFailure {
        /// Underlying transport or revert message.
        message: String,
    },
    /// Processing exceeded the configured time limit.
    Timeout {
        /// Configured limit.
        limit_secs: u64,
    },
    /// Any other fault caught at the worker boundary.
    Fault {
        /// Short category name, e.g. `"panic"`.
        category: String,
        /// Fault description.
        message: String,
    },
}

impl FailureReason {
    /// Whether retrying the same instruction later may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientStamina { .. }
                | Self::QuestInProgress { .. }
                | Self::QuestNotFinished { .. }
                | Self::InsufficientExperience { .. }
                | Self::GatewayFailure { .. }
                | Self::Timeout { .. }
        )
    }
}

/// Terminal outcome of one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CommandResult {
    /// The command executed.
    Completed {
        /// Human-readable summary.
        message: String,
        /// Operation-specific payload.
        data: CommandPayload,
    },
    /// The command did not execute.
    Failed {
        /// Human-readable explanation.
        message: String,
        /// Structured reason.
        data: FailureReason,
    },
}

impl CommandResult {
    /// Build a success result.
    pub fn completed(message: impl Into<String>, data: CommandPayload) -> Self {
        Self::Completed {
            message: message.into(),
            data,
        }
    }

    /// Build a failure result.
    pub fn failed(message: impl Into<String>, reason: FailureReason) -> Self {
        Self::Failed {
            message: message.into(),
            data: reason,
        }
    }

    /// Whether the command executed.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Human-readable message for either variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Completed { message, .. } | Self::Failed { message, .. } => message,
        }
    }

    /// The failure reason, if the command failed.
    pub const fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { data, .. } => Some(data),
        }
    }
}
