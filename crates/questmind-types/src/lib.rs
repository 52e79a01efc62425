//! Shared type definitions for the QuestMind game agent.
//!
//! This crate is the single source of truth for all types used across the
//! QuestMind workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the player dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for players, heroes, and instructions
//! - [`enums`] -- Command vocabulary and hero model enumerations
//! - [`hero`] -- Hero snapshot, attributes, and active quest
//! - [`command`] -- Parsed command and its parameters
//! - [`results`] -- Rewards, success payloads, and failure reasons
//! - [`instruction`] -- Instruction lifecycle and terminal records
//! - [`weights`] -- Learned optimization weights

pub mod command;
pub mod enums;
pub mod hero;
pub mod ids;
pub mod instruction;
pub mod results;
pub mod weights;

// Re-export all public types at crate root for convenience.
pub use command::{CommandParams, ParsedCommand, QuestRequest};
pub use enums::{
    Attribute, HeroClass, InstructionStatus, Intent, QuestType, Rarity, UnknownVariant,
};
pub use hero::{ActiveQuest, Attributes, HeroSnapshot, STAMINA_PER_HOUR, add_hours, hours_to_delta};
pub use ids::{HeroId, InstructionId, PlayerId};
pub use instruction::{Instruction, LifecycleError, TerminalRecord};
pub use results::{
    Appearance, CollectionReport, CommandPayload, CommandResult, FailureReason, GeneratedHero,
    LevelUpReport, QuestStartReport, ResourceDrop, RewardBundle, RewardEstimate, SummonOptions,
    SummonReport,
};
pub use weights::OptimizationWeights;

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Calling export_all writes each type and its dependencies to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::PlayerId::export_all();
        let _ = crate::ids::HeroId::export_all();
        let _ = crate::ids::InstructionId::export_all();

        // Enums
        let _ = crate::enums::Intent::export_all();
        let _ = crate::enums::QuestType::export_all();
        let _ = crate::enums::Attribute::export_all();
        let _ = crate::enums::HeroClass::export_all();
        let _ = crate::enums::Rarity::export_all();
        let _ = crate::enums::InstructionStatus::export_all();

        // Hero and commands
        let _ = crate::hero::Attributes::export_all();
        let _ = crate::hero::ActiveQuest::export_all();
        let _ = crate::hero::HeroSnapshot::export_all();
        let _ = crate::command::CommandParams::export_all();
        let _ = crate::command::ParsedCommand::export_all();

        // Results
        let _ = crate::results::RewardBundle::export_all();
        let _ = crate::results::RewardEstimate::export_all();
        let _ = crate::results::CommandPayload::export_all();
        let _ = crate::results::FailureReason::export_all();
        let _ = crate::results::CommandResult::export_all();
        let _ = crate::results::SummonOptions::export_all();

        // Lifecycle
        let _ = crate::instruction::Instruction::export_all();
        let _ = crate::instruction::TerminalRecord::export_all();
        let _ = crate::weights::OptimizationWeights::export_all();
    }
}
