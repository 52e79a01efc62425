//! Instruction interpretation and quest optimization core for QuestMind.
//!
//! Everything here is pure: no I/O, no clocks, no ambient randomness. The
//! current time and the random source are passed in by the caller, which
//! keeps every calculator reproducible under test.
//!
//! # Pipeline
//!
//! ```text
//! text -> parse -> enhance(hero, rules) -> validate(hero, rules, now)
//!      -> optimize_quest(weights) -> rewards / progression / generator
//!      -> learning::apply(outcome)
//! ```
//!
//! # Modules
//!
//! - [`catalog`] -- Trigger phrases and fixed game tables
//! - [`parse`] -- Text to [`ParsedCommand`](questmind_types::ParsedCommand)
//! - [`enhance`] -- Stamina clamp and quest auto-selection
//! - [`validation`] -- Precondition checks producing [`Rejection`]s
//! - [`optimize`] -- Weighted sub-type resolution and duration cap
//! - [`progression`] -- Level-up cost and stat distribution
//! - [`rewards`] -- Reward estimation and realization
//! - [`generator`] -- Weighted-random hero synthesis
//! - [`learning`] -- Optimization weight update rule
//! - [`rules`] -- Configurable game bounds

pub mod catalog;
pub mod enhance;
pub mod error;
pub mod generator;
pub mod learning;
pub mod optimize;
pub mod parse;
pub mod progression;
pub mod rewards;
pub mod rules;
pub mod validation;

pub use enhance::{best_quest, enhance, quest_score};
pub use error::EngineError;
pub use generator::{AppearancePreference, GenerationParams, generate};
pub use learning::{LEARNING_RATE, Outcome};
pub use optimize::{OptimizedQuest, optimize_quest};
pub use parse::parse;
pub use rules::GameRules;
pub use validation::{Rejection, validate};
