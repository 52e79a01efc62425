//! Parsed command representation passed from the parser downstream.
//!
//! The JSON field names of [`CommandParams`] (`quest_type`, `duration`,
//! `target_level`, `focus_skill`, `item`, `quantity`) are the stable
//! contract between the parser and every consumer. Absent parameters are
//! omitted rather than serialized as `null`.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Attribute, Intent, QuestType};

/// The quest sub-type a command asks for.
///
/// Structured callers may send arbitrary strings, so unknown names are kept
/// as [`QuestRequest::Unrecognized`] and rejected later by validation rather
/// than at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestRequest {
    /// One of the enumerated quest sub-types.
    Kind(QuestType),
    /// Let the optimizer pick the sub-type.
    Auto,
    /// A name that is not a known sub-type.
    Unrecognized(String),
}

impl QuestRequest {
    /// Wire name used for [`QuestRequest::Auto`].
    pub const AUTO: &'static str = "auto";

    /// The concrete sub-type, if one was requested.
    pub const fn kind(&self) -> Option<QuestType> {
        match self {
            Self::Kind(kind) => Some(*kind),
            Self::Auto | Self::Unrecognized(_) => None,
        }
    }
}

impl From<QuestType> for QuestRequest {
    fn from(kind: QuestType) -> Self {
        Self::Kind(kind)
    }
}

impl From<String> for QuestRequest {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case(Self::AUTO) {
            return Self::Auto;
        }
        raw.parse::<QuestType>()
            .map_or(Self::Unrecognized(raw), Self::Kind)
    }
}

impl From<QuestRequest> for String {
    fn from(request: QuestRequest) -> Self {
        match request {
            QuestRequest::Kind(kind) => kind.as_str().to_owned(),
            QuestRequest::Auto => QuestRequest::AUTO.to_owned(),
            QuestRequest::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for QuestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => f.write_str(kind.as_str()),
            Self::Auto => f.write_str(Self::AUTO),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Parameters extracted from instruction text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CommandParams {
    /// Requested quest sub-type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub quest_type: Option<QuestRequest>,
    /// Requested quest length in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Level the hero should reach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_level: Option<u32>,
    /// Attribute to favour when distributing stat points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_skill: Option<Attribute>,
    /// Item name for purchases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Generic numeric quantity found in the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl CommandParams {
    /// Quest length to use when none was given.
    pub const DEFAULT_DURATION: f64 = 1.0;

    /// Requested duration, defaulting to one hour.
    pub fn duration_or_default(&self) -> f64 {
        self.duration.unwrap_or(Self::DEFAULT_DURATION)
    }
}

/// A classified instruction with its raw parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ParsedCommand {
    /// The classified intent.
    pub intent: Intent,
    /// Extracted parameters.
    pub params: CommandParams,
}

impl ParsedCommand {
    /// A command the parser could not classify.
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            params: CommandParams::default(),
        }
    }
}
