//! Enumeration types for the QuestMind command vocabulary and hero model.
//!
//! The snake_case serialized names of [`Intent`], [`QuestType`], and
//! [`Attribute`] are the wire format shared with existing callers. Do not
//! rename variants without a migration.
//!
//! Every enum exposes its variants in a fixed order through an `ALL`
//! constant. That order is load-bearing: classification, auto-selection
//! tie-breaks, and stat remainder distribution all iterate it.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Returned when a string does not name a variant of a vocabulary enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which vocabulary was being parsed (e.g. `"quest type"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Implements `as_str`, `Display`, and `FromStr` from a variant/name table.
macro_rules! vocabulary {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// The canonical wire name of this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Command intents
// ---------------------------------------------------------------------------

/// The classified command category for an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Intent {
    /// Send the hero on a timed quest.
    Quest,
    /// Spend experience to gain levels.
    LevelUp,
    /// Claim rewards from a finished quest.
    CollectRewards,
    /// Report the hero's current state.
    CheckStatus,
    /// Purchase items or equipment.
    BuyItems,
    /// No trigger phrase matched.
    Unknown,
}

impl Intent {
    /// Classifiable intents in catalog order. [`Intent::Unknown`] is the
    /// fallback and is deliberately absent.
    pub const CLASSIFIED: [Self; 5] = [
        Self::Quest,
        Self::LevelUp,
        Self::CollectRewards,
        Self::CheckStatus,
        Self::BuyItems,
    ];

    /// Whether executing this intent mutates ledger state.
    pub const fn is_mutating(self) -> bool {
        matches!(self, Self::Quest | Self::LevelUp | Self::CollectRewards | Self::BuyItems)
    }
}

vocabulary!(Intent, "intent", {
    Quest => "quest",
    LevelUp => "level_up",
    CollectRewards => "collect_rewards",
    CheckStatus => "check_status",
    BuyItems => "buy_items",
    Unknown => "unknown",
});

// ---------------------------------------------------------------------------
// Quest sub-types
// ---------------------------------------------------------------------------

/// A quest sub-type a hero can be sent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum QuestType {
    /// Strength/endurance quest yielding stone, ore, and crystal.
    Mining,
    /// Wisdom/intelligence quest yielding seeds, plants, and herbs.
    Gardening,
    /// Agility/luck quest yielding fish, pearls, and treasure.
    Fishing,
    /// Strength/agility/vitality quest yielding monster parts and gear.
    Combat,
}

impl QuestType {
    /// All quest sub-types in enumeration (tie-break) order.
    pub const ALL: [Self; 4] = [Self::Mining, Self::Gardening, Self::Fishing, Self::Combat];
}

vocabulary!(QuestType, "quest type", {
    Mining => "mining",
    Gardening => "gardening",
    Fishing => "fishing",
    Combat => "combat",
});

// ---------------------------------------------------------------------------
// Hero attributes
// ---------------------------------------------------------------------------

/// One of the seven hero attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Attribute {
    /// Physical power.
    Strength,
    /// Speed and dexterity.
    Agility,
    /// Reasoning and arcane aptitude.
    Intelligence,
    /// Insight and attunement.
    Wisdom,
    /// Health and toughness.
    Vitality,
    /// Stamina for long exertion.
    Endurance,
    /// Fortune on rolls and drops.
    Luck,
}

impl Attribute {
    /// All attributes in enumeration order.
    pub const ALL: [Self; 7] = [
        Self::Strength,
        Self::Agility,
        Self::Intelligence,
        Self::Wisdom,
        Self::Vitality,
        Self::Endurance,
        Self::Luck,
    ];

    /// Primary attributes, favoured by unfocused stat distribution.
    pub const PRIMARY: [Self; 4] = [Self::Strength, Self::Agility, Self::Intelligence, Self::Wisdom];

    /// Secondary attributes.
    pub const SECONDARY: [Self; 3] = [Self::Vitality, Self::Endurance, Self::Luck];
}

vocabulary!(Attribute, "attribute", {
    Strength => "strength",
    Agility => "agility",
    Intelligence => "intelligence",
    Wisdom => "wisdom",
    Vitality => "vitality",
    Endurance => "endurance",
    Luck => "luck",
});

// ---------------------------------------------------------------------------
// Hero generation
// ---------------------------------------------------------------------------

/// A hero class, which determines base attributes at summoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum HeroClass {
    /// Melee fighter; strength, vitality, endurance.
    Warrior,
    /// Ranged fighter; agility.
    Archer,
    /// Caster; intelligence, wisdom, luck.
    Mage,
    /// Healer; wisdom, intelligence.
    Priest,
}

impl HeroClass {
    /// All classes in draw order.
    pub const ALL: [Self; 4] = [Self::Warrior, Self::Archer, Self::Mage, Self::Priest];
}

vocabulary!(HeroClass, "hero class", {
    Warrior => "warrior",
    Archer => "archer",
    Mage => "mage",
    Priest => "priest",
});

/// Hero rarity tier. Higher tiers multiply every base attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// x1.0 attributes.
    Common,
    /// x1.2 attributes.
    Uncommon,
    /// x1.5 attributes.
    Rare,
    /// x2.0 attributes.
    Legendary,
}

impl Rarity {
    /// All rarities in draw order.
    pub const ALL: [Self; 4] = [Self::Common, Self::Uncommon, Self::Rare, Self::Legendary];
}

vocabulary!(Rarity, "rarity", {
    Common => "common",
    Uncommon => "uncommon",
    Rare => "rare",
    Legendary => "legendary",
});

// ---------------------------------------------------------------------------
// Instruction lifecycle
// ---------------------------------------------------------------------------

/// Processing status of a submitted instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum InstructionStatus {
    /// Accepted, not yet picked up by a worker.
    Pending,
    /// A worker is running the pipeline.
    Processing,
    /// The command executed successfully.
    Completed,
    /// Validation, the gateway, or the worker failed.
    Failed,
}

impl InstructionStatus {
    /// Terminal states are final; no transition leaves them.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

vocabulary!(InstructionStatus, "instruction status", {
    Pending => "pending",
    Processing => "processing",
    Completed => "completed",
    Failed => "failed",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_wire_names() {
        assert_eq!(Intent::LevelUp.as_str(), "level_up");
        assert_eq!(
            serde_json::to_string(&Intent::CollectRewards).ok().as_deref(),
            Some("\"collect_rewards\"")
        );
    }

    #[test]
    fn attribute_from_str_is_case_insensitive() {
        assert_eq!("Strength".parse::<Attribute>().ok(), Some(Attribute::Strength));
        assert_eq!(" luck ".parse::<Attribute>().ok(), Some(Attribute::Luck));
        assert!("charisma".parse::<Attribute>().is_err());
    }

    #[test]
    fn primary_and_secondary_cover_all_attributes() {
        let mut combined: Vec<Attribute> = Attribute::PRIMARY.to_vec();
        combined.extend(Attribute::SECONDARY);
        assert_eq!(combined, Attribute::ALL.to_vec());
    }

    #[test]
    fn quest_type_order_matches_tie_break_order() {
        assert_eq!(
            QuestType::ALL.map(QuestType::as_str),
            ["mining", "gardening", "fishing", "combat"]
        );
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!InstructionStatus::Pending.is_terminal());
        assert!(!InstructionStatus::Processing.is_terminal());
        assert!(InstructionStatus::Completed.is_terminal());
        assert!(InstructionStatus::Failed.is_terminal());
    }

    #[test]
    fn check_status_is_read_only() {
        assert!(!Intent::CheckStatus.is_mutating());
        assert!(Intent::Quest.is_mutating());
    }
}
