//! Static pattern and game-data tables.
//!
//! Every table is ordered. The parser takes the first matching entry, and
//! auto-selection and stat distribution break ties by table order, so
//! reordering rows changes behavior.

use questmind_types::{Attribute, HeroClass, Intent, QuestType, Rarity};

/// Trigger phrases per intent, in classification order.
pub const INTENT_TRIGGERS: &[(Intent, &[&str])] = &[
    (
        Intent::Quest,
        &[
            "start quest",
            "begin quest",
            "go on quest",
            "quest for",
            "start farming",
            "start mining",
            "start gardening",
            "start fishing",
        ],
    ),
    (
        Intent::LevelUp,
        &[
            "level up",
            "increase level",
            "gain experience",
            "train hero",
            "power up",
            "strengthen hero",
        ],
    ),
    (
        Intent::CollectRewards,
        &[
            "collect rewards",
            "claim rewards",
            "get rewards",
            "harvest rewards",
            "gather rewards",
            "claim earnings",
        ],
    ),
    (
        Intent::CheckStatus,
        &[
            "check status",
            "show stats",
            "view hero",
            "hero status",
            "display stats",
            "show progress",
        ],
    ),
    (
        Intent::BuyItems,
        &[
            "buy item",
            "purchase item",
            "get item",
            "acquire item",
            "buy equipment",
            "purchase gear",
        ],
    ),
];

/// Trigger phrases per quest sub-type, in enumeration order.
pub const QUEST_TRIGGERS: &[(QuestType, &[&str])] = &[
    (QuestType::Mining, &["mining", "mine", "dig"]),
    (QuestType::Gardening, &["gardening", "garden", "plant"]),
    (QuestType::Fishing, &["fishing", "fish", "angle"]),
    (QuestType::Combat, &["combat", "fight", "battle"]),
];

/// Phrases asking the optimizer to choose the sub-type.
pub const AUTO_QUEST_TRIGGERS: &[&str] = &["best quest", "optimal quest", "auto"];

/// Attributes the level-up parser recognizes as a focus, in match order.
pub const FOCUS_SKILLS: [Attribute; 5] = [
    Attribute::Strength,
    Attribute::Agility,
    Attribute::Intelligence,
    Attribute::Wisdom,
    Attribute::Vitality,
];

/// Words that end an item name in a purchase instruction.
pub const ITEM_STOP_WORDS: &[&str] = &["for", "with", "using", "from", "and", "x"];

// ---------------------------------------------------------------------------
// Quest data
// ---------------------------------------------------------------------------

/// Attribute coefficients for quest auto-selection.
pub const fn affinity(quest_type: QuestType) -> &'static [(Attribute, f64)] {
    match quest_type {
        QuestType::Mining => &[(Attribute::Strength, 0.6), (Attribute::Endurance, 0.4)],
        QuestType::Gardening => &[(Attribute::Wisdom, 0.7), (Attribute::Intelligence, 0.3)],
        QuestType::Fishing => &[(Attribute::Agility, 0.5), (Attribute::Luck, 0.5)],
        QuestType::Combat => &[
            (Attribute::Strength, 0.4),
            (Attribute::Agility, 0.3),
            (Attribute::Vitality, 0.3),
        ],
    }
}

/// Attribute coefficients for the reward skill bonus.
pub const fn skill_bonus_weights(quest_type: QuestType) -> &'static [(Attribute, f64)] {
    match quest_type {
        QuestType::Mining => &[(Attribute::Strength, 0.1), (Attribute::Endurance, 0.05)],
        QuestType::Gardening => &[(Attribute::Wisdom, 0.1), (Attribute::Intelligence, 0.05)],
        QuestType::Fishing => &[(Attribute::Agility, 0.1), (Attribute::Luck, 0.05)],
        QuestType::Combat => &[
            (Attribute::Strength, 0.07),
            (Attribute::Agility, 0.05),
            (Attribute::Vitality, 0.03),
        ],
    }
}

/// Resources a quest sub-type can drop.
pub const fn resources(quest_type: QuestType) -> &'static [&'static str] {
    match quest_type {
        QuestType::Mining => &["Stone", "Ore", "Crystal"],
        QuestType::Gardening => &["Seeds", "Plants", "Herbs"],
        QuestType::Fishing => &["Fish", "Pearls", "Treasure"],
        QuestType::Combat => &["Monster Parts", "Equipment", "Potions"],
    }
}

/// Resource units yielded per quest hour before bonuses.
pub const fn resource_yield_per_hour(quest_type: QuestType) -> f64 {
    match quest_type {
        QuestType::Mining | QuestType::Gardening => 2.0,
        QuestType::Fishing => 1.5,
        QuestType::Combat => 1.2,
    }
}

/// Rare items a quest sub-type can drop.
pub const fn rare_items(quest_type: QuestType) -> &'static [&'static str] {
    match quest_type {
        QuestType::Mining => &["Rare Gem", "Ancient Artifact", "Mithril Ore"],
        QuestType::Gardening => &["Magic Seed", "Golden Fruit", "Enchanted Herb"],
        QuestType::Fishing => &["Legendary Fish", "Ancient Pearl", "Sunken Treasure"],
        QuestType::Combat => &["Rare Weapon", "Magical Armor", "Hero's Relic"],
    }
}

// ---------------------------------------------------------------------------
// Hero generation data
// ---------------------------------------------------------------------------

/// Base attributes per class, in [`Attribute::ALL`] order.
pub const fn class_base_stats(class: HeroClass) -> [u32; 7] {
    match class {
        HeroClass::Warrior => [12, 8, 5, 5, 10, 10, 5],
        HeroClass::Archer => [8, 12, 7, 6, 7, 8, 7],
        HeroClass::Mage => [5, 7, 12, 10, 6, 5, 10],
        HeroClass::Priest => [6, 6, 10, 12, 8, 7, 6],
    }
}

/// Attribute multiplier per rarity.
pub const fn rarity_multiplier(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 1.0,
        Rarity::Uncommon => 1.2,
        Rarity::Rare => 1.5,
        Rarity::Legendary => 2.0,
    }
}

/// Default rarity draw weights.
pub const RARITY_WEIGHTS: [(Rarity, f64); 4] = [
    (Rarity::Common, 0.75),
    (Rarity::Uncommon, 0.20),
    (Rarity::Rare, 0.04),
    (Rarity::Legendary, 0.01),
];

/// Class weight without a preference.
pub const CLASS_WEIGHT_UNIFORM: f64 = 0.25;
/// Weight of the preferred class.
pub const CLASS_WEIGHT_PREFERRED: f64 = 0.55;
/// Weight of every other class when one is preferred.
pub const CLASS_WEIGHT_OTHER: f64 = 0.15;

/// Multiplier applied to the stat-focus attribute of a new hero.
pub const STAT_FOCUS_BONUS: f64 = 1.3;

/// Hair style options.
pub const HAIR_STYLES: &[&str] = &["short", "long", "braided", "spiked", "bald"];
/// Hair colour options.
pub const HAIR_COLORS: &[&str] = &["black", "brown", "blonde", "red", "white", "blue"];
/// Skin tone options.
pub const SKIN_TONES: &[&str] = &["fair", "medium", "dark", "olive", "tan"];
/// Eye colour options.
pub const EYE_COLORS: &[&str] = &["brown", "blue", "green", "hazel", "violet"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_order_matches_classification_order() {
        let order: Vec<Intent> = INTENT_TRIGGERS.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, Intent::CLASSIFIED.to_vec());
    }

    #[test]
    fn quest_order_matches_enumeration() {
        let order: Vec<QuestType> = QUEST_TRIGGERS.iter().map(|(q, _)| *q).collect();
        assert_eq!(order, QuestType::ALL.to_vec());
    }

    #[test]
    fn every_quest_has_three_resources_and_rare_items() {
        for quest in QuestType::ALL {
            assert_eq!(resources(quest).len(), 3);
            assert_eq!(rare_items(quest).len(), 3);
        }
    }
}
