//! Hero state as seen by the agent: attributes, stamina, progression, and
//! the currently running quest.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Attribute, QuestType};
use crate::ids::HeroId;
use crate::results::RewardBundle;

/// Stamina consumed per hour of questing. Fixed exchange rate.
pub const STAMINA_PER_HOUR: u32 = 5;

/// Milliseconds in one hour, used to turn fractional quest hours into
/// timestamps.
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Values for the seven hero attributes.
///
/// Serialized as a flat object keyed by attribute name, which is the same
/// shape the game backend uses for hero stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Attributes {
    /// Strength points.
    pub strength: u32,
    /// Agility points.
    pub agility: u32,
    /// Intelligence points.
    pub intelligence: u32,
    /// Wisdom points.
    pub wisdom: u32,
    /// Vitality points.
    pub vitality: u32,
    /// Endurance points.
    pub endurance: u32,
    /// Luck points.
    pub luck: u32,
}

impl Attributes {
    /// Read one attribute.
    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Agility => self.agility,
            Attribute::Intelligence => self.intelligence,
            Attribute::Wisdom => self.wisdom,
            Attribute::Vitality => self.vitality,
            Attribute::Endurance => self.endurance,
            Attribute::Luck => self.luck,
        }
    }

    /// Mutable access to one attribute.
    pub fn get_mut(&mut self, attribute: Attribute) -> &mut u32 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Agility => &mut self.agility,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Vitality => &mut self.vitality,
            Attribute::Endurance => &mut self.endurance,
            Attribute::Luck => &mut self.luck,
        }
    }

    /// Read one attribute as a float, for scoring formulas.
    pub fn weight(&self, attribute: Attribute) -> f64 {
        f64::from(self.get(attribute))
    }

    /// Sum of all seven attributes. Saturates instead of overflowing.
    pub fn total(&self) -> u32 {
        Attribute::ALL
            .iter()
            .fold(0_u32, |acc, &a| acc.saturating_add(self.get(a)))
    }

    /// Add `increases` attribute by attribute, saturating at `u32::MAX`.
    #[must_use]
    pub fn plus(&self, increases: &Self) -> Self {
        let mut out = *self;
        for attribute in Attribute::ALL {
            let slot = out.get_mut(attribute);
            *slot = slot.saturating_add(increases.get(attribute));
        }
        out
    }
}

/// A quest the hero is currently on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActiveQuest {
    /// Which quest sub-type is running.
    pub quest_type: QuestType,
    /// Length of the quest in hours (may be fractional).
    pub duration_hours: f64,
    /// When the quest started.
    pub start_time: DateTime<Utc>,
    /// When rewards become collectable.
    pub expected_completion: DateTime<Utc>,
}

impl ActiveQuest {
    /// Start a quest of `duration_hours` at `now`.
    pub fn begin(quest_type: QuestType, duration_hours: f64, now: DateTime<Utc>) -> Self {
        Self {
            quest_type,
            duration_hours,
            start_time: now,
            expected_completion: add_hours(now, duration_hours),
        }
    }

    /// Time left before the quest finishes, or `None` if it has finished.
    ///
    /// Completion is measured from `start_time + duration_hours`, not from
    /// the stored `expected_completion`, so a snapshot with an inconsistent
    /// completion field cannot release rewards early.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let finish = add_hours(self.start_time, self.duration_hours);
        (now < finish).then(|| finish - now)
    }
}

/// Convert fractional hours to a [`TimeDelta`] at millisecond precision.
///
/// Non-finite or negative inputs collapse to zero.
#[allow(clippy::cast_possible_truncation)]
pub fn hours_to_delta(hours: f64) -> TimeDelta {
    if !hours.is_finite() || hours <= 0.0 {
        return TimeDelta::zero();
    }
    // Float-to-int `as` saturates, and try_milliseconds rejects the extremes.
    TimeDelta::try_milliseconds((hours * MILLIS_PER_HOUR).round() as i64).unwrap_or(TimeDelta::MAX)
}

/// `at + hours`, saturating at the latest representable instant.
pub fn add_hours(at: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    at.checked_add_signed(hours_to_delta(hours))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Point-in-time view of a player's hero.
///
/// Invariants: `stamina <= max_stamina`; `active_quest` is present only
/// while a quest is unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HeroSnapshot {
    /// The hero this snapshot describes.
    pub hero_id: HeroId,
    /// Current level (1-based).
    pub level: u32,
    /// Unspent experience points.
    pub experience: u64,
    /// Experience cost of the next level.
    pub next_level_xp: u64,
    /// Current stamina.
    pub stamina: u32,
    /// Stamina ceiling.
    pub max_stamina: u32,
    /// Attribute values.
    pub attributes: Attributes,
    /// Lifetime number of quests whose rewards were collected.
    pub quests_completed: u32,
    /// The unresolved quest, if any.
    pub active_quest: Option<ActiveQuest>,
    /// Item names in acquisition order.
    pub inventory: Vec<String>,
}

impl HeroSnapshot {
    /// Longest quest, in hours, the current stamina can pay for.
    pub fn affordable_hours(&self) -> f64 {
        f64::from(self.stamina) / f64::from(STAMINA_PER_HOUR)
    }

    /// Stamina a quest of `hours` costs.
    pub fn stamina_cost(hours: f64) -> f64 {
        hours * f64::from(STAMINA_PER_HOUR)
    }

    /// Whole stamina points charged for a quest of `hours`.
    ///
    /// The fractional part of `hours * 5` is not charged.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn stamina_spent(hours: f64) -> u32 {
        let cost = Self::stamina_cost(hours);
        if !cost.is_finite() || cost <= 0.0 {
            return 0;
        }
        cost.trunc() as u32
    }

    /// Whether the hero is on an unresolved quest.
    pub const fn is_questing(&self) -> bool {
        self.active_quest.is_some()
    }

    /// Start a quest at `now`, charging stamina. Returns the stamina spent.
    pub fn begin_quest(&mut self, quest_type: QuestType, hours: f64, now: DateTime<Utc>) -> u32 {
        let spent = Self::stamina_spent(hours).min(self.stamina);
        self.stamina = self.stamina.saturating_sub(spent);
        self.active_quest = Some(ActiveQuest::begin(quest_type, hours, now));
        spent
    }

    /// Spend `experience_cost` to gain `levels` levels and add `increases`.
    pub fn gain_levels(
        &mut self,
        levels: u32,
        experience_cost: u64,
        increases: &Attributes,
        next_level_xp: u64,
    ) {
        self.level = self.level.saturating_add(levels);
        self.experience = self.experience.saturating_sub(experience_cost);
        self.attributes = self.attributes.plus(increases);
        self.next_level_xp = next_level_xp;
    }

    /// Close the active quest and credit `rewards`.
    ///
    /// A rare item already in the inventory is not added twice. Currency is
    /// not part of the hero and is left to the caller.
    pub fn claim_rewards(&mut self, rewards: &RewardBundle) {
        self.active_quest = None;
        self.experience = self.experience.saturating_add(rewards.experience);
        self.quests_completed = self.quests_completed.saturating_add(1);
        if let Some(item) = rewards.rare_item.as_ref().filter(|i| !self.inventory.contains(i)) {
            self.inventory.push(item.clone());
        }
    }
}
