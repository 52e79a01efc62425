//! Quest reward estimation and realization.
//!
//! Estimation is deterministic and runs before a quest starts so the player
//! sees what to expect. Realization runs at collection time and draws from
//! an injected RNG, so tests can pin outcomes with a seeded generator.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;

use questmind_types::{Attributes, QuestType, ResourceDrop, RewardBundle, RewardEstimate};

use crate::catalog::{rare_items, resource_yield_per_hour, resources, skill_bonus_weights};

const XP_PER_HOUR: f64 = 10.0;
const XP_LEVEL_SCALE: f64 = 0.05;
const CURRENCY_PER_HOUR: f64 = 5.0;
const CURRENCY_LEVEL_SCALE: f64 = 0.03;
const RARE_CHANCE_PER_HOUR: f64 = 0.05;
const MAX_RESOURCE_CHANCE: f64 = 90.0;

/// Attribute-weighted reward bonus for `quest_type`.
pub fn skill_bonus(attributes: &Attributes, quest_type: QuestType) -> f64 {
    skill_bonus_weights(quest_type)
        .iter()
        .map(|(attribute, coefficient)| attributes.weight(*attribute) * coefficient)
        .sum()
}

fn base_xp(duration: f64, level: u32) -> f64 {
    duration * XP_PER_HOUR * f64::from(level).mul_add(XP_LEVEL_SCALE, 1.0)
}

fn base_currency(duration: f64, level: u32) -> f64 {
    duration * CURRENCY_PER_HOUR * f64::from(level).mul_add(CURRENCY_LEVEL_SCALE, 1.0)
}

/// `currency + 0.5 * experience`, rounded.
pub fn estimated_value(experience: u64, currency: u64) -> u64 {
    #[allow(clippy::cast_precision_loss)]
    let value = (experience as f64).mul_add(0.5, currency as f64);
    round_to_u64(value)
}

/// Expected rewards for a quest of `duration` hours.
pub fn estimate(
    quest_type: QuestType,
    duration: f64,
    level: u32,
    attributes: &Attributes,
) -> RewardEstimate {
    let bonus = skill_bonus(attributes, quest_type);
    let experience = round_to_u64(base_xp(duration, level) * (1.0 + bonus));
    let currency = round_to_u64(base_currency(duration, level) * (1.0 + bonus));
    let chance = bonus
        .mul_add(20.0, duration.mul_add(5.0, 30.0))
        .min(MAX_RESOURCE_CHANCE);
    let resource_chances: BTreeMap<String, f64> = resources(quest_type)
        .iter()
        .map(|name| ((*name).to_owned(), chance))
        .collect();

    RewardEstimate {
        experience,
        currency,
        resource_chances,
        estimated_value: estimated_value(experience, currency),
    }
}

/// Roll the actual rewards for a finished quest.
pub fn realize(
    quest_type: QuestType,
    duration: f64,
    level: u32,
    attributes: &Attributes,
    rng: &mut impl Rng,
) -> RewardBundle {
    let bonus = skill_bonus(attributes, quest_type);
    let xp_roll = trunc(base_xp(duration, level) * rng.random_range(0.9..=1.1));
    let currency_roll = trunc(base_currency(duration, level) * rng.random_range(0.9..=1.1));

    let resource = resources(quest_type).choose(rng).map(|name| {
        let amount = trunc(
            duration * resource_yield_per_hour(quest_type) * (1.0 + bonus)
                * rng.random_range(0.8..=1.2),
        );
        ResourceDrop {
            resource_type: (*name).to_owned(),
            amount: round_to_u64(amount),
        }
    });

    let rare_item = (rng.random::<f64>() < RARE_CHANCE_PER_HOUR * duration)
        .then(|| rare_items(quest_type).choose(rng))
        .flatten()
        .map(|name| (*name).to_owned());

    RewardBundle {
        experience: round_to_u64(xp_roll * (1.0 + bonus)),
        currency: round_to_u64(currency_roll * (1.0 + bonus)),
        resource,
        rare_item,
    }
}

/// How much of the estimate was realized, in `[0, 1]`.
pub fn efficiency(realized: &RewardBundle, expected: &RewardEstimate) -> f64 {
    if expected.estimated_value == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = estimated_value(realized.experience, realized.currency) as f64
        / expected.estimated_value as f64;
    ratio.clamp(0.0, 1.0)
}

fn trunc(value: f64) -> f64 {
    if value.is_finite() { value.trunc().max(0.0) } else { 0.0 }
}

/// Round half to even and convert, clamping to `[0, u64::MAX]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // Float-to-int `as` saturates at u64::MAX.
    value.round_ties_even() as u64
}
