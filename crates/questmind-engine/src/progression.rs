//! Level-up economics: experience cost and stat-point distribution.

use questmind_types::{Attribute, Attributes};

use crate::error::EngineError;

/// Experience per squared level.
pub const XP_PER_LEVEL_SQUARED: u64 = 50;

/// Stat points granted per level gained.
pub const STAT_POINTS_PER_LEVEL: u32 = 5;

/// Experience needed to advance from `level` by `levels`:
/// `sum(50 * i^2)` for `i` in `level..level + levels`.
pub fn xp_required(level: u32, levels: u32) -> Result<u64, EngineError> {
    let overflow = || EngineError::ArithmeticOverflow {
        context: "experience requirement",
    };
    let end = u64::from(level).checked_add(u64::from(levels)).ok_or_else(overflow)?;
    (u64::from(level)..end).try_fold(0_u64, |acc, i| {
        i.checked_mul(i)
            .and_then(|sq| sq.checked_mul(XP_PER_LEVEL_SQUARED))
            .and_then(|cost| acc.checked_add(cost))
            .ok_or_else(overflow)
    })
}

/// Experience cost of the level after `level`, as shown on the hero sheet.
pub fn next_level_xp(level: u32) -> u64 {
    let level = u64::from(level);
    level.saturating_mul(level).saturating_mul(XP_PER_LEVEL_SQUARED)
}

/// Levels to gain toward `target` (default one), capped at `max_level`.
///
/// Callers validate `target > current` and `current < max_level` first.
pub fn levels_to_gain(current: u32, target: Option<u32>, max_level: u32) -> u32 {
    let headroom = max_level.saturating_sub(current);
    target.map_or(1, |t| t.saturating_sub(current)).min(headroom)
}

/// Split `5 * levels` stat points across the seven attributes.
///
/// With a focus, 60% (truncated) goes to it and the rest is shared by the
/// other six. Without one, 70% (truncated) is shared by the primary group
/// and the rest by the secondary group. Integer remainders go one point at
/// a time in enumeration order, so the parts always sum to the total.
pub fn distribute_stats(levels: u32, focus: Option<Attribute>) -> Attributes {
    let total = levels.saturating_mul(STAT_POINTS_PER_LEVEL);
    let mut out = Attributes::default();
    match focus {
        Some(focus) => {
            let focus_points = percent_of(total, 60);
            *out.get_mut(focus) = focus_points;
            let others: Vec<Attribute> =
                Attribute::ALL.into_iter().filter(|a| *a != focus).collect();
            share(&mut out, &others, total.saturating_sub(focus_points));
        }
        None => {
            let primary = percent_of(total, 70);
            share(&mut out, &Attribute::PRIMARY, primary);
            share(&mut out, &Attribute::SECONDARY, total.saturating_sub(primary));
        }
    }
    out
}

fn percent_of(total: u32, percent: u32) -> u32 {
    let scaled = u64::from(total).saturating_mul(u64::from(percent)) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Spread `points` evenly over `group`, remainder first-come.
fn share(out: &mut Attributes, group: &[Attribute], points: u32) {
    let Ok(len) = u32::try_from(group.len()) else {
        return;
    };
    let Some(each) = points.checked_div(len) else {
        return;
    };
    let leftover = points.saturating_sub(each.saturating_mul(len));
    for (i, attribute) in group.iter().enumerate() {
        let bonus = u32::from(u32::try_from(i).is_ok_and(|i| i < leftover));
        let slot = out.get_mut(*attribute);
        *slot = slot.saturating_add(each).saturating_add(bonus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_from_ten_to_twelve() {
        assert_eq!(xp_required(10, 2).ok(), Some(11_050));
    }

    #[test]
    fn single_level_cost_matches_sheet() {
        assert_eq!(xp_required(15, 1).ok(), Some(next_level_xp(15)));
        assert_eq!(next_level_xp(15), 11_250);
        assert_eq!(xp_required(7, 0).ok(), Some(0));
    }

    #[test]
    fn cost_overflow_is_an_error() {
        assert!(xp_required(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn levels_default_to_one_and_respect_ceiling() {
        assert_eq!(levels_to_gain(15, None, 100), 1);
        assert_eq!(levels_to_gain(15, Some(20), 100), 5);
        assert_eq!(levels_to_gain(98, Some(150), 100), 2);
    }

    #[test]
    fn focused_split_for_one_level() {
        // 5 points: focus 3, remaining 2 to strength then agility.
        let out = distribute_stats(1, Some(Attribute::Wisdom));
        assert_eq!(out.wisdom, 3);
        assert_eq!(out.strength, 1);
        assert_eq!(out.agility, 1);
        assert_eq!(out.intelligence, 0);
        assert_eq!(out.luck, 0);
    }

    #[test]
    fn focused_split_skips_focus_when_sharing_remainder() {
        // 10 points: focus 6, 4 across six others, strength is the focus.
        let out = distribute_stats(2, Some(Attribute::Strength));
        assert_eq!(out.strength, 6);
        assert_eq!(out.agility, 1);
        assert_eq!(out.intelligence, 1);
        assert_eq!(out.wisdom, 1);
        assert_eq!(out.vitality, 1);
        assert_eq!(out.endurance, 0);
    }

    #[test]
    fn unfocused_split_for_three_levels() {
        // 15 points: primary 10 (3,3,2,2), secondary 5 (2,2,1).
        let out = distribute_stats(3, None);
        assert_eq!(
            [out.strength, out.agility, out.intelligence, out.wisdom],
            [3, 3, 2, 2]
        );
        assert_eq!([out.vitality, out.endurance, out.luck], [2, 2, 1]);
    }

    #[test]
    fn distribution_always_sums_to_five_per_level() {
        let focuses = std::iter::once(None).chain(Attribute::ALL.into_iter().map(Some));
        for focus in focuses {
            for levels in 1..=60 {
                assert_eq!(distribute_stats(levels, focus).total(), levels * 5);
            }
        }
    }
}
