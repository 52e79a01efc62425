//! Weighted-random hero synthesis.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use serde::Serialize;

use questmind_types::{
    Appearance, Attribute, Attributes, GeneratedHero, HeroClass, Rarity, SummonOptions,
};

use crate::catalog::{
    CLASS_WEIGHT_OTHER, CLASS_WEIGHT_PREFERRED, CLASS_WEIGHT_UNIFORM, EYE_COLORS, HAIR_COLORS,
    HAIR_STYLES, RARITY_WEIGHTS, SKIN_TONES, STAT_FOCUS_BONUS, class_base_stats,
    rarity_multiplier,
};
use crate::error::EngineError;

/// Appearance values the player asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppearancePreference {
    /// Preferred hair style.
    pub hair_style: Option<String>,
    /// Preferred hair colour.
    pub hair_color: Option<String>,
    /// Preferred skin tone.
    pub skin_tone: Option<String>,
    /// Preferred eye colour.
    pub eye_color: Option<String>,
}

/// Draw tables and preferences for one summoning.
///
/// Also sent to the ledger with the summoning transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Class draw weights, in [`HeroClass::ALL`] order.
    pub class_weights: Vec<(HeroClass, f64)>,
    /// Rarity draw weights, in [`Rarity::ALL`] order.
    pub rarity_weights: Vec<(Rarity, f64)>,
    /// Attribute boosted by 30%.
    pub stat_focus: Option<Attribute>,
    /// Requested cosmetic traits.
    pub appearance_preference: AppearancePreference,
}

impl GenerationParams {
    /// Build draw tables from player options.
    ///
    /// A class preference moves the class table from uniform to
    /// 0.55 for the preferred class and 0.15 for each other.
    pub fn from_options(options: &SummonOptions) -> Self {
        let class_weights = HeroClass::ALL
            .iter()
            .map(|class| {
                let weight = match options.class_preference {
                    None => CLASS_WEIGHT_UNIFORM,
                    Some(pref) if pref == *class => CLASS_WEIGHT_PREFERRED,
                    Some(_) => CLASS_WEIGHT_OTHER,
                };
                (*class, weight)
            })
            .collect();
        Self {
            class_weights,
            rarity_weights: RARITY_WEIGHTS.to_vec(),
            stat_focus: options.stat_focus,
            appearance_preference: AppearancePreference {
                hair_style: options.hair_style.clone(),
                hair_color: options.hair_color.clone(),
                skin_tone: options.skin_tone.clone(),
                eye_color: options.eye_color.clone(),
            },
        }
    }
}

/// Synthesize a new hero from `params`.
///
/// Each attribute is `base * rarity * (1.3 if focused) * U(0.9, 1.1)`,
/// truncated. Appearance honours a preference only when it names a known
/// option.
pub fn generate(params: &GenerationParams, rng: &mut impl Rng) -> Result<GeneratedHero, EngineError> {
    let class = weighted_pick(&params.class_weights, "class", rng)?;
    let rarity = weighted_pick(&params.rarity_weights, "rarity", rng)?;

    let multiplier = rarity_multiplier(rarity);
    let mut attributes = Attributes::default();
    for (attribute, base) in Attribute::ALL.into_iter().zip(class_base_stats(class)) {
        let focus = if params.stat_focus == Some(attribute) {
            STAT_FOCUS_BONUS
        } else {
            1.0
        };
        let value = f64::from(base) * multiplier * focus * rng.random_range(0.9..=1.1);
        *attributes.get_mut(attribute) = truncate_stat(value);
    }

    let pref = &params.appearance_preference;
    let appearance = Appearance {
        hair_style: pick_trait(HAIR_STYLES, pref.hair_style.as_deref(), rng),
        hair_color: pick_trait(HAIR_COLORS, pref.hair_color.as_deref(), rng),
        skin_tone: pick_trait(SKIN_TONES, pref.skin_tone.as_deref(), rng),
        eye_color: pick_trait(EYE_COLORS, pref.eye_color.as_deref(), rng),
    };

    Ok(GeneratedHero {
        class,
        rarity,
        attributes,
        appearance,
    })
}

fn weighted_pick<T: Copy>(
    table: &[(T, f64)],
    name: &'static str,
    rng: &mut impl Rng,
) -> Result<T, EngineError> {
    let dist = WeightedIndex::new(table.iter().map(|(_, w)| *w))
        .map_err(|source| EngineError::InvalidWeights { table: name, source })?;
    table
        .get(dist.sample(rng))
        .map(|(item, _)| *item)
        .ok_or(EngineError::ArithmeticOverflow {
            context: "weighted index out of range",
        })
}

fn pick_trait(options: &[&str], preferred: Option<&str>, rng: &mut impl Rng) -> String {
    if let Some(preferred) = preferred.filter(|p| options.contains(p)) {
        return preferred.to_owned();
    }
    options.choose(rng).map_or_else(String::new, |o| (*o).to_owned())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_stat(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.trunc() as u32
}
