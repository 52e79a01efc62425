//! Instruction text to [`ParsedCommand`].
//!
//! Classification is deterministic substring matching against the
//! [`catalog`](crate::catalog) tables: the lower-cased text is scanned for
//! each intent's trigger phrases in catalog order and the first hit wins.
//! Parameters are then extracted per intent, followed by a generic numeric
//! quantity pass that only looks at numbers no earlier extractor consumed.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use questmind_types::{CommandParams, Intent, ParsedCommand, QuestRequest};

use crate::catalog::{
    AUTO_QUEST_TRIGGERS, FOCUS_SKILLS, INTENT_TRIGGERS, ITEM_STOP_WORDS, QUEST_TRIGGERS,
};

#[allow(clippy::expect_used)]
static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:hour|hours|hr|hrs)").expect("valid regex"));
#[allow(clippy::expect_used)]
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:minute|minutes|min|mins)").expect("valid regex"));
#[allow(clippy::expect_used)]
static TARGET_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"to level (\d+)").expect("valid regex"));
#[allow(clippy::expect_used)]
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d+)\b").expect("valid regex"));

const MINUTES_PER_HOUR: f64 = 60.0;

/// Classify `text` and extract its raw parameters.
///
/// Pure: the same text always yields the same command.
pub fn parse(text: &str) -> ParsedCommand {
    let text = text.to_lowercase();
    let intent = classify(&text);

    let mut params = CommandParams::default();
    let mut consumed: Vec<Range<usize>> = Vec::new();

    match intent {
        Intent::Quest => extract_quest(&text, &mut params, &mut consumed),
        Intent::LevelUp => extract_level_up(&text, &mut params, &mut consumed),
        Intent::BuyItems => extract_item(&text, &mut params),
        Intent::CollectRewards | Intent::CheckStatus | Intent::Unknown => {}
    }
    extract_quantity(&text, &mut params, &consumed);

    ParsedCommand { intent, params }
}

/// First intent whose trigger phrase occurs in `text`.
pub fn classify(text: &str) -> Intent {
    INTENT_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
        .map_or(Intent::Unknown, |(intent, _)| *intent)
}

fn extract_quest(text: &str, params: &mut CommandParams, consumed: &mut Vec<Range<usize>>) {
    params.quest_type = QUEST_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
        .map(|(kind, _)| QuestRequest::Kind(*kind))
        .or_else(|| {
            AUTO_QUEST_TRIGGERS
                .iter()
                .any(|t| text.contains(t))
                .then_some(QuestRequest::Auto)
        });

    if let Some((hours, span)) = capture_u32(&HOURS_RE, text) {
        params.duration = Some(f64::from(hours));
        consumed.push(span);
    } else if let Some((minutes, span)) = capture_u32(&MINUTES_RE, text) {
        params.duration = Some(f64::from(minutes) / MINUTES_PER_HOUR);
        consumed.push(span);
    }
}

fn extract_level_up(text: &str, params: &mut CommandParams, consumed: &mut Vec<Range<usize>>) {
    if let Some((level, span)) = capture_u32(&TARGET_LEVEL_RE, text) {
        params.target_level = Some(level);
        consumed.push(span);
    }
    params.focus_skill = FOCUS_SKILLS
        .iter()
        .copied()
        .find(|skill| text.contains(skill.as_str()));
}

/// Item name: the words after the purchase trigger, skipping leading
/// numbers and articles, up to a stop word or a number.
fn extract_item(text: &str, params: &mut CommandParams) {
    let Some(rest) = INTENT_TRIGGERS
        .iter()
        .filter(|(intent, _)| *intent == Intent::BuyItems)
        .flat_map(|(_, triggers)| triggers.iter())
        .find_map(|t| text.find(t).and_then(|at| text.get(at.saturating_add(t.len())..)))
    else {
        return;
    };

    let words: Vec<&str> = rest
        .trim_start_matches(['s', ':'])
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .skip_while(|w| is_number(w) || matches!(*w, "a" | "an" | "the" | "some"))
        .take_while(|w| !is_number(w) && !ITEM_STOP_WORDS.contains(w))
        .collect();

    if !words.is_empty() {
        params.item = Some(words.join(" "));
    }
}

fn extract_quantity(text: &str, params: &mut CommandParams, consumed: &[Range<usize>]) {
    if params.quantity.is_some() {
        return;
    }
    params.quantity = NUMBER_RE
        .find_iter(text)
        .filter(|m| !consumed.iter().any(|span| span.start < m.end() && m.start() < span.end))
        .find_map(|m| saturating_u32(m.as_str()));
}

/// First capture group of `re` as a `u32`, with the whole match's span.
fn capture_u32(re: &Regex, text: &str) -> Option<(u32, Range<usize>)> {
    let caps = re.captures(text)?;
    let whole = caps.get(0)?;
    let value = saturating_u32(caps.get(1)?.as_str())?;
    Some((value, whole.range()))
}

/// ASCII digits as a `u32`, saturating at `u32::MAX` on overflow.
fn saturating_u32(digits: &str) -> Option<u32> {
    if !is_number(digits) {
        return None;
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

fn is_number(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use questmind_types::{Attribute, QuestType};

    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn mining_quest_with_hours() {
        let cmd = parse("start mining quest for 3 hours");
        assert_eq!(cmd.intent, Intent::Quest);
        assert_eq!(cmd.params.quest_type, Some(QuestRequest::Kind(QuestType::Mining)));
        assert!(approx(cmd.params.duration, 3.0));
        assert_eq!(cmd.params.quantity, None);
        assert_eq!(
            serde_json::to_value(&cmd.params).ok(),
            Some(serde_json::json!({"quest_type": "mining", "duration": 3.0}))
        );
    }

    #[test]
    fn minutes_become_fractional_hours() {
        let cmd = parse("start fishing for 90 minutes");
        assert_eq!(cmd.intent, Intent::Quest);
        assert_eq!(cmd.params.quest_type, Some(QuestRequest::Kind(QuestType::Fishing)));
        assert!(approx(cmd.params.duration, 1.5));
    }

    #[test]
    fn hours_pattern_wins_over_minutes() {
        let cmd = parse("go on quest to dig for 2 hours and 30 minutes");
        assert!(approx(cmd.params.duration, 2.0));
        assert_eq!(cmd.params.quest_type, Some(QuestRequest::Kind(QuestType::Mining)));
        // 30 was not consumed by the duration extractor.
        assert_eq!(cmd.params.quantity, Some(30));
    }

    #[test]
    fn level_up_with_target_and_focus() {
        let cmd = parse("Level up to level 20 focus strength");
        assert_eq!(cmd.intent, Intent::LevelUp);
        assert_eq!(cmd.params.target_level, Some(20));
        assert_eq!(cmd.params.focus_skill, Some(Attribute::Strength));
        assert_eq!(cmd.params.quantity, None);
    }

    #[test]
    fn focus_takes_first_listed_attribute() {
        let cmd = parse("train hero wisdom and agility");
        assert_eq!(cmd.params.focus_skill, Some(Attribute::Agility));
    }

    #[test]
    fn quest_without_sub_type_leaves_it_absent() {
        let cmd = parse("start quest for 2 hours");
        assert_eq!(cmd.intent, Intent::Quest);
        assert_eq!(cmd.params.quest_type, None);
    }

    #[test]
    fn auto_phrases_request_optimizer() {
        let cmd = parse("start quest, pick the best quest for 4 hrs");
        assert_eq!(cmd.params.quest_type, Some(QuestRequest::Auto));
        assert!(approx(cmd.params.duration, 4.0));
    }

    #[test]
    fn intents_follow_catalog_order() {
        assert_eq!(parse("collect rewards please").intent, Intent::CollectRewards);
        assert_eq!(parse("show stats").intent, Intent::CheckStatus);
        // "quest for" outranks "level up".
        assert_eq!(parse("level up then quest for gold").intent, Intent::Quest);
    }

    #[test]
    fn unknown_text() {
        let cmd = parse("sing a song for 2 hours");
        assert_eq!(cmd.intent, Intent::Unknown);
        assert_eq!(cmd.params.duration, None);
        assert_eq!(cmd.params.quantity, Some(2));
    }

    #[test]
    fn buy_items_extracts_item_and_quantity() {
        let cmd = parse("buy item health potion x 3");
        assert_eq!(cmd.intent, Intent::BuyItems);
        assert_eq!(cmd.params.item.as_deref(), Some("health potion"));
        assert_eq!(cmd.params.quantity, Some(3));

        let cmd = parse("purchase gear: 2 iron swords for my hero");
        assert_eq!(cmd.params.item.as_deref(), Some("iron swords"));
        assert_eq!(cmd.params.quantity, Some(2));
    }

    #[test]
    fn oversized_numbers_saturate() {
        let cmd = parse("start mining for 99999999999 hours");
        assert_eq!(cmd.params.duration, Some(f64::from(u32::MAX)));

        let cmd = parse("level up to level 5000000000");
        assert_eq!(cmd.params.target_level, Some(u32::MAX));

        let cmd = parse("buy item arrows x 123456789012345678901234567890");
        assert_eq!(cmd.params.quantity, Some(u32::MAX));
    }

    #[test]
    fn parse_is_deterministic() {
        let text = "begin quest fishing 45 min";
        assert_eq!(parse(text), parse(text));
        assert!(approx(parse(text).params.duration, 0.75));
    }
}
