//! Turns raw chat.log lines into [`ParsedEvent`]s.
//!
//! Parsing is best effort and total: anything unrecognised, or recognised
//! but carrying malformed numbers, yields `None`. Matchers run in priority
//! order so a line can produce at most one event (a critical hit line is a
//! single `damage_dealt { critical: true }`).

pub mod line;
pub mod skills;

pub use line::{parse_log_timestamp, split_log_line, LogLine};
pub use skills::{categorize_skill, is_attribute};

use crate::events::{EventKind, ParsedEvent, SkillCategory};

const CHANNEL_SYSTEM: &str = "System";
const CHANNEL_GLOBALS: &str = "Globals";

const CRITICAL_PREFIX: &str = "critical hit - additional damage! ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// When set, globals and HoFs of other avatars are dropped.
    pub player_name: Option<String>,
}

/// Line parser carrying [`ParserOptions`].
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    options: ParserOptions,
}

impl LineParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse one raw line (full chat.log line or bare message).
    pub fn parse(&self, timestamp: i64, raw: &str) -> Option<ParsedEvent> {
        let kind = match split_log_line(raw) {
            Some(line) => match line.channel {
                CHANNEL_SYSTEM => parse_system_message(line.message),
                CHANNEL_GLOBALS => parse_global_message(line.message, &self.options),
                _ => None,
            },
            None => {
                let message = raw.trim();
                parse_system_message(message)
                    .or_else(|| parse_global_message(message, &self.options))
            }
        }?;
        Some(ParsedEvent::new(timestamp, raw, kind))
    }
}

/// Parse one raw line with default options.
pub fn parse_line(timestamp: i64, raw: &str) -> Option<ParsedEvent> {
    LineParser::default().parse(timestamp, raw)
}

/// Message text with an ASCII-lowercased copy for case-insensitive matching.
/// Lowercasing ASCII keeps byte offsets, so slices of `lower` map onto `text`.
struct Message<'a> {
    text: &'a str,
    lower: String,
}

impl<'a> Message<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_ascii_lowercase(),
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.lower.starts_with(prefix)
    }

    fn contains(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    /// Original-case remainder after a lowercase prefix.
    fn after(&self, prefix: &str) -> Option<&'a str> {
        if self.lower.starts_with(prefix) {
            Some(&self.text[prefix.len()..])
        } else {
            None
        }
    }

    /// Original-case remainder after the first occurrence of a lowercase needle.
    fn after_first(&self, needle: &str) -> Option<&'a str> {
        let index = self.lower.find(needle)?;
        Some(&self.text[index + needle.len()..])
    }

    fn without_prefix(&self, prefix: &str) -> Option<Message<'a>> {
        self.after(prefix).map(Message::new)
    }
}

type Matcher = fn(&Message<'_>) -> Option<EventKind>;

const SYSTEM_MATCHERS: &[Matcher] = &[
    match_damage_dealt,
    match_damage_taken,
    match_deflect,
    match_damage_reduced,
    match_offense_outcome,
    match_defense_outcome,
    match_healing,
    match_mining,
    match_loot,
    match_skill,
    match_life,
];

fn parse_system_message(text: &str) -> Option<EventKind> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let message = Message::new(text);
    SYSTEM_MATCHERS
        .iter()
        .find_map(|matcher| matcher(&message))
}

/// Parse a decimal amount. Only digits and one decimal point are accepted,
/// so `NaN`, `inf`, signs and exponents are rejected.
fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Split a leading decimal number off `text`.
fn leading_amount(text: &str) -> Option<(f64, &str)> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let amount = parse_amount(&text[..end])?;
    Some((amount, &text[end..]))
}

/// Amount in `prefix N points...`.
fn points_after(message: &Message<'_>, prefix: &str) -> Option<f64> {
    let rest = message.after(prefix)?;
    let (amount, tail) = leading_amount(rest)?;
    tail.trim_start()
        .to_ascii_lowercase()
        .starts_with("point")
        .then_some(amount)
}

fn clean_name(text: &str) -> Option<String> {
    let name = text.trim().trim_end_matches(['!', '.']).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn match_damage_dealt(message: &Message<'_>) -> Option<EventKind> {
    let (message, critical) = match message.without_prefix(CRITICAL_PREFIX) {
        Some(inner) => (inner, true),
        None => (Message::new(message.text), false),
    };
    let amount = points_after(&message, "you inflicted ")?;
    Some(EventKind::DamageDealt { amount, critical })
}

fn match_damage_taken(message: &Message<'_>) -> Option<EventKind> {
    let (message, critical) = match message.without_prefix(CRITICAL_PREFIX) {
        Some(inner) => (inner, true),
        None => (Message::new(message.text), false),
    };
    let amount = points_after(&message, "you took ")?;
    Some(EventKind::DamageTaken { amount, critical })
}

fn match_deflect(message: &Message<'_>) -> Option<EventKind> {
    message
        .starts_with("damage deflected")
        .then_some(EventKind::Deflect)
}

fn match_damage_reduced(message: &Message<'_>) -> Option<EventKind> {
    let amount = points_after(message, "reduced ")?;
    Some(EventKind::DamageReduced { amount })
}

fn match_offense_outcome(message: &Message<'_>) -> Option<EventKind> {
    if message.starts_with("you missed") {
        return Some(EventKind::Miss);
    }
    if message.starts_with("the target dodged") {
        return Some(EventKind::TargetDodged);
    }
    if message.starts_with("the target evaded") {
        return Some(EventKind::TargetEvaded);
    }
    if message.starts_with("the target resisted") || message.starts_with("the target jammed") {
        return Some(EventKind::TargetResisted);
    }
    if message.starts_with("target out of range") || message.starts_with("out of range") {
        return Some(EventKind::OutOfRange);
    }
    None
}

fn match_defense_outcome(message: &Message<'_>) -> Option<EventKind> {
    if message.starts_with("you dodged") {
        return Some(EventKind::PlayerDodged);
    }
    if message.starts_with("you evaded") {
        return Some(EventKind::PlayerEvaded);
    }
    if message.starts_with("the attack missed you") {
        return Some(EventKind::EnemyMissed);
    }
    None
}

fn match_healing(message: &Message<'_>) -> Option<EventKind> {
    if message.starts_with("you healed yourself ") {
        let amount = points_after(message, "you healed yourself ")?;
        return Some(EventKind::SelfHeal { amount });
    }
    if message.starts_with("you were healed ") {
        let amount = points_after(message, "you were healed ")?;
        return Some(EventKind::HealedBy { amount });
    }
    if message.starts_with("you healed ") {
        let rest = Message::new(message.after("you healed ")?);
        let amount = points_after(&Message::new(rest.after_first(" with ")?), "")?;
        return Some(EventKind::HealGiven { amount });
    }
    None
}

fn match_mining(message: &Message<'_>) -> Option<EventKind> {
    if message.starts_with("you have claimed a resource") {
        let value = ped_value(message)?;
        return Some(EventKind::MiningClaim { value });
    }
    if message.starts_with("this resource is depleted")
        || message.starts_with("no resources found")
        || message.starts_with("you did not find any resources")
    {
        return Some(EventKind::MiningNoFind);
    }
    None
}

/// Amount in `... Value: N PED`.
fn ped_value(message: &Message<'_>) -> Option<f64> {
    let rest = message.after_first("value: ")?;
    let (value, tail) = leading_amount(rest)?;
    tail.trim_start()
        .to_ascii_lowercase()
        .starts_with("ped")
        .then_some(value)
}

/// `You received ITEM x (Q) Value: N PED`
fn match_loot(message: &Message<'_>) -> Option<EventKind> {
    let body = message.after("you received ")?;
    let body_message = Message::new(body);
    let marker = body_message.lower.rfind(" x (")?;
    let item_name = clean_name(&body[..marker])?;

    let after_marker = &body[marker + " x (".len()..];
    let close = after_marker.find(')')?;
    let quantity_text = after_marker[..close].trim();
    if quantity_text.is_empty() || !quantity_text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let quantity = quantity_text.parse::<u32>().ok()?;

    let value = ped_value(&Message::new(&after_marker[close + 1..]))?;
    Some(EventKind::Loot {
        value,
        item_name,
        quantity,
    })
}

fn skill_gain(amount: f64, name: String) -> EventKind {
    match categorize_skill(&name) {
        SkillCategory::Attributes => EventKind::AttributeGain {
            amount,
            skill_name: name,
        },
        skill_category => EventKind::SkillGain {
            amount,
            skill_name: name,
            skill_category,
        },
    }
}

fn match_skill(message: &Message<'_>) -> Option<EventKind> {
    if let Some(rest) = message.after("you have gained a new rank in ") {
        return Some(EventKind::SkillRank {
            skill_name: clean_name(rest)?,
        });
    }
    if let Some(rest) = message.after("you have acquired a new skill") {
        let rest = rest.trim_start_matches([':', ';', ',', ' ']);
        return Some(EventKind::SkillAcquired {
            skill_name: clean_name(rest)?,
        });
    }
    if let Some(rest) = message.after("you have gained ") {
        let (amount, tail) = leading_amount(rest)?;
        let tail_message = Message::new(tail.trim());
        if let Some(skill) = tail_message.after("experience in your ") {
            let skill_message = Message::new(skill);
            let name = match skill_message.lower.rfind(" skill") {
                Some(end) => &skill[..end],
                None => skill,
            };
            return Some(skill_gain(amount, clean_name(name)?));
        }
        return Some(skill_gain(amount, clean_name(tail_message.text)?));
    }
    if let Some(rest) = message.after("your ") {
        let rest_message = Message::new(rest);
        let split = rest_message.lower.find(" has improved by ")?;
        let name = clean_name(&rest[..split])?;
        let (amount, _) = leading_amount(&rest[split + " has improved by ".len()..])?;
        return Some(skill_gain(amount, name));
    }
    None
}

fn match_life(message: &Message<'_>) -> Option<EventKind> {
    if message.starts_with("you were killed")
        || message.starts_with("you have been killed")
        || message.starts_with("you died")
    {
        return Some(EventKind::Death);
    }
    if message.starts_with("you have been revived") || message.starts_with("you were revived") {
        return Some(EventKind::Revive);
    }
    None
}

const GLOBAL_ACTIONS: &[&str] = &[
    " killed a creature",
    " found a deposit",
    " constructed an item",
    " has found a rare item",
];

fn parse_global_message(text: &str, options: &ParserOptions) -> Option<EventKind> {
    let message = Message::new(text.trim());
    let (player, action_start) = GLOBAL_ACTIONS.iter().find_map(|action| {
        let index = message.lower.find(action)?;
        Some((message.text[..index].trim(), index))
    })?;
    if player.is_empty() {
        return None;
    }
    if let Some(own_name) = options.player_name.as_deref() {
        if !own_name.trim().eq_ignore_ascii_case(player) {
            return None;
        }
    }

    let action = Message::new(&message.text[action_start..]);
    let value_text = action
        .after_first("with a value of ")
        .or_else(|| action.after_first(" worth "));
    let value = match value_text {
        Some(rest) => Some(leading_amount(rest)?.0),
        None => None,
    };

    let player = Some(player.to_string());
    if message.contains("hall of fame") {
        Some(EventKind::Hof { player, value })
    } else {
        Some(EventKind::Global { player, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(raw: &str) -> Option<EventKind> {
        parse_line(0, raw).map(|event| event.kind)
    }

    #[test]
    fn critical_damage_is_one_event() {
        assert_eq!(
            kind("Critical hit - Additional damage! You inflicted 90.4 points of damage"),
            Some(EventKind::DamageDealt {
                amount: 90.4,
                critical: true
            })
        );
    }

    #[test]
    fn malformed_amount_drops_line() {
        assert_eq!(kind("You inflicted NaN points of damage"), None);
        assert_eq!(kind("You inflicted inf points of damage"), None);
        assert_eq!(kind("You inflicted 1.2.3 points of damage"), None);
        assert_eq!(kind("You took -5 points of damage"), None);
    }

    #[test]
    fn leading_amount_splits_number() {
        let (value, rest) = leading_amount(" 12.50 points").expect("number");
        assert_eq!(value, 12.5);
        assert_eq!(rest, " points");
        assert!(leading_amount("points").is_none());
    }

    #[test]
    fn loot_item_name_may_contain_x() {
        assert_eq!(
            kind("You received Animal Hide x (3) Value: 0.06 PED"),
            Some(EventKind::Loot {
                value: 0.06,
                item_name: "Animal Hide".to_string(),
                quantity: 3
            })
        );
        assert_eq!(
            kind("You received Xeno Ichor x (1) Value: 1.50 PED"),
            Some(EventKind::Loot {
                value: 1.5,
                item_name: "Xeno Ichor".to_string(),
                quantity: 1
            })
        );
    }

    #[test]
    fn loot_with_bad_quantity_is_dropped() {
        assert_eq!(kind("You received Shrapnel x (lots) Value: 0.5 PED"), None);
        assert_eq!(kind("You received Shrapnel x (5) Value: ? PED"), None);
    }

    #[test]
    fn chat_channels_never_produce_events() {
        assert_eq!(
            kind("2024-01-15 12:00:00 [Rookie] [Someone] You inflicted 10 points of damage"),
            None
        );
    }

    #[test]
    fn globals_filtered_by_player_name() {
        let parser = LineParser::new(ParserOptions {
            player_name: Some("Jane Doe".to_string()),
        });
        let own = "2024-01-15 12:00:00 [Globals] [] Jane Doe killed a creature (Atrox Young) with a value of 55 PED!";
        let other = "2024-01-15 12:00:00 [Globals] [] John Roe killed a creature (Atrox Young) with a value of 55 PED!";
        assert!(parser.parse(0, own).is_some());
        assert!(parser.parse(0, other).is_none());
    }
}
