use chrono::{DateTime, Duration, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::{Clock, ParseError, RawItem};

mod date;
pub use date::parse_freeform;

/// How far out we assume a hold runs when Steam tells us there is one but the
/// date is unreadable. Matches the standard 7 day trade cooldown.
pub const COOLDOWN_FALLBACK_DAYS: i64 = 7;

/// Result of running one owner description through the rule cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched(DateTime<Utc>),
    NoMatch,
    Unparseable(String),
}

/// What to do when a rule's pattern matches but its extractor cannot produce a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    /// Treat the rule as not matching and keep going.
    Next,
    /// Assume a standard cooldown starting now.
    Cooldown,
    /// Give up on the text entirely.
    Reject,
}

struct Rule {
    name: &'static str,
    pattern: Regex,
    extract: fn(&Captures<'_>) -> Option<DateTime<Utc>>,
    fallback: Fallback,
}

lazy_static! {
    /// Historical phrasings, most specific first. New formats go in here.
    static ref RULES: Vec<Rule> = vec![
        Rule {
            name: "cooldown_until",
            pattern: Regex::new(r"(?is)On Trade Cooldown Until:\s*(?P<date>.+)").unwrap(),
            extract: |caps| parse_freeform(&crate::text::collapse_whitespace(&caps["date"])),
            fallback: Fallback::Cooldown,
        },
        Rule {
            name: "tradable_after_epoch",
            pattern: Regex::new(r"(?i)Tradable after:\s*\[date\](?P<epoch>-?\d+)\[/date\]").unwrap(),
            extract: |caps| {
                let epoch: i64 = caps["epoch"].parse().ok()?;
                if epoch <= 0 {
                    return None;
                }
                DateTime::from_timestamp(epoch, 0)
            },
            fallback: Fallback::Next,
        },
        Rule {
            name: "tradable_after_date",
            pattern: Regex::new(r"(?is)^Tradable After\s+(?P<date>.+)$").unwrap(),
            extract: |caps| {
                // "(Central European Summer Time)" goes as a whole, other parens are noise.
                let date = date::strip_zone_name(caps["date"].trim_end_matches('.').trim_end());
                let date: String = date.chars().filter(|c| !matches!(c, '(' | ')')).collect();
                parse_freeform(&crate::text::collapse_whitespace(&date))
            },
            fallback: Fallback::Cooldown,
        },
        Rule {
            name: "tradable_after_unknown",
            pattern: Regex::new(r"(?i)^Tradable After").unwrap(),
            extract: |_| None,
            fallback: Fallback::Reject,
        },
    ];
}

/// Runs a single piece of text through the rule cascade.
pub fn evaluate(text: &str, clock: &dyn Clock) -> Outcome {
    let text = text.trim();

    for rule in RULES.iter() {
        let Some(captures) = rule.pattern.captures(text) else {
            continue;
        };

        if let Some(ts) = (rule.extract)(&captures) {
            tracing::debug!(rule = rule.name, %ts, "Matched trade hold");
            return Outcome::Matched(ts);
        }

        match rule.fallback {
            Fallback::Next => continue,
            Fallback::Cooldown => {
                let ts = clock.now() + Duration::days(COOLDOWN_FALLBACK_DAYS);
                tracing::warn!(rule = rule.name, text, %ts, "Could not parse trade hold date, assuming cooldown");
                return Outcome::Matched(ts);
            }
            Fallback::Reject => {
                tracing::error!(rule = rule.name, text, "Unrecognized trade hold text");
                return Outcome::Unparseable(text.to_string());
            }
        }
    }

    Outcome::NoMatch
}

/// Finds when a non-tradable item becomes tradable again.
///
/// Tradable items never have a hold. Otherwise every owner description is
/// checked in order; the first matched timestamp wins and the first
/// unparseable "Tradable After" text aborts with a [`ParseError`].
pub fn trade_hold(item: &RawItem, clock: &dyn Clock) -> Result<Option<DateTime<Utc>>, ParseError> {
    if item.is_tradable() {
        return Ok(None);
    }

    for text in item.array("owner_descriptions").iter().filter_map(description_text) {
        match evaluate(text, clock) {
            Outcome::Matched(ts) => return Ok(Some(ts)),
            Outcome::NoMatch => {}
            Outcome::Unparseable(text) => return Err(ParseError::UnrecognizedTradeHold { text }),
        }
    }

    Ok(None)
}

/// Renders a timestamp the way listings carry it, e.g. `2017-04-19T23:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn description_text(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(s) => Some(s.as_str()),
        Value::Object(o) => o.get("value").and_then(Value::as_str),
        _ => None,
    }
}
