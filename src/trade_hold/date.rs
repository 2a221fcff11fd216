use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const DATETIME_FORMATS: &[&str] = &[
    // Apr 26, 2017 7:00:00
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    // April 26, 2017 7:00:00
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    // Wed Apr 26 2017 07:00:00
    "%a %b %d %Y %H:%M:%S",
    "%a, %b %d, %Y %H:%M:%S",
    // 26 Apr 2017 07:00:00
    "%d %b %Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%b %d, %Y",
    "%B %d, %Y",
    "%a %b %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%m-%d",
];

/// Parses the human readable dates Steam has put into owner descriptions over
/// the years. Times without an explicit offset are UTC.
pub fn parse_freeform(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim().trim_end_matches('.').trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(text) {
        return Some(ts.with_timezone(&Utc));
    }

    let text = strip_zone_name(text);
    let (text, offset) = split_offset(text)?;

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return offset
                .from_local_datetime(&naive)
                .single()
                .map(|ts| ts.with_timezone(&Utc));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return offset
                .from_local_datetime(&naive)
                .single()
                .map(|ts| ts.with_timezone(&Utc));
        }
    }

    None
}

/// Drops a trailing "(Coordinated Universal Time)" style zone name.
pub(super) fn strip_zone_name(text: &str) -> &str {
    if !text.ends_with(')') {
        return text;
    }

    match text.rfind('(') {
        Some(idx) if text[idx..].chars().any(|c| c.is_alphabetic()) => text[..idx].trim_end(),
        _ => text,
    }
}

/// Splits a trailing zone token (`GMT`, `UTC`, `Z`, `GMT+0200`, `-0500`) off
/// the text. Returns `None` if the token looks like an offset but is malformed.
fn split_offset(text: &str) -> Option<(&str, FixedOffset)> {
    let utc = FixedOffset::east_opt(0)?;

    let Some((head, token)) = text.rsplit_once(' ') else {
        return Some((text, utc));
    };

    let numeric = match token {
        "GMT" | "UTC" | "Z" => return Some((head.trim_end(), utc)),
        t if t.starts_with("GMT") || t.starts_with("UTC") => &t[3..],
        t if t.starts_with('+') || t.starts_with('-') => t,
        _ => return Some((text, utc)),
    };

    Some((head.trim_end(), parse_offset(numeric)?))
}

fn parse_offset(token: &str) -> Option<FixedOffset> {
    let (sign, digits) = match token.as_bytes().first()? {
        b'+' => (1, &token[1..]),
        b'-' => (-1, &token[1..]),
        _ => return None,
    };

    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
