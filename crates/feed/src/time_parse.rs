// ABOUTME: RFC 822 and ISO 8601 date parsing for RSS/Atom feed dates.
// ABOUTME: Each family is an ordered pattern list; the first pattern that parses wins.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc, Weekday};

/// How the trailing zone of a pattern is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// Numeric offset parsed by chrono as part of the layout.
    Offset,
    /// Last whitespace-separated token: a zone name (GMT, PST, ...) or numeric offset.
    Named,
    /// No zone; interpreted as UTC. Trailing text after the layout is ignored.
    Utc,
}

#[derive(Debug, Clone, Copy)]
struct Pattern {
    layout: &'static str,
    zone: Zone,
}

const fn pattern(layout: &'static str, zone: Zone) -> Pattern {
    Pattern { layout, zone }
}

/// RFC 822 dates carrying a leading `Weekday,`. The weekday itself is
/// stripped before these layouts are applied.
const RFC822_WITH_WEEKDAY: &[Pattern] = &[
    pattern("%d %B %Y %H:%M:%S %z", Zone::Offset),
    pattern("%d %B %Y %H:%M:%S", Zone::Named),
    pattern("%d %B %Y %H:%M", Zone::Named),
    pattern("%d %B %Y %H:%M:%S", Zone::Utc),
    pattern("%d %B %Y %H:%M", Zone::Utc),
];

const RFC822_WITHOUT_WEEKDAY: &[Pattern] = &[
    pattern("%d %B %Y %H:%M:%S", Zone::Named),
    pattern("%d %B %Y %H:%M", Zone::Named),
    pattern("%d %B %Y %H:%M:%S", Zone::Utc),
    pattern("%d %B %Y %H:%M", Zone::Utc),
];

const ISO8601: &[Pattern] = &[
    pattern("%Y-%m-%dT%H:%M:%S%z", Zone::Offset),
    pattern("%Y-%m-%dT%H:%M:%S%:z", Zone::Offset),
    pattern("%Y-%m-%dT%H:%M:%S%.f%:z", Zone::Offset),
    pattern("%Y-%m-%dT%H:%M:%S", Zone::Utc),
];

/// Named zones accepted where RFC 822 allows a zone abbreviation.
const NAMED_ZONES: &[(&str, i32)] = &[
    ("GMT", 0),
    ("UT", 0),
    ("UTC", 0),
    ("Z", 0),
    ("EST", -5 * 3600),
    ("EDT", -4 * 3600),
    ("CST", -6 * 3600),
    ("CDT", -5 * 3600),
    ("MST", -7 * 3600),
    ("MDT", -6 * 3600),
    ("PST", -8 * 3600),
    ("PDT", -7 * 3600),
    ("AKST", -9 * 3600),
    ("AKDT", -8 * 3600),
    ("HST", -10 * 3600),
    ("AST", -4 * 3600),
    ("ADT", -3 * 3600),
    ("NST", -(3 * 3600 + 30 * 60)),
    ("NDT", -(2 * 3600 + 30 * 60)),
    ("WET", 0),
    ("WEST", 3600),
    ("BST", 3600),
    ("CET", 3600),
    ("CEST", 2 * 3600),
    ("EET", 2 * 3600),
    ("EEST", 3 * 3600),
    ("MSK", 3 * 3600),
    ("JST", 9 * 3600),
    ("KST", 9 * 3600),
    ("AWST", 8 * 3600),
    ("AEST", 10 * 3600),
    ("AEDT", 11 * 3600),
    ("NZST", 12 * 3600),
    ("NZDT", 13 * 3600),
];

/// Parses an RFC 822 date (`pubDate`, `lastBuildDate`).
///
/// A comma in the input selects the `Weekday, d Mon yyyy ...` family, its
/// absence the `d Mon yyyy ...` family. Returns `None` when no pattern of the
/// selected family matches.
pub fn parse_rfc822(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    match s.split_once(',') {
        Some((weekday, rest)) => {
            // The weekday is checked for shape only; feeds often get it wrong.
            weekday.trim().parse::<Weekday>().ok()?;
            first_match(rest.trim(), RFC822_WITH_WEEKDAY)
        }
        None => first_match(s, RFC822_WITHOUT_WEEKDAY),
    }
}

/// Parses an ISO 8601 / RFC 3339 date (Atom `published`, `updated`).
///
/// A trailing `Z` designator is read as `+00:00`.
pub fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let normalized = match s.strip_suffix(['Z', 'z']) {
        Some(base) => format!("{base}+00:00"),
        None => s.to_string(),
    };
    first_match(&normalized, ISO8601)
}

fn first_match(s: &str, patterns: &[Pattern]) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    patterns.iter().find_map(|p| apply(s, p))
}

fn apply(s: &str, pattern: &Pattern) -> Option<DateTime<Utc>> {
    match pattern.zone {
        Zone::Offset => DateTime::parse_from_str(s, pattern.layout)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Zone::Named => {
            let (base, zone) = s.rsplit_once(char::is_whitespace)?;
            let offset = parse_zone(zone)?;
            let naive = NaiveDateTime::parse_from_str(base.trim_end(), pattern.layout).ok()?;
            offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
        }
        Zone::Utc => NaiveDateTime::parse_and_remainder(s, pattern.layout)
            .ok()
            .map(|(naive, _)| Utc.from_utc_datetime(&naive)),
    }
}

/// Resolves a zone token: a known abbreviation, `GMT+hh:mm`, or a bare offset.
fn parse_zone(token: &str) -> Option<FixedOffset> {
    if let Some(&(_, secs)) = NAMED_ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
    {
        return FixedOffset::east_opt(secs);
    }

    let numeric = token
        .strip_prefix("GMT")
        .or_else(|| token.strip_prefix("UTC"))
        .unwrap_or(token);
    parse_numeric_offset(numeric)
}

/// Parses `+hhmm`, `-hh:mm` or `+hh`.
fn parse_numeric_offset(s: &str) -> Option<FixedOffset> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
