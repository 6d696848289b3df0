// src/extract/dates.rs
//! Date recognizer: finds date substrings in several locale formats and
//! decides whether a found date still lies ahead.
//!
//! Recognized grammars (case-insensitive):
//! - `del 1 de julio al 5 de julio de 2026` (long range, Spanish/Catalan)
//! - `del 1 al 5 de julio de 2026` (short range)
//! - `12-14 de julio de 2026`, `12-14 julio 2026` (hyphenated day range)
//! - `from 3 to 5 July 2026`
//! - `5 de julio de 2026`, `5 d'octubre de 2026` (long single date)
//! - `05/07/2026`, `5-7-26` (numeric day/month/year)
//! - `2026-07-05` (ISO)
//! - `July 5, 2026` (English month name first)
//!
//! The future check is fail-open: anything ambiguous counts as upcoming.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// A date substring with its byte span inside the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

const MONTH_OF: &str = r"(?:de\s+|d['’])\p{L}+";
const EN_MONTHS: &str =
    r"(?:january|february|march|april|may|june|july|august|september|october|november|december)";

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let sources = [
        format!(r"(?i)\bdel\s+\d{{1,2}}\s+{MONTH_OF}\s+al\s+\d{{1,2}}\s+{MONTH_OF}\s+de\s+\d{{4}}\b"),
        format!(r"(?i)\bdel\s+\d{{1,2}}\s+al\s+\d{{1,2}}\s+{MONTH_OF}\s+de\s+\d{{4}}\b"),
        r"(?i)\b\d{1,2}\s*[-–]\s*\d{1,2}\s+(?:(?:de\s+|d['’])\p{L}+\s+de|\p{L}+)\s+\d{4}\b".to_string(),
        r"(?i)\bfrom\s+\d{1,2}(?:\s+\p{L}+)?\s+to\s+\d{1,2}\s+\p{L}+,?\s+\d{4}\b".to_string(),
        format!(r"(?i)\b\d{{1,2}}\s+{MONTH_OF}\s+de\s+\d{{4}}\b"),
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b".to_string(),
        r"\b\d{4}-\d{1,2}-\d{1,2}\b".to_string(),
        format!(r"(?i)\b{EN_MONTHS}\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"),
    ];
    sources
        .iter()
        .map(|s| Regex::new(s).expect("date pattern"))
        .collect()
});

/// Shapes that describe more than one day.
static MULTI_DAY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bdel\s+\d{1,2}\s+(?:(?:de\s+|d['’])\p{L}+\s+)?al\s+\d{1,2}\b",
        r"(?i)\bfrom\s+\d{1,2}\b.*?\bto\s+\d{1,2}\b",
        r"(?i)\b\d{1,2}\s*[-–]\s*\d{1,2}\s+(?:de\s+|d['’])?\p{L}",
    ]
    .iter()
    .map(|s| Regex::new(s).expect("multi-day pattern"))
    .collect()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").expect("year regex"));
static ISO_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}-(\d{1,2})-\d{1,2}\b").expect("iso regex"));
static DMY_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[/-](\d{1,2})[/-]\d{2,4}\b").expect("dmy regex"));
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").expect("word regex"));

const MONTH_NAMES: &[(&str, u32)] = &[
    // Spanish
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
    // Catalan (abril, octubre shared with Spanish)
    ("gener", 1),
    ("febrer", 2),
    ("març", 3),
    ("maig", 5),
    ("juny", 6),
    ("juliol", 7),
    ("agost", 8),
    ("setembre", 9),
    ("novembre", 11),
    ("desembre", 12),
    // English
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// All date matches in `text`, ordered by position (longer first on ties).
/// Overlapping and repeated matches are kept; see [`distinct_dates`].
pub fn find_dates(text: &str) -> Vec<DateMatch> {
    let mut out = Vec::new();
    for re in DATE_PATTERNS.iter() {
        for m in re.find_iter(text) {
            out.push(DateMatch {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            });
        }
    }
    out.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    out
}

/// Drops matches nested inside a longer match and repeated texts.
/// Keeps first-appearance order.
pub fn distinct_dates(matches: &[DateMatch]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (i, m) in matches.iter().enumerate() {
        let nested = matches.iter().enumerate().any(|(j, o)| {
            j != i
                && o.start <= m.start
                && m.end <= o.end
                && (o.end - o.start > m.end - m.start || j < i)
        });
        if nested {
            continue;
        }
        if !out.iter().any(|t| t.eq_ignore_ascii_case(&m.text)) {
            out.push(m.text.clone());
        }
    }
    out
}

/// True when any of `dates` uses a from/to or hyphenated day-range shape.
pub fn is_multi_day(dates: &[String]) -> bool {
    dates
        .iter()
        .any(|d| MULTI_DAY_PATTERNS.iter().any(|re| re.is_match(d)))
}

/// Year-gate then month-gate:
/// - no `20xx` year: upcoming
/// - year before `cutoff_year`: past
/// - year after `cutoff_year`: upcoming
/// - year equal to `cutoff_year`: past only if a recognized month precedes `today`'s month
pub fn is_future_event(date_text: &str, cutoff_year: i32, today: NaiveDate) -> bool {
    let Some(year) = find_year(date_text) else {
        return true;
    };
    if year < cutoff_year {
        return false;
    }
    if year > cutoff_year {
        return true;
    }
    match month_of(date_text) {
        Some(month) => month >= today.month(),
        None => true,
    }
}

fn find_year(text: &str) -> Option<i32> {
    YEAR_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Numeric month of the date; for ranges, the last month named (the end).
pub fn month_of(text: &str) -> Option<u32> {
    let numeric = ISO_MONTH_RE
        .captures(text)
        .or_else(|| DMY_MONTH_RE.captures(text))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m));
    if numeric.is_some() {
        return numeric;
    }

    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .filter_map(|w| {
            MONTH_NAMES
                .iter()
                .find(|(name, _)| *name == w.as_str())
                .map(|(_, n)| *n)
        })
        .last()
}
