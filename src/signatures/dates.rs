//! Lenient date parsing for analyst-entered highlight and relationship dates.
//!
//! Accepts the usual machine formats, and otherwise searches the input for
//! the longest run of date-looking tokens that parses ("seen on March 5th,
//! 2024 around 10:30" → 2024-03-05 10:30 UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::error::{SigResult, SignatureError};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d", "%d %B %Y", "%B %d %Y",
    "%d-%b-%Y",
];

const TIME_SUFFIXES: &[&str] = &[" %H:%M:%S", " %H:%M", "T%H:%M:%S", "T%H:%M"];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub fn parse_fuzzy_date(input: &str) -> SigResult<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Some(date) = parse_exact(trimmed) {
        return Ok(date);
    }

    let tokens: Vec<String> = trimmed
        .split_whitespace()
        .map(clean_token)
        .filter(|t| is_date_token(t))
        .collect();

    for len in (1..=tokens.len()).rev() {
        for window in tokens.windows(len) {
            if let Some(date) = parse_exact(&window.join(" ")) {
                return Ok(date);
            }
        }
    }

    Err(SignatureError::InvalidInput(format!(
        "Could not parse date: {:?}",
        input
    )))
}

fn parse_exact(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(d.with_timezone(&Utc));
    }
    for date_fmt in DATE_FORMATS {
        for time_fmt in TIME_SUFFIXES {
            let fmt = format!("{}{}", date_fmt, time_fmt);
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, &fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }
        if let Ok(day) = NaiveDate::parse_from_str(s, date_fmt) {
            return day.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
        }
    }
    None
}

/// Strip punctuation around a token and ordinal suffixes ("5th," → "5").
fn clean_token(raw: &str) -> String {
    let t = raw.trim_matches(|c: char| !c.is_alphanumeric());
    let digits = t.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(&t[digits.len()..], "st" | "nd" | "rd" | "th")
    {
        return digits.to_string();
    }
    t.to_string()
}

fn is_date_token(t: &str) -> bool {
    if t.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    let lower = t.to_ascii_lowercase();
    lower.len() >= 3 && MONTHS.iter().any(|m| lower.starts_with(m))
}
