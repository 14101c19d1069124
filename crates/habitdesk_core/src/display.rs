//! Human-readable labels for stored habit preference strings.
//!
//! Stored preferences are comma-joined tokens (`"mon,fri"`, `"1,12"`,
//! `"08:00,20:00"`). These helpers only format them; nothing here evaluates
//! a schedule. Tokens that are not recognized are passed through unchanged.

use crate::model::habit::{Habit, MONTH_TOKENS, WEEKDAY_TOKENS};

const LABEL_SEPARATOR: &str = ", ";

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `"mon,fri"` -> `"Mon, Fri"`.
pub fn weekday_labels(stored: &str) -> String {
    label_tokens(stored, |token| lookup(&WEEKDAY_TOKENS, &WEEKDAY_LABELS, token))
}

/// `"1,12"` -> `"Jan, Dec"`.
pub fn month_labels(stored: &str) -> String {
    label_tokens(stored, |token| lookup(&MONTH_TOKENS, &MONTH_LABELS, token))
}

/// `"08:00,20:00"` -> `"8:00 AM, 8:00 PM"`.
///
/// Only the hour is converted; the minute text is shown as stored.
pub fn time_labels(stored: &str) -> String {
    label_tokens(stored, twelve_hour)
}

fn twelve_hour(token: &str) -> Option<String> {
    let (hour, minute) = token.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let suffix = if hour % 24 >= 12 { "PM" } else { "AM" };
    let clock_hour = match hour % 12 {
        0 => 12,
        other => other,
    };
    Some(format!("{clock_hour}:{} {suffix}", minute.trim()))
}

fn label_tokens(stored: &str, label: impl Fn(&str) -> Option<String>) -> String {
    Habit::preference_tokens(stored)
        .into_iter()
        .map(|token| label(token).unwrap_or_else(|| token.to_string()))
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

fn lookup(tokens: &[&str], labels: &[&str], token: &str) -> Option<String> {
    let lowered = token.to_ascii_lowercase();
    tokens
        .iter()
        .position(|candidate| *candidate == lowered)
        .and_then(|index| labels.get(index))
        .map(|label| (*label).to_string())
}
