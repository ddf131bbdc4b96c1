use chrono::NaiveTime;
use thiserror::Error;

use crate::models::time_of_day::{FallbackKind, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("malformed time token '{token}'")]
    MalformedTimeToken { token: String },
}

/// Parses a 12-hour clock token such as `8am`, `8:30PM` or `12:05 am`.
///
/// An empty token resolves to the boundary of the day named by `fallback`.
pub fn parse_time_token(token: &str, fallback: FallbackKind) -> Result<TimeOfDay, TimeParseError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Ok(fallback.time());
    }

    let malformed = || TimeParseError::MalformedTimeToken {
        token: token.to_string(),
    };

    let lowered = trimmed.to_ascii_lowercase();
    let (clock, meridiem) = if let Some(clock) = lowered.strip_suffix("am") {
        (clock.trim_end(), "am")
    } else if let Some(clock) = lowered.strip_suffix("pm") {
        (clock.trim_end(), "pm")
    } else {
        return Err(malformed());
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((hour, minute)) => (hour, minute),
        None => (clock, "00"),
    };
    if !is_digits(hour, 1..=2) || !is_digits(minute, 2..=2) {
        return Err(malformed());
    }

    let normalized = format!("{}:{}{}", hour, minute, meridiem);
    NaiveTime::parse_from_str(&normalized, "%I:%M%p")
        .map(TimeOfDay::from)
        .map_err(|_| malformed())
}

fn is_digits(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}
