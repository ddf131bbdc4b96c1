use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::models::time_of_day::{FallbackKind, Interval};
use crate::service::time_parser::{TimeParseError, parse_time_token};

/// What to do with a range token that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRangePolicy {
    /// Log the token, drop it and keep the rest of the day.
    #[default]
    Skip,
    /// Fail the whole day on the first bad token.
    AbortDay,
}

impl FromStr for MalformedRangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MalformedRangePolicy::Skip),
            "abort" | "abort_day" | "abortday" => Ok(MalformedRangePolicy::AbortDay),
            other => Err(format!(
                "unknown malformed range policy '{}', expected 'skip' or 'abort'",
                other
            )),
        }
    }
}

impl fmt::Display for MalformedRangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRangePolicy::Skip => write!(f, "skip"),
            MalformedRangePolicy::AbortDay => write!(f, "abort"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeParseError {
    #[error("malformed range token '{token}': {reason}")]
    MalformedRangeToken { token: String, reason: String },
}

impl RangeParseError {
    fn malformed(token: &str, reason: impl Into<String>) -> Self {
        RangeParseError::MalformedRangeToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Intervals recovered from one day's string plus the tokens that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDay {
    pub intervals: Vec<Interval>,
    pub skipped: Vec<RangeParseError>,
}

/// Parses a day string with the default [`MalformedRangePolicy::Skip`].
pub fn parse_day_ranges(raw: Option<&str>) -> Vec<Interval> {
    match parse_day_ranges_with(raw, MalformedRangePolicy::Skip) {
        Ok(parsed) => parsed.intervals,
        Err(_) => Vec::new(),
    }
}

pub fn parse_day_ranges_with(
    raw: Option<&str>,
    policy: MalformedRangePolicy,
) -> Result<ParsedDay, RangeParseError> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            return Ok(ParsedDay {
                intervals: vec![Interval::all_day()],
                skipped: Vec::new(),
            });
        }
    };

    let mut parsed = ParsedDay::default();
    for token in raw.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_range_token(token) {
            Ok(interval) => parsed.intervals.push(interval),
            Err(err) => match policy {
                MalformedRangePolicy::AbortDay => return Err(err),
                MalformedRangePolicy::Skip => {
                    warn!("Skipping {}", err);
                    parsed.skipped.push(err);
                }
            },
        }
    }
    Ok(parsed)
}

fn parse_range_token(token: &str) -> Result<Interval, RangeParseError> {
    let Some((left, right)) = token.split_once('-') else {
        return Err(RangeParseError::malformed(token, "missing '-' separator"));
    };
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return Err(RangeParseError::malformed(token, "range needs a start and an end"));
    }

    let describe = |err: TimeParseError| RangeParseError::malformed(token, err.to_string());
    let start = parse_time_token(left, FallbackKind::DayStart).map_err(describe)?;
    let end = parse_time_token(right, FallbackKind::DayEnd).map_err(describe)?;
    Ok(Interval::new(start, end))
}
