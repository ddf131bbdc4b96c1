use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::time_of_day::{Interval, TimeOfDay};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Day of week as numbered by Schedule Source: 1 = Sunday through 7 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayId(u8);

impl DayId {
    pub const FIRST: DayId = DayId(1);
    pub const LAST: DayId = DayId(7);

    pub fn new(id: u8) -> Option<Self> {
        (1..=7).contains(&id).then_some(DayId(id))
    }

    /// All seven days in ascending order.
    pub fn all() -> impl Iterator<Item = DayId> {
        (1..=7).map(DayId)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        DAY_NAMES[(self.0 - 1) as usize]
    }
}

impl TryFrom<u8> for DayId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DayId::new(value).ok_or_else(|| format!("day id must be between 1 and 7, got {}", value))
    }
}

impl From<DayId> for u8 {
    fn from(day: DayId) -> Self {
        day.0
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// One record of the Schedule Source availability endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDayAvailability {
    #[serde(rename = "DayId")]
    pub day_id: DayId,
    #[serde(rename = "AvailableRanges", default)]
    pub available_ranges: Option<String>,
    #[serde(rename = "EmployeeExternalId", default, skip_serializing_if = "Option::is_none")]
    pub employee_external_id: Option<String>,
    #[serde(rename = "FirstName", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

impl RawDayAvailability {
    pub fn new(day_id: DayId, available_ranges: Option<&str>) -> Self {
        Self {
            day_id,
            available_ranges: available_ranges.map(str::to_string),
            employee_external_id: None,
            first_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub day: DayId,
    pub intervals: Vec<Interval>,
}

impl DaySchedule {
    pub fn new(day: DayId, intervals: Vec<Interval>) -> Self {
        Self { day, intervals }
    }

    pub fn is_available(&self, time: TimeOfDay) -> bool {
        self.intervals.iter().any(|interval| interval.contains(time))
    }
}

/// Parsed availability for the days the provider reported, keyed by day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyAvailability {
    days: BTreeMap<DayId, DaySchedule>,
}

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schedule previously stored for the same day, if any.
    pub fn insert(&mut self, schedule: DaySchedule) -> Option<DaySchedule> {
        self.days.insert(schedule.day, schedule)
    }

    pub fn get(&self, day: DayId) -> Option<&DaySchedule> {
        self.days.get(&day)
    }

    pub fn days(&self) -> btree_map::Values<'_, DayId, DaySchedule> {
        self.days.values()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}
