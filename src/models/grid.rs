use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::availability::DayId;
use crate::models::time_of_day::TimeOfDay;

pub const FIRST_HOUR: u16 = 6;
pub const FINAL_HOUR: u16 = 22;
pub const SLOT_MINUTES: u16 = 5;
pub const SLOTS_PER_DAY: usize = ((FINAL_HOUR - FIRST_HOUR) * 60 / SLOT_MINUTES) as usize;

const ROW_OFFSET: u32 = 2;
const COL_OFFSET: u32 = 2;

pub const FIRST_ROW: u32 = 1 + ROW_OFFSET;
pub const LAST_ROW: u32 = 7 + ROW_OFFSET;
pub const FIRST_COL: u32 = COL_OFFSET;
pub const LAST_COL: u32 = COL_OFFSET + SLOTS_PER_DAY as u32 - 1;

/// 24-bit RGB color written as six hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(u32);

impl HexColor {
    pub const WHITE: HexColor = HexColor(0xFFFFFF);
    pub const DARK_GRAY: HexColor = HexColor(0xBABABA);
    pub const LIGHT_GRAY: HexColor = HexColor(0xE0E0E0);

    pub fn rgb(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color '{0}': expected six hex digits such as ffa07a")]
pub struct InvalidHexColor(pub String);

impl FromStr for HexColor {
    type Err = InvalidHexColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidHexColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(HexColor)
            .map_err(|_| InvalidHexColor(s.to_string()))
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidHexColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

/// A 5-minute column of the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub time: TimeOfDay,
}

/// The 192 slots from 06:00 (inclusive) to 22:00 (exclusive), earliest first.
pub fn day_slots() -> impl Iterator<Item = Slot> {
    (0..SLOTS_PER_DAY).filter_map(|index| {
        let minutes = FIRST_HOUR * 60 + index as u16 * SLOT_MINUTES;
        TimeOfDay::from_minutes(minutes).map(|time| Slot { index, time })
    })
}

/// 1-based worksheet position of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridCoordinate {
    pub row: u32,
    pub col: u32,
}

impl GridCoordinate {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn row_of(day: DayId) -> u32 {
        day.get() as u32 + ROW_OFFSET
    }

    pub fn for_slot(day: DayId, slot: &Slot) -> Self {
        Self {
            row: Self::row_of(day),
            col: slot.index as u32 + COL_OFFSET,
        }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {coordinate} is outside the timetable (rows 3-9, columns 2-193)")]
    OutOfRange { coordinate: GridCoordinate },
}

/// Background of an untouched day row.
pub fn background_color(day: DayId) -> HexColor {
    match day.get() {
        d if d % 2 == 0 => HexColor::WHITE,
        1 | 7 => HexColor::DARK_GRAY,
        _ => HexColor::LIGHT_GRAY,
    }
}

/// Destination for cell colors. Implementations own the persisted grid.
pub trait GridSink {
    fn fill(&mut self, coordinate: GridCoordinate, color: HexColor) -> Result<(), GridError>;

    fn reset_day_colors(&mut self, day: DayId) -> Result<(), GridError> {
        let color = background_color(day);
        for slot in day_slots() {
            self.fill(GridCoordinate::for_slot(day, &slot), color)?;
        }
        Ok(())
    }
}

/// In-memory timetable: seven day rows of 192 cells each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableGrid {
    cells: Vec<Option<HexColor>>,
}

impl Default for TimetableGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TimetableGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![None; 7 * SLOTS_PER_DAY],
        }
    }

    fn offset(coordinate: GridCoordinate) -> Option<usize> {
        if !(FIRST_ROW..=LAST_ROW).contains(&coordinate.row)
            || !(FIRST_COL..=LAST_COL).contains(&coordinate.col)
        {
            return None;
        }
        let row = (coordinate.row - FIRST_ROW) as usize;
        let col = (coordinate.col - FIRST_COL) as usize;
        Some(row * SLOTS_PER_DAY + col)
    }

    pub fn color_at(&self, coordinate: GridCoordinate) -> Option<HexColor> {
        Self::offset(coordinate).and_then(|offset| self.cells[offset])
    }

    /// Number of cells in a day row currently painted `color`.
    pub fn count_in_day(&self, day: DayId, color: HexColor) -> usize {
        day_slots()
            .filter(|slot| self.color_at(GridCoordinate::for_slot(day, slot)) == Some(color))
            .count()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let rows = DayId::all()
            .map(|day| GridRowSnapshot {
                day: day.get(),
                label: day.name().to_string(),
                row: GridCoordinate::row_of(day),
                cells: day_slots()
                    .map(|slot| {
                        self.color_at(GridCoordinate::for_slot(day, &slot))
                            .map(|color| color.to_string())
                    })
                    .collect(),
            })
            .collect();
        GridSnapshot {
            slot_minutes: SLOT_MINUTES,
            first_slot: TimeOfDay::from_minutes(FIRST_HOUR * 60)
                .map(|t| t.to_string())
                .unwrap_or_default(),
            rows,
        }
    }
}

impl GridSink for TimetableGrid {
    fn fill(&mut self, coordinate: GridCoordinate, color: HexColor) -> Result<(), GridError> {
        let offset = Self::offset(coordinate).ok_or(GridError::OutOfRange { coordinate })?;
        self.cells[offset] = Some(color);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub slot_minutes: u16,
    pub first_slot: String,
    pub rows: Vec<GridRowSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRowSnapshot {
    pub day: u8,
    pub label: String,
    pub row: u32,
    pub cells: Vec<Option<String>>,
}
