use tracing::debug;

use crate::models::availability::DayId;
use crate::models::grid::{GridCoordinate, GridError, GridSink, HexColor, day_slots};
use crate::models::time_of_day::{Interval, TimeOfDay};

/// True when some interval covers `time` (start inclusive, end exclusive).
pub fn is_available(time: TimeOfDay, intervals: &[Interval]) -> bool {
    intervals.iter().any(|interval| interval.contains(time))
}

/// Paints every slot of `day` that no interval covers. Returns the number of filled cells.
pub fn apply_day<S: GridSink + ?Sized>(
    sink: &mut S,
    day: DayId,
    intervals: &[Interval],
    fill_color: HexColor,
) -> Result<usize, GridError> {
    let mut filled = 0;
    for slot in day_slots() {
        if is_available(slot.time, intervals) {
            continue;
        }
        sink.fill(GridCoordinate::for_slot(day, &slot), fill_color)?;
        filled += 1;
    }
    debug!("Filled {} busy slots for day {}", filled, day);
    Ok(filled)
}

pub fn reset_day<S: GridSink + ?Sized>(sink: &mut S, day: DayId) -> Result<(), GridError> {
    sink.reset_day_colors(day)
}

pub fn reset_all<S: GridSink + ?Sized>(sink: &mut S) -> Result<(), GridError> {
    for day in DayId::all() {
        reset_day(sink, day)?;
    }
    Ok(())
}
