use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::availability::{DayId, DaySchedule, RawDayAvailability, WeeklyAvailability};
use crate::service::range_parser::{MalformedRangePolicy, RangeParseError, parse_day_ranges_with};
use crate::service::schedule_provider::{ProviderError, ScheduleProvider};

#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("availability for '{subject_id}' is unavailable: {source}")]
    Unavailable {
        subject_id: String,
        #[source]
        source: ProviderError,
    },
    #[error("day {day} has a malformed range: {source}")]
    MalformedDay {
        day: DayId,
        #[source]
        source: RangeParseError,
    },
}

impl WeeklyAvailability {
    /// Builds the week from provider records. A repeated day replaces the earlier record.
    pub fn from_records(
        records: &[RawDayAvailability],
        policy: MalformedRangePolicy,
    ) -> Result<Self, AvailabilityError> {
        let mut week = WeeklyAvailability::new();
        for record in records {
            let parsed = parse_day_ranges_with(record.available_ranges.as_deref(), policy)
                .map_err(|source| AvailabilityError::MalformedDay {
                    day: record.day_id,
                    source,
                })?;
            if !parsed.skipped.is_empty() {
                debug!(
                    "Day {} kept {} ranges, skipped {}",
                    record.day_id,
                    parsed.intervals.len(),
                    parsed.skipped.len()
                );
            }
            let schedule = DaySchedule::new(record.day_id, parsed.intervals);
            if week.insert(schedule).is_some() {
                warn!("Day {} reported more than once; keeping the later record", record.day_id);
            }
        }
        Ok(week)
    }
}

pub struct AvailabilityService;

impl AvailabilityService {
    pub async fn build_weekly_availability<P: ScheduleProvider + ?Sized>(
        provider: &P,
        subject_id: &str,
        policy: MalformedRangePolicy,
    ) -> Result<WeeklyAvailability, AvailabilityError> {
        let records = provider
            .get_weekly_raw(subject_id)
            .await
            .map_err(|source| AvailabilityError::Unavailable {
                subject_id: subject_id.to_string(),
                source,
            })?;
        info!("Received {} availability records for {}", records.len(), subject_id);
        WeeklyAvailability::from_records(&records, policy)
    }
}
