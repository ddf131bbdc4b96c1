use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::grid::{GridError, GridSink, HexColor};
use crate::service::availability_service::{AvailabilityError, AvailabilityService};
use crate::service::grid_service::{apply_day, reset_all};
use crate::service::range_parser::MalformedRangePolicy;
use crate::service::schedule_provider::{ProviderError, ScheduleProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub subject_id: String,
    pub fill_color: HexColor,
    pub policy: MalformedRangePolicy,
}

impl GenerationRequest {
    pub fn new(subject_id: impl Into<String>, fill_color: HexColor) -> Self {
        Self {
            subject_id: subject_id.into(),
            fill_color,
            policy: MalformedRangePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedRangePolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub subject_id: String,
    pub days_rendered: usize,
    pub busy_slots: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedInput,
    NotFound,
    ProviderError,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::Internal => "internal",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    MalformedInput(String),
    #[error("No schedule available for this ID: {0}")]
    NotFound(String),
    #[error(transparent)]
    Provider(ProviderError),
    #[error("grid update failed: {0}")]
    Grid(#[from] GridError),
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::MalformedInput(_) => ErrorKind::MalformedInput,
            GenerationError::NotFound(_) => ErrorKind::NotFound,
            GenerationError::Provider(_) => ErrorKind::ProviderError,
            GenerationError::Grid(_) => ErrorKind::Internal,
        }
    }
}

impl From<AvailabilityError> for GenerationError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Unavailable { source, .. } => GenerationError::Provider(source),
            err @ AvailabilityError::MalformedDay { .. } => {
                GenerationError::MalformedInput(err.to_string())
            }
        }
    }
}

pub struct GenerationService;

impl GenerationService {
    /// Fetches the subject's week, resets every row and paints the busy slots.
    pub async fn generate<P, S>(
        provider: &P,
        sink: &mut S,
        request: &GenerationRequest,
    ) -> Result<GenerationSummary, GenerationError>
    where
        P: ScheduleProvider + ?Sized,
        S: GridSink + ?Sized,
    {
        let subject_id = request.subject_id.trim();
        if subject_id.is_empty() {
            return Err(GenerationError::MalformedInput(
                "No external ID provided".to_string(),
            ));
        }

        let week =
            AvailabilityService::build_weekly_availability(provider, subject_id, request.policy)
                .await
                .inspect_err(|err| {
                    warn!("Availability lookup for {} failed: {}", subject_id, err)
                })?;
        if week.is_empty() {
            return Err(GenerationError::NotFound(subject_id.to_string()));
        }

        reset_all(sink)?;
        let mut busy_slots = 0;
        for schedule in week.days() {
            busy_slots += apply_day(sink, schedule.day, &schedule.intervals, request.fill_color)?;
        }

        info!(
            "Rendered {} days ({} busy slots) for {}",
            week.len(),
            busy_slots,
            subject_id
        );
        Ok(GenerationSummary {
            subject_id: subject_id.to_string(),
            days_rendered: week.len(),
            busy_slots,
        })
    }
}
