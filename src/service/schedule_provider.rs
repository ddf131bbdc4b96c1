use async_trait::async_trait;
use thiserror::Error;

use crate::models::availability::RawDayAvailability;

/// Failures reaching or understanding the remote schedule source.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to schedule source failed: {0}")]
    Transport(String),
    #[error("schedule source rejected credentials: {0}")]
    Authentication(String),
    #[error("schedule source answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode schedule source response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Source of raw per-day availability for a subject.
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    async fn get_weekly_raw(
        &self,
        subject_id: &str,
    ) -> Result<Vec<RawDayAvailability>, ProviderError>;
}
