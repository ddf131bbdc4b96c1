use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::clients::auth_client::AuthenticatedClient;
use crate::config::ScheduleSourceConfig;
use crate::models::availability::RawDayAvailability;
use crate::service::schedule_provider::{ProviderError, ScheduleProvider};

const AVAILABILITY_FIELDS: &str = "AvailableRanges,EmployeeExternalId,DayId,FirstName";

/// [`ScheduleProvider`] backed by the Schedule Source availability endpoint.
pub struct ScheduleSourceClient {
    auth: AuthenticatedClient,
}

impl ScheduleSourceClient {
    pub fn new(config: ScheduleSourceConfig) -> Self {
        Self {
            auth: AuthenticatedClient::new(config),
        }
    }

    pub fn with_auth(auth: AuthenticatedClient) -> Self {
        Self { auth }
    }

    async fn request_availability(
        &self,
        subject_id: &str,
    ) -> Result<(StatusCode, String), ProviderError> {
        let url = self.auth.config().availability_url();
        let response = self
            .auth
            .get(&url)
            .await?
            .query(&[("Fields", AVAILABILITY_FIELDS), ("EmployeeExternalId", subject_id)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl ScheduleProvider for ScheduleSourceClient {
    async fn get_weekly_raw(
        &self,
        subject_id: &str,
    ) -> Result<Vec<RawDayAvailability>, ProviderError> {
        let (mut status, mut body) = self.request_availability(subject_id).await?;
        if status == StatusCode::UNAUTHORIZED {
            warn!("Schedule source session rejected, logging in again");
            self.auth.authenticate().await?;
            (status, body) = self.request_availability(subject_id).await?;
            if status == StatusCode::UNAUTHORIZED {
                return Err(ProviderError::Authentication(
                    "session rejected after re-authentication".to_string(),
                ));
            }
        }

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let records: Vec<RawDayAvailability> =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        debug!("Decoded {} availability records for {}", records.len(), subject_id);
        Ok(records)
    }
}
