#![allow(dead_code)]

use async_trait::async_trait;
use availabilityGrid::config::ScheduleSourceConfig;
use availabilityGrid::models::availability::{DayId, RawDayAvailability};
use availabilityGrid::service::schedule_provider::{ProviderError, ScheduleProvider};
use httpmock::MockServer;

/// Provider returning a fixed answer and counting calls.
pub struct FakeProvider {
    records: Vec<RawDayAvailability>,
    fail: bool,
    pub calls: std::sync::Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_records(records: Vec<RawDayAvailability>) -> Self {
        Self {
            records,
            fail: false,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ScheduleProvider for FakeProvider {
    async fn get_weekly_raw(
        &self,
        subject_id: &str,
    ) -> Result<Vec<RawDayAvailability>, ProviderError> {
        self.calls.lock().unwrap().push(subject_id.to_string());
        if self.fail {
            return Err(ProviderError::Status {
                status: 503,
                body: "maintenance".to_string(),
            });
        }
        Ok(self.records.clone())
    }
}

pub fn day(id: u8) -> DayId {
    DayId::new(id).unwrap()
}

pub fn record(id: u8, ranges: Option<&str>) -> RawDayAvailability {
    RawDayAvailability::new(day(id), ranges)
}

/// Schedule Source settings pointing at a mock server.
pub fn source_config(server: &MockServer) -> ScheduleSourceConfig {
    ScheduleSourceConfig {
        auth_url: server.url("/auth"),
        base_url: server.base_url(),
        availability_path: "/availability".to_string(),
        code: "campus".to_string(),
        username: "manager".to_string(),
        password: "secret".to_string(),
        portal: "mgr".to_string(),
        build_cookie: Some("build-42".to_string()),
    }
}
