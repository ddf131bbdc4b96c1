use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::GridSettings;
use crate::models::grid::TimetableGrid;
use crate::service::schedule_provider::ScheduleProvider;

/// A finished grid kept for download.
#[derive(Debug, Clone)]
pub struct GeneratedGrid {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub grid: TimetableGrid,
}

impl GeneratedGrid {
    pub fn new(grid: TimetableGrid) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            grid,
        }
    }
}

/// Most recent grid per subject id.
#[derive(Clone, Default)]
pub struct GridStore {
    grids: Arc<Mutex<HashMap<String, GeneratedGrid>>>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, subject_id: &str, grid: GeneratedGrid) {
        self.grids.lock().await.insert(subject_id.to_string(), grid);
    }

    pub async fn get(&self, subject_id: &str) -> Option<GeneratedGrid> {
        self.grids.lock().await.get(subject_id).cloned()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ScheduleProvider>,
    pub settings: GridSettings,
    pub store: GridStore,
}

impl AppState {
    pub fn new(provider: Arc<dyn ScheduleProvider>, settings: GridSettings) -> Self {
        Self {
            provider,
            settings,
            store: GridStore::new(),
        }
    }
}
