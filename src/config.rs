use std::collections::HashMap;
use std::fs;

use crate::models::grid::HexColor;
use crate::service::range_parser::MalformedRangePolicy;

pub const DEFAULT_FILL_COLOR: &str = "ffa07a";
pub const DEFAULT_PORTAL: &str = "mgr";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
        Self::parse(&content)
    }

    /// Parses `KEY=VALUE` lines. Blank lines, `#` comments and an `export ` prefix are allowed.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let mut value = value.trim();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }
            values.insert(key.trim().to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Connection details for the Schedule Source REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSourceConfig {
    pub auth_url: String,
    pub base_url: String,
    pub availability_path: String,
    pub code: String,
    pub username: String,
    pub password: String,
    pub portal: String,
    pub build_cookie: Option<String>,
}

impl ScheduleSourceConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| format!("{} must be set", key))
        };
        Ok(Self {
            auth_url: required("SCHEDULE_SOURCE_AUTH_URL")?,
            base_url: required("SCHEDULE_SOURCE_BASE_URL")?,
            availability_path: required("SCHEDULE_SOURCE_AVAILABILITY_PATH")?,
            code: required("SCHEDULE_SOURCE_CODE")?,
            username: required("SCHEDULE_SOURCE_USER")?,
            password: required("SCHEDULE_SOURCE_PASSWORD")?,
            portal: lookup("SCHEDULE_SOURCE_PORTAL").unwrap_or_else(|| DEFAULT_PORTAL.to_string()),
            build_cookie: lookup("SCHEDULE_SOURCE_BUILD_COOKIE").filter(|v| !v.is_empty()),
        })
    }

    pub fn availability_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.availability_path
        )
    }
}

/// How busy slots are painted and how bad range tokens are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSettings {
    pub fill_color: HexColor,
    pub policy: MalformedRangePolicy,
}

impl GridSettings {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fill_color = lookup("GRID_FILL_COLOR")
            .unwrap_or_else(|| DEFAULT_FILL_COLOR.to_string())
            .parse::<HexColor>()
            .map_err(|e| e.to_string())?;
        let policy = match lookup("MALFORMED_RANGE_POLICY") {
            Some(value) => value.parse::<MalformedRangePolicy>()?,
            None => MalformedRangePolicy::default(),
        };
        Ok(Self { fill_color, policy })
    }
}
