use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::ScheduleSourceConfig;
use crate::service::schedule_provider::ProviderError;

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "ExternalId")]
    external_id: &'a str,
    #[serde(rename = "Request")]
    request: Credentials<'a>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    #[serde(rename = "Portal")]
    portal: &'a str,
    #[serde(rename = "Code")]
    code: &'a str,
    #[serde(rename = "Username")]
    username: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(rename = "Response")]
    response: Option<SessionPayload>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    #[serde(rename = "SessionId")]
    session_id: Option<String>,
    #[serde(rename = "APIToken")]
    api_token: Option<String>,
}

/// Credentials handed out by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub api_token: String,
}

/// HTTP client that logs in to Schedule Source and signs requests with the session.
pub struct AuthenticatedClient {
    http: reqwest::Client,
    config: ScheduleSourceConfig,
    session: Mutex<Option<Session>>,
}

impl AuthenticatedClient {
    pub fn new(config: ScheduleSourceConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: ScheduleSourceConfig) -> Self {
        Self {
            http,
            config,
            session: Mutex::new(None),
        }
    }

    /// Starts from an already issued session instead of logging in on first use.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Mutex::new(Some(session));
        self
    }

    pub fn config(&self) -> &ScheduleSourceConfig {
        &self.config
    }

    /// Logs in and replaces any stored session.
    pub async fn authenticate(&self) -> Result<Session, ProviderError> {
        let body = AuthRequest {
            external_id: "",
            request: Credentials {
                portal: &self.config.portal,
                code: &self.config.code,
                username: &self.config.username,
                password: &self.config.password,
            },
        };
        let mut request = self
            .http
            .post(&self.config.auth_url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(cookie) = &self.config.build_cookie {
            request = request.header("BuildCookie", cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Authentication(format!(
                "login returned {}",
                status.as_u16()
            )));
        }

        let parsed: AuthResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::Authentication(format!("unreadable login response: {}", e))
        })?;
        let session = match parsed.response {
            Some(SessionPayload {
                session_id: Some(session_id),
                api_token: Some(api_token),
            }) => Session {
                session_id,
                api_token,
            },
            _ => {
                return Err(ProviderError::Authentication(
                    "login response lacks SessionId or APIToken".to_string(),
                ));
            }
        };

        info!("Authenticated with schedule source as {}", self.config.username);
        *self.session.lock().await = Some(session.clone());
        Ok(session)
    }

    /// The stored session, logging in first if there is none.
    pub async fn session(&self) -> Result<Session, ProviderError> {
        if let Some(session) = self.session.lock().await.clone() {
            return Ok(session);
        }
        debug!("No schedule source session yet, logging in");
        self.authenticate().await
    }

    /// Starts a GET to `url` carrying the session headers.
    pub async fn get(&self, url: &str) -> Result<RequestBuilder, ProviderError> {
        let session = self.session().await?;
        let mut request = self
            .http
            .get(url)
            .header("x-api-token", session.api_token)
            .header("x-session-id", session.session_id);
        if let Some(cookie) = &self.config.build_cookie {
            request = request.header("BuildCookie", cookie);
        }
        Ok(request)
    }
}
