use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::handlers::state::{AppState, GeneratedGrid};
use crate::models::grid::{GridSnapshot, TimetableGrid};
use crate::service::generation_service::{
    ErrorKind, GenerationError, GenerationRequest, GenerationService,
};

#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    pub external_id: String,
    pub generation_id: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub snapshot: GridSnapshot,
}

/// Error reply rendered as `{"error": ..., "kind": ...}`.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = match kind {
            ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ProviderError => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            kind,
            message: message.into(),
        }
    }
}

impl ApiError {
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let message = match &err {
            GenerationError::NotFound(_) => "No schedule available for this ID".to_string(),
            other => other.to_string(),
        };
        ApiError::new(err.kind(), message)
    }
}

impl Reply for ApiError {
    fn into_response(self) -> warp::reply::Response {
        let body = warp::reply::json(&json!({
            "error": self.message,
            "kind": self.kind,
        }));
        warp::reply::with_status(body, self.status).into_response()
    }
}

impl Reply for Download {
    fn into_response(self) -> warp::reply::Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        warp::reply::with_header(
            warp::reply::json(&self.snapshot),
            "Content-Disposition",
            disposition,
        )
        .into_response()
    }
}

pub async fn handle_generate(
    state: &AppState,
    body: GenerateBody,
) -> Result<GenerateResponse, ApiError> {
    let external_id = body.external_id.unwrap_or_default();
    let request = GenerationRequest::new(external_id.trim(), state.settings.fill_color)
        .with_policy(state.settings.policy);

    let mut grid = TimetableGrid::new();
    let summary = GenerationService::generate(state.provider.as_ref(), &mut grid, &request)
        .await
        .map_err(|err| {
            match err.kind() {
                ErrorKind::ProviderError | ErrorKind::Internal => {
                    error!("Generation for '{}' failed: {}", request.subject_id, err)
                }
                _ => warn!("Generation for '{}' rejected: {}", request.subject_id, err),
            }
            ApiError::from(err)
        })?;

    let generated = GeneratedGrid::new(grid);
    let generation_id = generated.id.to_string();
    let generated_at = generated.generated_at;
    state.store.insert(&summary.subject_id, generated).await;
    info!("Stored grid {} for {}", generation_id, summary.subject_id);

    Ok(GenerateResponse {
        success: true,
        message: format!("Schedule generated for ID: {}", summary.subject_id),
        external_id: summary.subject_id,
        generation_id,
        generated_at,
    })
}

pub async fn handle_download(
    state: &AppState,
    external_id: &str,
    query: DownloadQuery,
) -> Result<Download, ApiError> {
    let Some(generated) = state.store.get(external_id).await else {
        return Err(ApiError::new(ErrorKind::NotFound, "Grid not found"));
    };
    let filename = query
        .filename
        .as_deref()
        .map(sanitize_filename)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| default_filename(external_id));
    Ok(Download {
        filename,
        snapshot: generated.grid.snapshot(),
    })
}

pub fn default_filename(subject_id: &str) -> String {
    format!("schedule_{}.json", sanitize_filename(subject_id))
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '/' | '\\' | '"') && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn into_response<T: Reply>(result: Result<T, ApiError>) -> warp::reply::Response {
    match result {
        Ok(reply) => reply.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Renders filter rejections in the same JSON shape as handler errors.
async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    let api_error = if err.is_not_found() {
        ApiError::new(ErrorKind::NotFound, "Route not found")
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        ApiError::new(ErrorKind::MalformedInput, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        ApiError::new(ErrorKind::MalformedInput, "Request body must be JSON")
            .with_status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        ApiError::new(ErrorKind::MalformedInput, "Request body is too large")
            .with_status(StatusCode::PAYLOAD_TOO_LARGE)
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        ApiError::new(ErrorKind::MalformedInput, "Invalid query string")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ApiError::new(ErrorKind::MalformedInput, "Method not allowed")
            .with_status(StatusCode::METHOD_NOT_ALLOWED)
    } else {
        error!("Unhandled rejection: {:?}", err);
        ApiError::new(ErrorKind::Internal, "Unhandled request")
    };
    Ok(api_error.into_response())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (warp::reply::Response,), Error = Infallible> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "status": "ok" })).into_response());

    let generate = warp::path("generate")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json::<GenerateBody>())
        .then(|state: AppState, body: GenerateBody| async move {
            into_response(
                handle_generate(&state, body)
                    .await
                    .map(|response| warp::reply::json(&response)),
            )
        });

    let download = warp::path!("download" / String)
        .and(warp::get())
        .and(with_state(state))
        .and(warp::query::<DownloadQuery>())
        .then(|external_id: String, state: AppState, query: DownloadQuery| async move {
            into_response(handle_download(&state, &external_id, query).await)
        });

    health
        .or(generate)
        .unify()
        .or(download)
        .unify()
        .recover(handle_rejection)
        .unify()
}
