use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::config::Config;
use crate::conflict::{Conflict, ConflictInput};
use crate::data::{LeaveRequest, ScheduleEntry, Snapshot, TimetableResult};
use crate::error::Error;
use crate::leave::{LeaveImpact, leave_impact};
use crate::repository::{JsonFileRepository, Repository};
use crate::solver::generate_timetable;
use crate::suggest::suggest_resolutions;
use crate::validation::ensure_valid;

#[derive(Clone, Default)]
pub struct AppState {
    repository: Option<Arc<dyn Repository + Send + Sync>>,
}

impl AppState {
    pub fn with_repository(repository: impl Repository + Send + Sync + 'static) -> Self {
        Self {
            repository: Some(Arc::new(repository)),
        }
    }
}

/// A timetable plus its conflicts in both structured and message form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub timetable: Vec<ScheduleEntry>,
    pub conflicts: Vec<Conflict>,
    pub conflict_messages: Vec<String>,
    pub complete: bool,
}

impl From<TimetableResult> for GenerateResponse {
    fn from(result: TimetableResult) -> Self {
        Self {
            complete: result.is_complete(),
            conflict_messages: result.conflict_messages(),
            timetable: result.timetable,
            conflicts: result.conflicts,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub snapshot: Snapshot,
    #[serde(default)]
    pub conflicts: Vec<ConflictInput>,
    #[serde(default)]
    pub timetable: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveImpactRequest {
    pub snapshot: Snapshot,
    pub request: LeaveRequest,
    #[serde(default)]
    pub timetable: Vec<ScheduleEntry>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::RepositoryUnavailable { .. } | Error::RepositoryNotConfigured => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::SnapshotMalformed(_) => StatusCode::BAD_REQUEST,
            Error::SnapshotInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        if status.is_server_error() {
            error!("{}", self);
        }
        let body = match &self {
            Error::SnapshotInvalid(errors) => json!({ "error": self.to_string(), "details": errors }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

async fn generate_handler(Json(snapshot): Json<Snapshot>) -> Result<Json<GenerateResponse>, Error> {
    ensure_valid(&snapshot)?;
    Ok(Json(generate_timetable(&snapshot).into()))
}

async fn current_handler(State(state): State<AppState>) -> Result<Json<GenerateResponse>, Error> {
    let repository = state.repository.ok_or(Error::RepositoryNotConfigured)?;
    let snapshot = repository.load_snapshot()?;
    ensure_valid(&snapshot)?;
    Ok(Json(generate_timetable(&snapshot).into()))
}

async fn suggest_handler(Json(request): Json<SuggestRequest>) -> Result<Json<SuggestResponse>, Error> {
    ensure_valid(&request.snapshot)?;
    let conflicts: Vec<Conflict> = request
        .conflicts
        .iter()
        .filter_map(ConflictInput::resolve)
        .collect();
    let suggestions = suggest_resolutions(&request.snapshot, &conflicts, &request.timetable);
    Ok(Json(SuggestResponse { suggestions }))
}

async fn leave_impact_handler(
    Json(request): Json<LeaveImpactRequest>,
) -> Result<Json<LeaveImpact>, Error> {
    ensure_valid(&request.snapshot)?;
    Ok(Json(leave_impact(
        &request.request,
        &request.snapshot.faculty,
        &request.timetable,
    )))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/timetable", get(current_handler))
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetable/suggest", post(suggest_handler))
        .route("/v1/leave/impact", post(leave_impact_handler))
        .with_state(state)
}

pub async fn run_server(config: &Config) -> std::io::Result<()> {
    let state = match &config.snapshot {
        Some(path) => {
            info!("Serving snapshots from '{}'", path.display());
            AppState::with_repository(JsonFileRepository::new(path))
        }
        None => AppState::default(),
    };

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await
}
