//! Performance handlers.
//!
//! A performance is written as one tree: songs with their musicians and
//! voice parts. `PUT` replaces the whole tree.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Performance, PerformanceDetail, PerformanceDraft, PerformanceSongDraft};

use super::song_handler::REPERTOIRE_EDITORS;
use crate::extractors::ValidatedJson;
use crate::middleware::Guarded;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Easter concert")]
    pub title: String,
    pub venue: Option<String>,
    pub performance_date: DateTime<Utc>,
    pub description: Option<String>,
    #[serde(default)]
    pub songs: Vec<PerformanceSongDraft>,
}

impl From<PerformanceRequest> for PerformanceDraft {
    fn from(request: PerformanceRequest) -> Self {
        Self {
            title: request.title,
            venue: request.venue,
            performance_date: request.performance_date,
            description: request.description,
            songs: request.songs,
        }
    }
}

pub fn performance_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_performances))
        .route("/:id", get(get_performance));
    let write = Router::new()
        .route("/", post(create_performance))
        .route("/:id", put(replace_performance).delete(delete_performance))
        .guarded(REPERTOIRE_EDITORS);
    read.merge(write)
}

#[utoipa::path(
    get,
    path = "/performances",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Performances, latest first", body = Vec<Performance>))
)]
pub async fn list_performances(State(state): State<AppState>) -> AppResult<Json<Vec<Performance>>> {
    Ok(Json(state.services.performances().list_performances().await?))
}

#[utoipa::path(
    get,
    path = "/performances/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Performance ID")),
    responses(
        (status = 200, description = "Performance with its song tree", body = PerformanceDetail),
        (status = 404, description = "Performance not found")
    )
)]
pub async fn get_performance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PerformanceDetail>> {
    Ok(Json(state.services.performances().get_performance(id).await?))
}

#[utoipa::path(
    post,
    path = "/performances",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    request_body = PerformanceRequest,
    responses(
        (status = 201, description = "Performance created", body = PerformanceDetail),
        (status = 400, description = "Duplicate order, voice type or musician in a song")
    )
)]
pub async fn create_performance(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PerformanceRequest>,
) -> AppResult<(StatusCode, Json<PerformanceDetail>)> {
    let detail = state
        .services
        .performances()
        .create_performance(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    put,
    path = "/performances/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Performance ID")),
    request_body = PerformanceRequest,
    responses(
        (status = 200, description = "Performance and song tree replaced", body = PerformanceDetail),
        (status = 400, description = "Duplicate order, voice type or musician in a song"),
        (status = 404, description = "Performance not found")
    )
)]
pub async fn replace_performance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<PerformanceRequest>,
) -> AppResult<Json<PerformanceDetail>> {
    Ok(Json(
        state
            .services
            .performances()
            .replace_performance(id, payload.into())
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/performances/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Performance ID")),
    responses(
        (status = 204, description = "Performance and its song tree deleted"),
        (status = 404, description = "Performance not found")
    )
)]
pub async fn delete_performance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.performances().delete_performance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
