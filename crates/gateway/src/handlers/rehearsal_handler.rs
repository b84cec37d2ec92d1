//! Rehearsal handlers.

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
use domain::{Rehearsal, RehearsalDetail, RehearsalDraft, RehearsalSongDraft};

use super::song_handler::REPERTOIRE_EDITORS;
use crate::extractors::ValidatedJson;
use crate::middleware::Guarded;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RehearsalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Saturday rehearsal")]
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    /// Performance this rehearsal prepares for
    pub performance_id: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub rehearsal_songs: Vec<RehearsalSongDraft>,
}

impl From<RehearsalRequest> for RehearsalDraft {
    fn from(request: RehearsalRequest) -> Self {
        Self {
            title: request.title,
            venue: request.venue,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            performance_id: request.performance_id,
            notes: request.notes,
            rehearsal_songs: request.rehearsal_songs,
        }
    }
}

pub fn rehearsal_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_rehearsals))
        .route("/:id", get(get_rehearsal));
    let write = Router::new()
        .route("/", post(create_rehearsal))
        .route("/:id", put(replace_rehearsal).delete(delete_rehearsal))
        .guarded(REPERTOIRE_EDITORS);
    read.merge(write)
}

#[utoipa::path(
    get,
    path = "/rehearsals",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Rehearsals, latest first", body = Vec<Rehearsal>))
)]
pub async fn list_rehearsals(State(state): State<AppState>) -> AppResult<Json<Vec<Rehearsal>>> {
    Ok(Json(state.services.rehearsals().list_rehearsals().await?))
}

#[utoipa::path(
    get,
    path = "/rehearsals/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rehearsal ID")),
    responses(
        (status = 200, description = "Rehearsal with its songs", body = RehearsalDetail),
        (status = 404, description = "Rehearsal not found")
    )
)]
pub async fn get_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RehearsalDetail>> {
    Ok(Json(state.services.rehearsals().get_rehearsal(id).await?))
}

#[utoipa::path(
    post,
    path = "/rehearsals",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    request_body = RehearsalRequest,
    responses(
        (status = 201, description = "Rehearsal created", body = RehearsalDetail),
        (status = 400, description = "Song order missing or repeated")
    )
)]
pub async fn create_rehearsal(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RehearsalRequest>,
) -> AppResult<(StatusCode, Json<RehearsalDetail>)> {
    let detail = state
        .services
        .rehearsals()
        .create_rehearsal(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    put,
    path = "/rehearsals/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rehearsal ID")),
    request_body = RehearsalRequest,
    responses(
        (status = 200, description = "Rehearsal and song list replaced", body = RehearsalDetail),
        (status = 404, description = "Rehearsal not found")
    )
)]
pub async fn replace_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RehearsalRequest>,
) -> AppResult<Json<RehearsalDetail>> {
    Ok(Json(
        state
            .services
            .rehearsals()
            .replace_rehearsal(id, payload.into())
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/rehearsals/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rehearsal ID")),
    responses(
        (status = 204, description = "Rehearsal deleted"),
        (status = 404, description = "Rehearsal not found")
    )
)]
pub async fn delete_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.rehearsals().delete_rehearsal(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
