//! Song repertoire handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{NewSong, Role, Song, SongChanges};

use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, Guarded};
use crate::state::AppState;

pub(crate) const REPERTOIRE_EDITORS: AccessPolicy = AccessPolicy::roles(&[Role::ChoirAdmin]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Amazing Grace")]
    pub title: String,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    #[schema(example = "G Major")]
    pub musical_key: Option<String>,
    pub lyrics: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub musical_key: Option<String>,
    pub lyrics: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SongSearchQuery {
    /// Case-insensitive match on the title
    pub search: Option<String>,
}

pub fn song_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_songs))
        .route("/:id", get(get_song));
    let write = Router::new()
        .route("/", post(create_song))
        .route("/:id", put(update_song).delete(delete_song))
        .guarded(REPERTOIRE_EDITORS);
    read.merge(write)
}

#[utoipa::path(
    get,
    path = "/songs",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(SongSearchQuery),
    responses((status = 200, description = "Songs ordered by title", body = Vec<Song>))
)]
pub async fn list_songs(
    State(state): State<AppState>,
    Query(query): Query<SongSearchQuery>,
) -> AppResult<Json<Vec<Song>>> {
    Ok(Json(state.services.songs().list_songs(query.search).await?))
}

#[utoipa::path(
    get,
    path = "/songs/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Song ID")),
    responses(
        (status = 200, description = "Song", body = Song),
        (status = 404, description = "Song not found")
    )
)]
pub async fn get_song(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Song>> {
    Ok(Json(state.services.songs().get_song(id).await?))
}

#[utoipa::path(
    post,
    path = "/songs",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    request_body = CreateSongRequest,
    responses(
        (status = 201, description = "Song added", body = Song),
        (status = 403, description = "Choir admin only")
    )
)]
pub async fn create_song(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSongRequest>,
) -> AppResult<(StatusCode, Json<Song>)> {
    let song = state
        .services
        .songs()
        .create_song(NewSong {
            title: payload.title,
            composer: payload.composer,
            genre: payload.genre,
            language: payload.language,
            musical_key: payload.musical_key,
            lyrics: payload.lyrics,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(song)))
}

#[utoipa::path(
    put,
    path = "/songs/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Song ID")),
    request_body = UpdateSongRequest,
    responses(
        (status = 200, description = "Song updated", body = Song),
        (status = 404, description = "Song not found")
    )
)]
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateSongRequest>,
) -> AppResult<Json<Song>> {
    let changes = SongChanges {
        title: payload.title,
        composer: payload.composer,
        genre: payload.genre,
        language: payload.language,
        musical_key: payload.musical_key,
        lyrics: payload.lyrics,
    };
    Ok(Json(state.services.songs().update_song(id, changes).await?))
}

#[utoipa::path(
    delete,
    path = "/songs/{id}",
    tag = "Repertoire",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Song ID")),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 404, description = "Song not found")
    )
)]
pub async fn delete_song(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.songs().delete_song(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
