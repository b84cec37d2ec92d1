//! Choir handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Choir, ChoirChanges, NewChoir, Role};

use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, Guarded};
use crate::state::AppState;

const WRITERS: AccessPolicy = AccessPolicy::roles(&[Role::SuperAdmin]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChoirRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    #[schema(example = "Hoziana Choir")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChoirRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

pub fn choir_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_choirs))
        .route("/:id", get(get_choir));
    let write = Router::new()
        .route("/", post(create_choir))
        .route("/:id", put(update_choir).delete(delete_choir))
        .guarded(WRITERS);
    read.merge(write)
}

#[utoipa::path(
    get,
    path = "/choirs",
    tag = "Choirs",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All choirs", body = Vec<Choir>))
)]
pub async fn list_choirs(State(state): State<AppState>) -> AppResult<Json<Vec<Choir>>> {
    Ok(Json(state.services.choirs().list_choirs().await?))
}

#[utoipa::path(
    get,
    path = "/choirs/{id}",
    tag = "Choirs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Choir ID")),
    responses(
        (status = 200, description = "Choir", body = Choir),
        (status = 404, description = "Choir not found")
    )
)]
pub async fn get_choir(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Choir>> {
    Ok(Json(state.services.choirs().get_choir(id).await?))
}

#[utoipa::path(
    post,
    path = "/choirs",
    tag = "Choirs",
    security(("bearer_auth" = [])),
    request_body = CreateChoirRequest,
    responses(
        (status = 201, description = "Choir created", body = Choir),
        (status = 403, description = "Super admin only"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_choir(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateChoirRequest>,
) -> AppResult<(StatusCode, Json<Choir>)> {
    let choir = state
        .services
        .choirs()
        .create_choir(NewChoir {
            name: payload.name,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(choir)))
}

#[utoipa::path(
    put,
    path = "/choirs/{id}",
    tag = "Choirs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Choir ID")),
    request_body = UpdateChoirRequest,
    responses(
        (status = 200, description = "Choir updated", body = Choir),
        (status = 404, description = "Choir not found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update_choir(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateChoirRequest>,
) -> AppResult<Json<Choir>> {
    let choir = state
        .services
        .choirs()
        .update_choir(
            id,
            ChoirChanges {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;
    Ok(Json(choir))
}

#[utoipa::path(
    delete,
    path = "/choirs/{id}",
    tag = "Choirs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Choir ID")),
    responses(
        (status = 204, description = "Choir deleted"),
        (status = 404, description = "Choir not found")
    )
)]
pub async fn delete_choir(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.choirs().delete_choir(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
