//! Communique handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Category, Communique, CommuniqueChanges, NewCommunique, Principal, Role};

use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, ChoirContext, Guarded};
use crate::state::AppState;

const EDITORS: AccessPolicy =
    AccessPolicy::roles(&[Role::ChoirAdmin]).or_categories(&[Category::Committee]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommuniqueRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Uniform fitting on Saturday")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Empty addresses every member
    #[serde(default)]
    pub target_categories: Vec<Category>,
    /// Publish immediately instead of saving a draft
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommuniqueRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub target_categories: Option<Vec<Category>>,
}

pub fn communique_routes() -> Router<AppState> {
    // Readers get what the service lets them see.
    let read = Router::new()
        .route("/", get(list_communiques))
        .route("/:id", get(get_communique));
    let write = Router::new()
        .route("/", post(create_communique))
        .route("/:id", put(update_communique).delete(delete_communique))
        .route("/:id/publish", post(publish_communique))
        .guarded(EDITORS);
    read.merge(write)
}

#[utoipa::path(
    get,
    path = "/communiques",
    tag = "Communiques",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Communiques visible to the caller", body = Vec<Communique>))
)]
pub async fn list_communiques(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
) -> AppResult<Json<Vec<Communique>>> {
    Ok(Json(
        state
            .services
            .communiques()
            .list_communiques(&principal, ctx.scope)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/communiques/{id}",
    tag = "Communiques",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Communique ID")),
    responses(
        (status = 200, description = "Communique", body = Communique),
        (status = 404, description = "Not found or not addressed to the caller")
    )
)]
pub async fn get_communique(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Communique>> {
    Ok(Json(
        state
            .services
            .communiques()
            .get_communique(&principal, ctx.scope, id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/communiques",
    tag = "Communiques",
    security(("bearer_auth" = [])),
    request_body = CreateCommuniqueRequest,
    responses(
        (status = 201, description = "Communique saved", body = Communique),
        (status = 403, description = "Choir admins and committee members only")
    )
)]
pub async fn create_communique(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    ValidatedJson(payload): ValidatedJson<CreateCommuniqueRequest>,
) -> AppResult<(StatusCode, Json<Communique>)> {
    let communique = NewCommunique {
        choir_id: None,
        title: payload.title,
        content: payload.content,
        target_categories: payload.target_categories,
        author_id: None,
        publish: payload.publish,
    };
    let created = state
        .services
        .communiques()
        .create_communique(&principal, ctx.scope, communique)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/communiques/{id}",
    tag = "Communiques",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Communique ID")),
    request_body = UpdateCommuniqueRequest,
    responses(
        (status = 200, description = "Communique updated", body = Communique),
        (status = 404, description = "Communique not found")
    )
)]
pub async fn update_communique(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateCommuniqueRequest>,
) -> AppResult<Json<Communique>> {
    let changes = CommuniqueChanges {
        title: payload.title,
        content: payload.content,
        target_categories: payload.target_categories,
    };
    Ok(Json(
        state
            .services
            .communiques()
            .update_communique(ctx.scope, id, changes)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/communiques/{id}/publish",
    tag = "Communiques",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Communique ID")),
    responses(
        (status = 200, description = "Communique published", body = Communique),
        (status = 404, description = "Communique not found")
    )
)]
pub async fn publish_communique(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Communique>> {
    Ok(Json(
        state
            .services
            .communiques()
            .publish_communique(ctx.scope, id)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/communiques/{id}",
    tag = "Communiques",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Communique ID")),
    responses(
        (status = 204, description = "Communique deleted"),
        (status = 404, description = "Communique not found")
    )
)]
pub async fn delete_communique(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .services
        .communiques()
        .delete_communique(ctx.scope, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
