//! Leadership and louado shift handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{
    Category, LeadershipShift, LeadershipShiftChanges, LouadoShift, LouadoShiftChanges,
    NewLeadershipShift, NewLouadoShift, Role, ShiftStatus,
};

use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, Guarded};
use crate::state::AppState;

const SCHEDULERS: AccessPolicy = AccessPolicy::roles(&[Role::ChoirAdmin]);
const LOUADO_READERS: AccessPolicy =
    AccessPolicy::roles(&[Role::ChoirAdmin]).or_categories(&[Category::Louado]);

fn upcoming() -> ShiftStatus {
    ShiftStatus::Upcoming
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    #[schema(example = "Term 2024 A")]
    pub name: String,
    pub leader_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Defaults to Upcoming
    #[serde(default = "upcoming")]
    pub status: ShiftStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    pub leader_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ShiftStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ShiftStatusRequest {
    pub status: ShiftStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLouadoShiftRequest {
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLouadoShiftRequest {
    pub user_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub fn leadership_shift_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_shifts))
        .route("/current", get(current_shift))
        .route("/:id", get(get_shift));
    let write = Router::new()
        .route("/", post(create_shift))
        .route("/:id", put(update_shift).delete(delete_shift))
        .route("/:id/activate", post(activate_shift))
        .route("/:id/status", patch(set_shift_status))
        .guarded(SCHEDULERS);
    read.merge(write)
}

pub fn louado_shift_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_louado_shifts))
        .route("/:id", get(get_louado_shift))
        .guarded(LOUADO_READERS);
    let write = Router::new()
        .route("/", post(create_louado_shift))
        .route("/:id", put(update_louado_shift).delete(delete_louado_shift))
        .guarded(SCHEDULERS);
    read.merge(write)
}

#[utoipa::path(
    get,
    path = "/leadership-shifts",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Shifts, latest first", body = Vec<LeadershipShift>))
)]
pub async fn list_shifts(State(state): State<AppState>) -> AppResult<Json<Vec<LeadershipShift>>> {
    Ok(Json(state.services.leadership_shifts().list_shifts().await?))
}

/// The active shift, or `null` when none is active
#[utoipa::path(
    get,
    path = "/leadership-shifts/current",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Active shift or null", body = Option<LeadershipShift>))
)]
pub async fn current_shift(
    State(state): State<AppState>,
) -> AppResult<Json<Option<LeadershipShift>>> {
    Ok(Json(state.services.leadership_shifts().current_shift().await?))
}

#[utoipa::path(
    get,
    path = "/leadership-shifts/{id}",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Shift", body = LeadershipShift),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn get_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LeadershipShift>> {
    Ok(Json(state.services.leadership_shifts().get_shift(id).await?))
}

#[utoipa::path(
    post,
    path = "/leadership-shifts",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    request_body = CreateShiftRequest,
    responses(
        (status = 201, description = "Shift scheduled", body = LeadershipShift),
        (status = 400, description = "Invalid dates or status")
    )
)]
pub async fn create_shift(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateShiftRequest>,
) -> AppResult<(StatusCode, Json<LeadershipShift>)> {
    let shift = state
        .services
        .leadership_shifts()
        .create_shift(NewLeadershipShift {
            name: payload.name,
            leader_id: payload.leader_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            status: payload.status,
            notes: payload.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

#[utoipa::path(
    put,
    path = "/leadership-shifts/{id}",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shift ID")),
    request_body = UpdateShiftRequest,
    responses(
        (status = 200, description = "Shift updated", body = LeadershipShift),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn update_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateShiftRequest>,
) -> AppResult<Json<LeadershipShift>> {
    let changes = LeadershipShiftChanges {
        name: payload.name,
        leader_id: payload.leader_id,
        start_date: payload.start_date,
        end_date: payload.end_date,
        status: payload.status,
        notes: payload.notes,
    };
    Ok(Json(
        state
            .services
            .leadership_shifts()
            .update_shift(id, changes)
            .await?,
    ))
}

/// Make this shift the only active one; the previous active shift completes
#[utoipa::path(
    post,
    path = "/leadership-shifts/{id}/activate",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Shift active", body = LeadershipShift),
        (status = 400, description = "Shift is completed or cancelled"),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn activate_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LeadershipShift>> {
    Ok(Json(
        state.services.leadership_shifts().activate_shift(id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/leadership-shifts/{id}/status",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shift ID")),
    request_body = ShiftStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = LeadershipShift),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn set_shift_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ShiftStatusRequest>,
) -> AppResult<Json<LeadershipShift>> {
    Ok(Json(
        state
            .services
            .leadership_shifts()
            .set_shift_status(id, payload.status)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/leadership-shifts/{id}",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 204, description = "Shift deleted"),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn delete_shift(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.leadership_shifts().delete_shift(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/louado-shifts",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Louado rota by start date", body = Vec<LouadoShift>),
        (status = 403, description = "Louado members and choir admins only")
    )
)]
pub async fn list_louado_shifts(State(state): State<AppState>) -> AppResult<Json<Vec<LouadoShift>>> {
    Ok(Json(state.services.louado_shifts().list_louado_shifts().await?))
}

#[utoipa::path(
    get,
    path = "/louado-shifts/{id}",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Louado shift ID")),
    responses(
        (status = 200, description = "Louado shift", body = LouadoShift),
        (status = 404, description = "Louado shift not found")
    )
)]
pub async fn get_louado_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LouadoShift>> {
    Ok(Json(state.services.louado_shifts().get_louado_shift(id).await?))
}

#[utoipa::path(
    post,
    path = "/louado-shifts",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    request_body = CreateLouadoShiftRequest,
    responses(
        (status = 201, description = "Louado shift scheduled", body = LouadoShift),
        (status = 400, description = "Shift ends before it starts")
    )
)]
pub async fn create_louado_shift(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateLouadoShiftRequest>,
) -> AppResult<(StatusCode, Json<LouadoShift>)> {
    let shift = state
        .services
        .louado_shifts()
        .create_louado_shift(NewLouadoShift {
            user_id: payload.user_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            notes: payload.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

#[utoipa::path(
    put,
    path = "/louado-shifts/{id}",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Louado shift ID")),
    request_body = UpdateLouadoShiftRequest,
    responses(
        (status = 200, description = "Louado shift updated", body = LouadoShift),
        (status = 404, description = "Louado shift not found")
    )
)]
pub async fn update_louado_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateLouadoShiftRequest>,
) -> AppResult<Json<LouadoShift>> {
    let changes = LouadoShiftChanges {
        user_id: payload.user_id,
        start_date: payload.start_date,
        end_date: payload.end_date,
        notes: payload.notes,
    };
    Ok(Json(
        state
            .services
            .louado_shifts()
            .update_louado_shift(id, changes)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/louado-shifts/{id}",
    tag = "Shifts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Louado shift ID")),
    responses(
        (status = 204, description = "Louado shift deleted"),
        (status = 404, description = "Louado shift not found")
    )
)]
pub async fn delete_louado_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.louado_shifts().delete_louado_shift(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
