//! Leave request handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Leave, LeaveStatus, NewLeave, Principal, Role, StatusReason};

use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, ChoirContext, Guarded};
use crate::state::AppState;

const REVIEWERS: AccessPolicy = AccessPolicy::roles(&[Role::ChoirAdmin]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// Member the leave is for. Defaults to the caller; required for admin accounts.
    pub user_id: Option<i32>,
    pub reason: StatusReason,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveListQuery {
    pub status: Option<LeaveStatus>,
}

pub fn leave_routes() -> Router<AppState> {
    let own = Router::new()
        .route("/", post(request_leave))
        .route("/mine", get(my_leaves))
        .route("/:id", get(get_leave))
        .route("/:id/cancel", post(cancel_leave));
    let review = Router::new()
        .route("/", get(list_leaves))
        .route("/:id/approve", post(approve_leave))
        .route("/:id/reject", post(reject_leave))
        .guarded(REVIEWERS);

    own.merge(review)
}

#[utoipa::path(
    post,
    path = "/leaves",
    tag = "Leaves",
    security(("bearer_auth" = [])),
    request_body = LeaveRequest,
    responses(
        (status = 201, description = "Leave requested", body = Leave),
        (status = 400, description = "Invalid range or reason"),
        (status = 403, description = "Members may only request leave for themselves")
    )
)]
pub async fn request_leave(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    ValidatedJson(payload): ValidatedJson<LeaveRequest>,
) -> AppResult<(StatusCode, Json<Leave>)> {
    let user_id = payload
        .user_id
        .or_else(|| principal.member_id())
        .ok_or_else(|| AppError::validation("userId is required for admin accounts"))?;

    let leave = NewLeave {
        user_id,
        reason: payload.reason,
        start_date: payload.start_date,
        end_date: payload.end_date,
        note: payload.note,
    };
    let created = state
        .services
        .leaves()
        .request_leave(&principal, ctx.scope, leave)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/leaves/mine",
    tag = "Leaves",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "The caller's own requests", body = Vec<Leave>))
)]
pub async fn my_leaves(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<Leave>>> {
    Ok(Json(state.services.leaves().my_leaves(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/leaves",
    tag = "Leaves",
    security(("bearer_auth" = [])),
    params(LeaveListQuery),
    responses(
        (status = 200, description = "Requests of members in the caller's choir", body = Vec<Leave>),
        (status = 403, description = "Choir admin only")
    )
)]
pub async fn list_leaves(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Query(query): Query<LeaveListQuery>,
) -> AppResult<Json<Vec<Leave>>> {
    let leaves = state
        .services
        .leaves()
        .list_leaves(ctx.scope, query.status)
        .await?;
    Ok(Json(leaves))
}

#[utoipa::path(
    get,
    path = "/leaves/{id}",
    tag = "Leaves",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave request", body = Leave),
        (status = 403, description = "Not the caller's request"),
        (status = 404, description = "Leave not found")
    )
)]
pub async fn get_leave(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Leave>> {
    Ok(Json(state.services.leaves().get_leave(&principal, ctx.scope, id).await?))
}

/// Approving puts the member on leave with the request's reason
#[utoipa::path(
    post,
    path = "/leaves/{id}/approve",
    tag = "Leaves",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave approved", body = Leave),
        (status = 400, description = "Request is no longer pending"),
        (status = 404, description = "Leave not found")
    )
)]
pub async fn approve_leave(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Leave>> {
    Ok(Json(
        state.services.leaves().approve_leave(&principal, ctx.scope, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/leaves/{id}/reject",
    tag = "Leaves",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave rejected", body = Leave),
        (status = 400, description = "Request is no longer pending"),
        (status = 404, description = "Leave not found")
    )
)]
pub async fn reject_leave(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Leave>> {
    Ok(Json(
        state.services.leaves().reject_leave(&principal, ctx.scope, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/leaves/{id}/cancel",
    tag = "Leaves",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave cancelled", body = Leave),
        (status = 400, description = "Request is no longer pending"),
        (status = 403, description = "Only the requester may cancel")
    )
)]
pub async fn cancel_leave(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> AppResult<Json<Leave>> {
    Ok(Json(
        state.services.leaves().cancel_leave(&principal, id).await?,
    ))
}
