//! Member handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{
    AttendanceRecord, AttendanceSummary, Category, Gender, MemberStatus, NewUser, Principal, Role,
    StatusReason, UserFilter, UserProfileChanges, UserResponse,
};

use super::patterns::PHONE_NUMBER;
use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, ChoirContext, Guarded};
use crate::state::AppState;

const CHOIR_ADMINS: AccessPolicy = AccessPolicy::roles(&[Role::ChoirAdmin]);

fn default_role() -> Role {
    Role::ChoirMember
}

/// Member registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Ignored for choir-bound callers, who always register into their own choir
    pub choir_id: Option<i32>,
    #[validate(length(min = 1, max = 80, message = "First name must be 1-80 characters"))]
    #[schema(example = "Aline")]
    pub first_name: String,
    #[validate(length(min = 1, max = 80, message = "Last name must be 1-80 characters"))]
    #[schema(example = "Uwase")]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "aline@choir.example")]
    pub email: String,
    #[validate(regex(path = *PHONE_NUMBER, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
    /// Members created without a password cannot log in
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default = "default_role")]
    pub role: Role,
    /// Defaults to today
    pub joined_at: Option<NaiveDate>,
}

/// Profile update. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub choir_id: Option<i32>,
    #[validate(length(min = 1, max = 80, message = "First name must be 1-80 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 80, message = "Last name must be 1-80 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    #[validate(url(message = "Invalid image URL"))]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub status: MemberStatus,
    pub status_reason: StatusReason,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeCategoriesRequest {
    pub categories: Vec<Category>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub status: Option<MemberStatus>,
    pub category: Option<Category>,
    pub active: Option<bool>,
}

impl From<UserListQuery> for UserFilter {
    fn from(query: UserListQuery) -> Self {
        Self {
            status: query.status,
            category: query.category,
            is_active: query.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub fn user_routes() -> Router<AppState> {
    // Attendance reads are checked per member by the service.
    let own = Router::new()
        .route("/me", get(get_current_user))
        .route("/:id/attendance", get(member_attendance))
        .route("/:id/attendance/summary", get(member_attendance_summary));

    let admin = Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(deactivate_user))
        .route("/:id/status", patch(change_status))
        .route("/:id/role", patch(change_role))
        .route("/:id/categories", patch(change_categories))
        .route("/:id/restore", post(restore_user))
        .guarded(CHOIR_ADMINS);

    own.merge(admin)
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current member profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Admin accounts have no member profile")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().me(&principal).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(UserListQuery),
    responses(
        (status = 200, description = "Members of the caller's choir", body = Vec<UserResponse>),
        (status = 403, description = "Choir admin only")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .services
        .users()
        .list_users(ctx.scope, query.into())
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member", body = UserResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(ctx.scope, id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Member registered", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only a super admin may grant SUPER_ADMIN"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = NewUser {
        choir_id: payload.choir_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone_number: payload.phone_number,
        password_hash: None,
        gender: payload.gender,
        date_of_birth: payload.date_of_birth,
        address: payload.address,
        categories: payload.categories,
        role: payload.role,
        joined_at: payload.joined_at.unwrap_or_else(|| Utc::now().date_naive()),
    };

    let created = state
        .services
        .users()
        .create_user(&principal, ctx.scope, user, payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let changes = UserProfileChanges {
        choir_id: payload.choir_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone_number: payload.phone_number,
        gender: payload.gender,
        date_of_birth: payload.date_of_birth,
        address: payload.address,
        profile_image_url: payload.profile_image_url,
    };

    let user = state
        .services
        .users()
        .update_profile(ctx.scope, id, changes)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = UserResponse),
        (status = 400, description = "Transition or reason not allowed"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn change_status(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ChangeStatusRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .change_status(ctx.scope, id, payload.status, payload.status_reason)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 403, description = "Only a super admin may grant SUPER_ADMIN"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn change_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ChangeRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .change_role(&principal, ctx.scope, id, payload.role)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/categories",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    request_body = ChangeCategoriesRequest,
    responses(
        (status = 200, description = "Categories replaced", body = UserResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn change_categories(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ChangeCategoriesRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .change_categories(ctx.scope, id, payload.categories)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Soft delete: the member is deactivated, never removed
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 204, description = "Member deactivated"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.users().deactivate_user(ctx.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/users/{id}/restore",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member restored", body = UserResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn restore_user(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().restore_user(ctx.scope, id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/users/{id}/attendance",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID"), DateRangeQuery),
    responses(
        (status = 200, description = "Attendance records of the member", body = Vec<AttendanceRecord>),
        (status = 403, description = "Members may only read their own records")
    )
)]
pub async fn member_attendance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let records = state
        .services
        .attendance()
        .member_attendance(&principal, ctx.scope, id, range.from, range.to)
        .await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/users/{id}/attendance/summary",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID"), DateRangeQuery),
    responses(
        (status = 200, description = "Attendance counts and rate", body = AttendanceSummary),
        (status = 403, description = "Members may only read their own records")
    )
)]
pub async fn member_attendance_summary(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<AttendanceSummary>> {
    let summary = state
        .services
        .attendance()
        .member_summary(&principal, ctx.scope, id, range.from, range.to)
        .await?;
    Ok(Json(summary))
}
