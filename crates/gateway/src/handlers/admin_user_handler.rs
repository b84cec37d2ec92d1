//! Back-office account handlers. Super admins only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use choir_service_lib::service::NewAdminAccount;
use common::AppResult;
use domain::{AdminUserResponse, Role};

use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, Guarded};
use crate::state::AppState;

const SUPER_ADMINS: AccessPolicy = AccessPolicy::roles(&[Role::SuperAdmin]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "treasurer@choir.example")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    #[schema(example = "Grace Ingabire")]
    pub full_name: String,
    pub role: Role,
    pub choir_id: Option<i32>,
}

pub fn admin_user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/:id", delete(deactivate_admin))
        .guarded(SUPER_ADMINS)
}

#[utoipa::path(
    get,
    path = "/admin-users",
    tag = "Admin users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All admin accounts", body = Vec<AdminUserResponse>),
        (status = 403, description = "Super admin only")
    )
)]
pub async fn list_admins(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AdminUserResponse>>> {
    let admins = state.services.admins().list_admins().await?;
    Ok(Json(admins.into_iter().map(AdminUserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/admin-users",
    tag = "Admin users",
    security(("bearer_auth" = [])),
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin account created", body = AdminUserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_admin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<AdminUserResponse>)> {
    let admin = state
        .services
        .admins()
        .create_admin(NewAdminAccount {
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
            role: payload.role,
            choir_id: payload.choir_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(AdminUserResponse::from(admin))))
}

#[utoipa::path(
    delete,
    path = "/admin-users/{id}",
    tag = "Admin users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Admin account ID")),
    responses(
        (status = 204, description = "Account deactivated"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn deactivate_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.admins().deactivate_admin(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
