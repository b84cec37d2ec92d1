//! Report handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{NewReport, Principal, Report, ReportType, Role};

use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, ChoirContext, Guarded};
use crate::state::AppState;

const REPORTERS: AccessPolicy =
    AccessPolicy::roles(&[Role::ChoirAdmin, Role::FinanceAdmin, Role::AttendanceAdmin]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Q1 attendance")]
    pub title: String,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: Option<ReportType>,
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route("/:id", get(get_report).delete(delete_report))
        .guarded(REPORTERS)
}

#[utoipa::path(
    get,
    path = "/reports",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Reports, latest period first", body = Vec<Report>),
        (status = 403, description = "Admin roles only")
    )
)]
pub async fn list_reports(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<Report>>> {
    Ok(Json(
        state
            .services
            .reports()
            .list_reports(ctx.scope, query.report_type)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/reports/{id}",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = Report),
        (status = 404, description = "Report not found")
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Report>> {
    Ok(Json(state.services.reports().get_report(ctx.scope, id).await?))
}

#[utoipa::path(
    post,
    path = "/reports",
    tag = "Reports",
    security(("bearer_auth" = [])),
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report filed", body = Report),
        (status = 400, description = "Period ends before it starts")
    )
)]
pub async fn create_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ctx: ChoirContext,
    ValidatedJson(payload): ValidatedJson<CreateReportRequest>,
) -> AppResult<(StatusCode, Json<Report>)> {
    let report = NewReport {
        choir_id: None,
        title: payload.title,
        report_type: payload.report_type,
        period_start: payload.period_start,
        period_end: payload.period_end,
        content: payload.content,
        author_id: None,
    };
    let created = state
        .services
        .reports()
        .create_report(&principal, ctx.scope, report)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/reports/{id}",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn delete_report(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reports().delete_report(ctx.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
