//! Event and attendance handlers.

use axum::{
    extract::{Path, Query, State},
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
use domain::{
    AttendanceMark, AttendanceRecord, Event, EventChanges, EventFilter, EventType, NewEvent, Role,
};

use super::user_handler::DateRangeQuery;
use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, ChoirContext, Guarded};
use crate::state::AppState;

/// Writes events and keeps their attendance.
const ATTENDANCE_STAFF: AccessPolicy =
    AccessPolicy::roles(&[Role::ChoirAdmin, Role::AttendanceAdmin]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 160, message = "Title must be 1-160 characters"))]
    #[schema(example = "Sunday service")]
    pub title: String,
    pub event_type: EventType,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 160, message = "Title must be 1-160 characters"))]
    pub title: Option<String>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// A batch of marks for one event. Existing marks for the same member are overwritten.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordAttendanceRequest {
    #[validate(length(min = 1, message = "At least one record is required"))]
    pub records: Vec<AttendanceMark>,
}

pub fn event_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_events))
        .route("/:id", get(get_event));
    let staff = Router::new()
        .route("/", post(create_event))
        .route("/:id", put(update_event).delete(delete_event))
        .route(
            "/:id/attendance",
            get(event_attendance).post(record_attendance),
        )
        .guarded(ATTENDANCE_STAFF);

    read.merge(staff)
}

#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Events of the caller's choir", body = Vec<Event>),
        (status = 400, description = "Range ends before it starts")
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let filter = EventFilter {
        from: range.from,
        to: range.to,
    };
    Ok(Json(state.services.events().list_events(ctx.scope, filter).await?))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.services.events().get_event(ctx.scope, id).await?))
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    ctx: ChoirContext,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = NewEvent {
        choir_id: None,
        title: payload.title,
        event_type: payload.event_type,
        location: payload.location,
        starts_at: payload.starts_at,
        ends_at: payload.ends_at,
        description: payload.description,
    };
    let created = state.services.events().create_event(ctx.scope, event).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 404, description = "Event not found")
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> AppResult<Json<Event>> {
    let changes = EventChanges {
        title: payload.title,
        event_type: payload.event_type,
        location: payload.location,
        starts_at: payload.starts_at,
        ends_at: payload.ends_at,
        description: payload.description,
    };
    Ok(Json(
        state
            .services
            .events()
            .update_event(ctx.scope, id, changes)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event and its attendance deleted"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.events().delete_event(ctx.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/events/{id}/attendance",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Marks recorded for the event", body = Vec<AttendanceRecord>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn event_attendance(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    Ok(Json(
        state
            .services
            .attendance()
            .event_attendance(ctx.scope, id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/events/{id}/attendance",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = RecordAttendanceRequest,
    responses(
        (status = 200, description = "Marks stored", body = Vec<AttendanceRecord>),
        (status = 400, description = "Empty batch or a member listed twice"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn record_attendance(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RecordAttendanceRequest>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let records = state
        .services
        .attendance()
        .record_attendance(ctx.scope, id, payload.records)
        .await?;
    Ok(Json(records))
}
