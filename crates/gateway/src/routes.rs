//! Route configuration.

use axum::{http::HeaderValue, middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    admin_user_routes, auth_routes, choir_routes, communique_routes, event_routes, health_routes,
    leadership_shift_routes, leave_routes, louado_shift_routes, performance_routes,
    rehearsal_routes, report_routes, song_routes, transaction_routes, upload_routes, user_routes,
};
use crate::middleware::{auth_middleware, choir_context_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
///
/// Authentication runs before choir scoping; per-group access policies run
/// after routing.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes())
        .nest("/choirs", choir_routes())
        .nest("/admin-users", admin_user_routes())
        .nest("/users", user_routes())
        .nest("/events", event_routes())
        .nest("/leaves", leave_routes())
        .nest("/transactions", transaction_routes())
        .nest("/songs", song_routes())
        .nest("/performances", performance_routes())
        .nest("/rehearsals", rehearsal_routes())
        .nest("/leadership-shifts", leadership_shift_routes())
        .nest("/louado-shifts", louado_shift_routes())
        .nest("/communiques", communique_routes())
        .nest("/reports", report_routes())
        .nest("/uploads", upload_routes())
        .layer(middleware::from_fn(choir_context_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}
