//! Image upload handler.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::post,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use common::{AppError, AppResult};
use domain::MAX_IMAGE_UPLOAD_BYTES;

use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

const FILE_FIELD: &str = "file";

/// Multipart form accepted by the upload endpoint.
#[derive(ToSchema)]
pub struct ImageUploadForm {
    /// JPEG or PNG, at most 5 MiB
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "https://cdn.choir.example/3f0c2a.png")]
    pub url: String,
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_image))
        .layer(DefaultBodyLimit::max(
            MAX_IMAGE_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
        ))
}

#[utoipa::path(
    post,
    path = "/uploads/images",
    tag = "Uploads",
    security(("bearer_auth" = [])),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing file, unsupported type or too large"),
        (status = 502, description = "Object storage rejected the upload")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    // Reading past the body limit fails here, so oversized bodies are a 400 too.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let url = state
            .uploader
            .upload(content_type.as_deref(), &bytes)
            .await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::bad_request("Multipart field 'file' is required"))
}
