//! Product image upload route.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Maximum size of a single upload request (all parts combined).
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Build the uploads router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/upload",
        post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
}

/// Response listing the public URLs of uploaded images.
#[derive(Debug, Serialize)]
struct UploadResponse {
    links: Vec<String>,
}

/// Upload one or more product images.
///
/// Accepts multipart form data with `file` parts and returns the public URL
/// of each stored object, in the order the parts were sent.
async fn upload(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut links = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();

        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "unsupported content type: {content_type}"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("empty file".to_string()));
        }

        let link = state
            .storage()
            .upload_image(&filename, &content_type, bytes.to_vec())
            .await?;

        tracing::info!(link = %link, "Image uploaded");
        links.push(link);
    }

    if links.is_empty() {
        return Err(AppError::BadRequest("no file parts in request".to_string()));
    }

    Ok(Json(UploadResponse { links }))
}
