//! Image Endpoints
//!
//! # Endpoints
//!
//! - `POST /api/nodes/:id/images` - Upload an image and attach it to the node
//! - `DELETE /api/nodes/:id/images?url=` - Delete an image and detach it
//! - `GET /api/uploads` - Progress of uploads still in flight
//!
//! Uploads take the raw file as the request body. The MIME type comes from
//! `Content-Type` and the original file name from `X-File-Name`
//! (percent-encoded when it is not plain ASCII).

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap},
    response::Json,
    routing::{get, post},
    Router,
};
use folio_core::models::{ImageFile, UploadedImage};
use folio_core::services::{GatewayResponse, UploadStatus};
use percent_encoding::percent_decode_str;
use serde::Deserialize;

use crate::api::HttpError;
use crate::state::AppState;

/// Header carrying the original file name
pub const FILE_NAME_HEADER: &str = "x-file-name";

const DEFAULT_FILE_NAME: &str = "image";

#[derive(Debug, Deserialize)]
pub struct RemoveImageQuery {
    url: String,
}

fn header_str<'a>(headers: &'a HeaderMap, name: impl header::AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn file_name_from(headers: &HeaderMap) -> String {
    header_str(headers, FILE_NAME_HEADER)
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
        .map(|name| name.replace('/', "_"))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
}

/// Upload an image to a node
///
/// ```bash
/// curl -X POST http://localhost:3001/api/nodes/abc123/images \
///   -H "Content-Type: image/png" -H "X-File-Name: logo.png" \
///   --data-binary @logo.png
/// ```
async fn add_image(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GatewayResponse<UploadedImage>>, HttpError> {
    let content_type = header_str(&headers, header::CONTENT_TYPE)
        .unwrap_or_default()
        .to_string();
    let file = ImageFile::new(file_name_from(&headers), content_type, body.to_vec());

    let uploaded = state
        .uploads
        .add_image_and_wait(&node_id, file)
        .await
        .map_err(HttpError::upload)?;

    Ok(Json(GatewayResponse::success(
        "image",
        "Image added successfully",
        uploaded,
    )))
}

async fn remove_image(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
    query: Result<Query<RemoveImageQuery>, QueryRejection>,
) -> Result<Json<GatewayResponse<()>>, HttpError> {
    let Query(query) = query.map_err(|e| HttpError::query_rejection("image", e))?;

    state
        .uploads
        .remove_image(&node_id, &query.url)
        .await
        .map_err(|e| HttpError::gateway("image", e))?;

    Ok(Json(GatewayResponse::done("image", "Image removed successfully")))
}

async fn list_uploads(State(state): State<AppState>) -> Json<GatewayResponse<Vec<UploadStatus>>> {
    let active = state.uploads.registry().active().await;
    Json(GatewayResponse::success(
        "upload",
        "Uploads retrieved successfully",
        active,
    ))
}

pub fn routes(state: AppState) -> Router {
    // Leave headroom above the image limit so oversized files reach
    // validation and get a proper envelope back
    let body_limit = usize::try_from(state.max_upload_bytes.saturating_mul(2)).unwrap_or(usize::MAX);

    Router::new()
        .route(
            "/api/nodes/:id/images",
            post(add_image)
                .delete(remove_image)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/uploads", get(list_uploads))
        .with_state(state)
}
