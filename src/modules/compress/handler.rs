use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::common::response::{ApiResponse, ApiSuccess, AppError};
use crate::common::upload::receive_video;
use crate::modules::compress::dto::{CompressForm, ServiceInfo};
use crate::modules::compress::service::{CompressService, CompressedVideo};
use crate::state::AppState;

/// Resize and compress an uploaded video
///
/// Scales to 1280px wide, re-encodes as H.264/AAC and returns the result as a
/// download. Both scratch files are removed once the response is finished.
#[utoipa::path(
    post,
    path = "/compress",
    request_body(content = CompressForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Compressed video", content_type = "video/mp4", body = Vec<u8>),
        (status = 400, description = "No file uploaded", body = String),
        (status = 413, description = "Upload too large", body = String),
        (status = 500, description = "Error processing video", body = String)
    ),
    tag = "Compress"
)]
pub async fn compress_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<CompressedVideo, AppError> {
    let multipart = multipart.map_err(|rejection| {
        debug!("Not a multipart request: {}", rejection);
        AppError::NoFile
    })?;

    let upload = receive_video(multipart, &state.scratch).await?;
    CompressService::compress(&state, upload).await
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = ApiResponse<ServiceInfo>)
    ),
    tag = "Service"
)]
pub async fn service_info() -> impl IntoResponse {
    ApiSuccess(
        ApiResponse::success(ServiceInfo::current(), "Video compression API is running"),
        StatusCode::OK,
    )
}
