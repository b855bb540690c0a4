use axum::{
    Json,
    extract::multipart::MultipartError,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::infrastructure::transcoder::TranscodeError;

pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const PROCESSING_FAILED_MESSAGE: &str = "Error processing video";

#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

pub struct ApiSuccess<T>(pub T, pub StatusCode);

impl<T> IntoResponse for ApiSuccess<ApiResponse<T>>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let (response, status) = (self.0, self.1);
        (status, Json(response)).into_response()
    }
}

/// Everything that can end a compress request early.
///
/// Callers only ever see the short plain-text message; the detail goes to
/// the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("request carried no video file")]
    NoFile,
    #[error("unexpected file field {0:?}")]
    UnexpectedField(String),
    #[error("more than one video file in request")]
    TooManyFiles,
    #[error("malformed multipart upload: {0}")]
    MalformedUpload(#[from] MultipartError),
    #[error("scratch storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoFile | AppError::UnexpectedField(_) | AppError::TooManyFiles => {
                StatusCode::BAD_REQUEST
            }
            AppError::MalformedUpload(e) => e.status(),
            AppError::Storage(_) | AppError::Transcode(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::NoFile => NO_FILE_MESSAGE,
            AppError::UnexpectedField(_) => "Unexpected field",
            AppError::TooManyFiles => "Too many files",
            AppError::MalformedUpload(_) => "Invalid upload",
            AppError::Storage(_) | AppError::Transcode(_) | AppError::Internal(_) => {
                PROCESSING_FAILED_MESSAGE
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Compress request failed: {}", self);
        } else {
            tracing::warn!("Rejected compress request: {}", self);
        }
        (
            status,
            [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.to_string())],
            self.public_message(),
        )
            .into_response()
    }
}
