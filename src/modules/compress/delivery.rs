use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::Stream;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::common::response::AppError;
use crate::common::scratch::ScratchFile;
use crate::modules::compress::service::CompressedVideo;

/// Response body for a compressed video.
///
/// Owns the request's scratch files. Whether the transfer completes, fails
/// or the client hangs up, the body is dropped and both files go with it.
pub struct DeliveryStream {
    inner: ReaderStream<File>,
    sent: u64,
    expected: u64,
    _input: ScratchFile,
    output: ScratchFile,
}

impl DeliveryStream {
    pub fn new(video: CompressedVideo) -> Self {
        Self {
            inner: ReaderStream::new(video.file),
            sent: 0,
            expected: video.len,
            _input: video.input,
            output: video.output,
        }
    }
}

impl Stream for DeliveryStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_next(cx);
        match &polled {
            Poll::Ready(Some(Ok(chunk))) => this.sent += chunk.len() as u64,
            Poll::Ready(Some(Err(e))) => {
                warn!("Failed reading {:?} for delivery: {}", this.output.path(), e)
            }
            Poll::Ready(None) => debug!("Delivered {} bytes of {:?}", this.sent, this.output.path()),
            Poll::Pending => {}
        }
        polled
    }
}

impl Drop for DeliveryStream {
    fn drop(&mut self) {
        if self.sent < self.expected {
            warn!(
                "Delivery of {:?} stopped after {} of {} bytes",
                self.output.path(),
                self.sent,
                self.expected
            );
        }
    }
}

impl IntoResponse for CompressedVideo {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.download_name());
        let len = self.len;

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(header::CONTENT_LENGTH, len)
            .header(header::CONTENT_DISPOSITION, disposition)
            .body(Body::from_stream(DeliveryStream::new(self)))
            .unwrap_or_else(|e| {
                AppError::Internal(format!("failed to build download response: {e}")).into_response()
            })
    }
}
