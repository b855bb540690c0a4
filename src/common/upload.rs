use axum::extract::{Multipart, multipart::Field};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::common::response::AppError;
use crate::common::scratch::{ScratchDirs, ScratchFile};

/// Multipart field that carries the video.
pub const VIDEO_FIELD: &str = "video";

/// A persisted upload. Dropping it deletes the file.
#[derive(Debug)]
pub struct UploadedFile {
    pub file: ScratchFile,
    pub original_name: Option<String>,
    pub size: u64,
}

/// Pulls exactly one `video` file part out of `multipart` and streams it to
/// a fresh path under the upload directory.
///
/// Text fields are drained and ignored. Nothing touches the disk until a
/// `video` file part shows up, so a request without one costs no I/O.
pub async fn receive_video(
    mut multipart: Multipart,
    dirs: &ScratchDirs,
) -> Result<UploadedFile, AppError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let is_file = field.file_name().is_some();
        let name = field.name().unwrap_or_default().to_string();

        if !is_file {
            debug!("Skipping form field {:?}", name);
            drain(field).await?;
            continue;
        }

        if name != VIDEO_FIELD {
            return Err(AppError::UnexpectedField(name));
        }

        if upload.is_some() {
            // The first upload is dropped (and removed) on return.
            return Err(AppError::TooManyFiles);
        }

        upload = Some(persist_field(field, dirs).await?);
    }

    upload.ok_or(AppError::NoFile)
}

async fn drain(mut field: Field<'_>) -> Result<(), AppError> {
    while field.chunk().await?.is_some() {}
    Ok(())
}

async fn persist_field(mut field: Field<'_>, dirs: &ScratchDirs) -> Result<UploadedFile, AppError> {
    let original_name = field.file_name().map(str::to_string);
    let scratch = ScratchFile::adopt(dirs.upload_path());

    let mut file = File::create(scratch.path()).await?;
    let mut size: u64 = 0;

    // `scratch` removes the partial file if any of these bail out.
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(c)) => c,
            Ok(None) => break,
            Err(e) => {
                error!("Upload stream error: {}", e);
                return Err(e.into());
            }
        };
        file.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    file.flush().await?;

    info!(
        "📦 Received upload {:?} ({} bytes) as {:?}",
        original_name.as_deref().unwrap_or("<unnamed>"),
        size,
        scratch.path()
    );

    Ok(UploadedFile {
        file: scratch,
        original_name,
        size,
    })
}
