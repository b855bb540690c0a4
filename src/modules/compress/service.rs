use tokio::fs::File;
use tracing::{error, info};

use crate::common::response::AppError;
use crate::common::scratch::ScratchFile;
use crate::common::upload::UploadedFile;
use crate::infrastructure::transcoder::{COMPRESS_PROFILE, TranscodeInvocation};
use crate::state::AppState;

/// A finished transcode, ready to be streamed back.
///
/// Holds both scratch files; they are removed once this value (or the
/// response body built from it) is dropped.
#[derive(Debug)]
pub struct CompressedVideo {
    pub file: File,
    pub len: u64,
    pub input: ScratchFile,
    pub output: ScratchFile,
}

impl CompressedVideo {
    /// Attachment name handed to the client, taken from the output path.
    pub fn download_name(&self) -> &str {
        self.output.file_name().unwrap_or("output.mp4")
    }
}

pub struct CompressService;

impl CompressService {
    /// Transcodes `upload` with the fixed compress profile.
    ///
    /// The subprocess runs in its own task that owns both scratch files, so
    /// a caller that disconnects neither cancels the transcode nor strands
    /// its files. On failure the input is removed and nothing else is left.
    pub async fn compress(state: &AppState, upload: UploadedFile) -> Result<CompressedVideo, AppError> {
        let output = ScratchFile::adopt(state.scratch.output_path());
        let invocation = TranscodeInvocation::new(upload.file.path(), output.path(), COMPRESS_PROFILE);
        let transcoder = state.transcoder.clone();
        let slots = state.transcode_slots.clone();

        let job = tokio::spawn(async move {
            let _permit = match slots {
                Some(slots) => Some(
                    slots
                        .acquire_owned()
                        .await
                        .map_err(|_| AppError::Internal("transcode slots closed".to_string()))?,
                ),
                None => None,
            };

            transcoder.run(&invocation).await?;
            Ok::<_, AppError>((upload, output))
        });

        let (upload, output) = job.await.map_err(|e| {
            error!("Transcode task aborted: {}", e);
            AppError::Internal(format!("transcode task aborted: {e}"))
        })??;

        let file = File::open(output.path()).await?;
        let len = file.metadata().await?.len();

        info!(
            "📤 Delivering {:?} ({} bytes, from {} byte upload {:?})",
            output.path(),
            len,
            upload.size,
            upload.original_name.as_deref().unwrap_or("<unnamed>")
        );

        Ok(CompressedVideo {
            file,
            len,
            input: upload.file,
            output,
        })
    }
}
