use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::common::scratch::ScratchDirs;
use crate::config::settings::AppConfig;
use crate::infrastructure::transcoder::Transcoder;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub scratch: ScratchDirs,
    pub transcoder: Transcoder,
    /// Present only when `MAX_CONCURRENT_TRANSCODES` is set.
    pub transcode_slots: Option<Arc<Semaphore>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let scratch = ScratchDirs::new(&config.upload_dir, &config.output_dir);
        let transcoder = Transcoder::new(&config.ffmpeg_path);
        let transcode_slots = config
            .max_concurrent_transcodes
            .map(|limit| Arc::new(Semaphore::new(limit)));

        Self {
            config: Arc::new(config),
            scratch,
            transcoder,
            transcode_slots,
        }
    }
}
