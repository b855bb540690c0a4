use std::path::{Path, PathBuf};

use tokio::sync::Semaphore;

use crate::config::ConfigError;
use crate::config::env::{self, EnvKey};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub max_upload_bytes: usize,
    /// `None` leaves transcoder subprocesses unbounded.
    pub max_concurrent_transcodes: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_concurrent_transcodes: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let limit = transcode_limit(env::get_parsed(EnvKey::MaxConcurrentTranscodes, 0)?)?;

        Ok(Self {
            server_host: env::get_or(EnvKey::ServerHost, "0.0.0.0"),
            server_port: env::get_parsed(EnvKey::ServerPort, 3000)?,
            upload_dir: env::get_or(EnvKey::UploadDir, "uploads").into(),
            output_dir: env::get_or(EnvKey::OutputDir, "outputs").into(),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg").into(),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES)?,
            max_concurrent_transcodes: limit,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Creates both scratch directories and swaps in their canonical absolute paths.
    pub fn prepare_scratch_dirs(&mut self) -> Result<(), ConfigError> {
        self.upload_dir = prepare_dir(&self.upload_dir)?;
        self.output_dir = prepare_dir(&self.output_dir)?;
        Ok(())
    }
}

/// Zero means unbounded; anything the semaphore cannot hold is rejected.
fn transcode_limit(limit: usize) -> Result<Option<usize>, ConfigError> {
    if limit > Semaphore::MAX_PERMITS {
        return Err(ConfigError::Invalid {
            key: EnvKey::MaxConcurrentTranscodes.as_str(),
            value: limit.to_string(),
        });
    }
    Ok((limit > 0).then_some(limit))
}

fn prepare_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let wrap = |source| ConfigError::ScratchDir {
        path: path.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(path).map_err(wrap)?;
    path.canonicalize().map_err(wrap)
}
