use std::env;
use std::str::FromStr;

use crate::config::ConfigError;

#[derive(Clone, Copy, Debug)]
pub enum EnvKey {
    ServerHost,
    ServerPort,
    UploadDir,
    OutputDir,
    FfmpegPath,
    MaxUploadBytes,
    MaxConcurrentTranscodes,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerHost => "HOST",
            EnvKey::ServerPort => "PORT",
            EnvKey::UploadDir => "UPLOAD_DIR",
            EnvKey::OutputDir => "OUTPUT_DIR",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::MaxConcurrentTranscodes => "MAX_CONCURRENT_TRANSCODES",
        }
    }
}

/// Returns the variable's value, treating an empty string as unset.
pub fn get(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    get(key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> Result<T, ConfigError> {
    parse_value(key, get(key).as_deref(), default)
}

/// Parses a raw value for `key`, falling back to `default` when absent.
pub fn parse_value<T: FromStr>(key: EnvKey, raw: Option<&str>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(val) => val.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key: key.as_str(),
            value: val.to_string(),
        }),
    }
}
