pub mod env;
pub mod settings;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to prepare scratch directory {path}: {source}")]
    ScratchDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
