//! Ephemeral files owned by a single request.
//!
//! Every upload and every transcoder output lives behind a [`ScratchFile`]
//! guard. Dropping the guard removes the file, which is how cleanup runs
//! after a successful delivery, a failed transcode, a broken response stream
//! or a client that went away mid-request.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Extension given to every transcoder output.
pub const OUTPUT_EXTENSION: &str = "mp4";

#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Takes ownership of `path`. The file does not have to exist yet.
    pub fn adopt(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed scratch file {:?}", self.path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove scratch file {:?}: {}", self.path, e),
        }
    }
}

/// The two scratch directories the pipeline writes into.
#[derive(Clone, Debug)]
pub struct ScratchDirs {
    uploads: PathBuf,
    outputs: PathBuf,
}

impl ScratchDirs {
    pub fn new(uploads: impl Into<PathBuf>, outputs: impl Into<PathBuf>) -> Self {
        Self {
            uploads: uploads.into(),
            outputs: outputs.into(),
        }
    }

    /// Fresh path for an inbound upload.
    pub fn upload_path(&self) -> PathBuf {
        self.uploads.join(format!("upload-{}", Uuid::new_v4().simple()))
    }

    /// Fresh path for a transcoder output. Random per call, so two requests
    /// arriving at the same instant never share a name.
    pub fn output_path(&self) -> PathBuf {
        self.outputs
            .join(format!("output-{}.{}", Uuid::new_v4().simple(), OUTPUT_EXTENSION))
    }
}
