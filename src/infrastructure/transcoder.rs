use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Longest stretch of transcoder stderr kept for logs.
const STDERR_TAIL_CHARS: usize = 2000;

/// Resize-and-compress settings applied to every upload.
pub const COMPRESS_PROFILE: TranscodeProfile = TranscodeProfile {
    width: 1280,
    video_codec: "libx264",
    video_bitrate: "1200k",
    preset: "veryfast",
    audio_codec: "aac",
    audio_bitrate: "96k",
};

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("invalid transcode profile: {0}")]
    InvalidProfile(String),
    #[error("invalid path for transcoder: {0:?}")]
    InvalidPath(PathBuf),
    #[error("failed to launch transcoder {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("transcoder exited with {status}: {stderr_tail}")]
    Failed {
        status: ExitStatus,
        stderr_tail: String,
    },
    #[error("transcoder reported success but produced no output at {0:?}")]
    MissingOutput(PathBuf),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscodeProfile {
    /// Target width; height follows the aspect ratio, rounded to an even number.
    pub width: u32,
    pub video_codec: &'static str,
    pub video_bitrate: &'static str,
    pub preset: &'static str,
    pub audio_codec: &'static str,
    pub audio_bitrate: &'static str,
}

impl TranscodeProfile {
    pub fn scale_filter(&self) -> String {
        format!("scale={}:-2", self.width)
    }

    pub fn validate(&self) -> Result<(), TranscodeError> {
        if self.width == 0 || self.width % 2 != 0 {
            return Err(TranscodeError::InvalidProfile(format!(
                "width must be a positive even number, got {}",
                self.width
            )));
        }

        for (label, value) in [
            ("video bitrate", self.video_bitrate),
            ("audio bitrate", self.audio_bitrate),
        ] {
            if !is_bitrate(value) {
                return Err(TranscodeError::InvalidProfile(format!(
                    "{label} {value:?} is not a bitrate"
                )));
            }
        }

        for (label, value) in [
            ("video codec", self.video_codec),
            ("preset", self.preset),
            ("audio codec", self.audio_codec),
        ] {
            if !is_plain_name(value) {
                return Err(TranscodeError::InvalidProfile(format!(
                    "{label} {value:?} is not a plain name"
                )));
            }
        }

        Ok(())
    }
}

fn is_bitrate(value: &str) -> bool {
    let digits = value.trim_end_matches(['k', 'K', 'M']);
    let suffix_len = value.len() - digits.len();
    suffix_len <= 1 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_plain_name(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// One run of the transcoder: where to read, where to write, and how.
#[derive(Clone, Debug)]
pub struct TranscodeInvocation {
    pub input: PathBuf,
    pub output: PathBuf,
    pub profile: TranscodeProfile,
}

impl TranscodeInvocation {
    pub fn new(input: &Path, output: &Path, profile: TranscodeProfile) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            profile,
        }
    }

    /// Paths must be absolute so they can never be read as options.
    pub fn validate(&self) -> Result<(), TranscodeError> {
        self.profile.validate()?;
        for path in [&self.input, &self.output] {
            if !path.is_absolute() {
                return Err(TranscodeError::InvalidPath(path.clone()));
            }
        }
        Ok(())
    }

    pub fn args(&self) -> Vec<OsString> {
        let p = &self.profile;
        let mut args: Vec<OsString> = Vec::with_capacity(24);
        for flag in ["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"] {
            args.push(flag.into());
        }
        args.push(self.input.clone().into_os_string());
        for (flag, value) in [
            ("-vf", p.scale_filter()),
            ("-c:v", p.video_codec.to_string()),
            ("-b:v", p.video_bitrate.to_string()),
            ("-preset", p.preset.to_string()),
            ("-c:a", p.audio_codec.to_string()),
            ("-b:a", p.audio_bitrate.to_string()),
        ] {
            args.push(flag.into());
            args.push(value.into());
        }
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Runs the external media transcoder as a child process, one per call.
#[derive(Clone, Debug)]
pub struct Transcoder {
    program: PathBuf,
}

impl Transcoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `invocation` to completion. Suspends only the calling task; there
    /// is no timeout and no retry.
    pub async fn run(&self, invocation: &TranscodeInvocation) -> Result<(), TranscodeError> {
        invocation.validate()?;

        info!(
            "🎬 Transcoding {:?} -> {:?}",
            invocation.input, invocation.output
        );
        let started = Instant::now();

        let output = Command::new(&self.program)
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr_tail = tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_CHARS);
            debug!(
                "Transcoder failed after {:?} with {}: {}",
                started.elapsed(),
                output.status,
                stderr_tail
            );
            return Err(TranscodeError::Failed {
                status: output.status,
                stderr_tail,
            });
        }

        if !invocation.output.is_file() {
            return Err(TranscodeError::MissingOutput(invocation.output.clone()));
        }

        info!(
            "✅ Transcoded {:?} in {:?}",
            invocation.output,
            started.elapsed()
        );
        Ok(())
    }
}

fn tail(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(max_chars)).collect()
}
