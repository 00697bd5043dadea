//! Stereo track detection backed by the `mkvinfo` CLI.
//!
//! `mkvinfo` prints a human-readable tree describing the container. The
//! parser here is deliberately tolerant of that format: it keys off
//! substrings per line and resets its per-track state on every new track
//! header, assuming only that the type line precedes the channel line
//! within a block.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Maximum time mkvinfo is allowed to run per file.
const TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Locates a 2-channel audio track inside a media file.
#[async_trait]
pub trait TrackLocator: Send + Sync {
    /// Return the track number of the first stereo audio track, if any.
    async fn stereo_track(&self, path: &Path) -> Result<Option<i64>>;
}

/// Scan captured mkvinfo output for the first 2-channel audio track.
///
/// Track blocks open with a `Track number:` line; the numeric portion
/// before the first `(` is the track identifier. A later `Track type:`
/// line classifies the block, and within an audio block a `Channels:`
/// line with the value `2` ends the scan.
///
/// # Errors
///
/// Returns [`Error::TrackParse`] when a track-number line does not carry
/// a number where one is expected.
pub fn stereo_track_index(output: &str) -> Result<Option<i64>> {
    let mut current_id: Option<i64> = None;
    let mut is_audio = false;

    for raw in output.lines() {
        // Strip mkvinfo's tree decoration ("|  + ").
        let line = raw
            .trim_start_matches(|c: char| c == '|' || c == '+' || c.is_whitespace())
            .trim_end();

        if let Some(rest) = line.strip_prefix("Track number:") {
            let number = rest.split('(').next().unwrap_or("").trim();
            current_id = Some(
                number
                    .parse()
                    .map_err(|_| Error::TrackParse(line.to_string()))?,
            );
            is_audio = false;
        } else if let Some(rest) = line.strip_prefix("Track type:") {
            is_audio = rest.to_lowercase().contains("audio");
        } else if is_audio {
            let lower = line.to_lowercase();
            if let Some(pos) = lower.find("channels:") {
                let value = line[pos + "channels:".len()..].trim();
                if value == "2" {
                    return Ok(current_id);
                }
            }
        }
    }

    Ok(None)
}

/// [`TrackLocator`] backed by the `mkvinfo` executable.
#[derive(Debug, Clone)]
pub struct MkvinfoLocator {
    mkvinfo_path: PathBuf,
}

impl MkvinfoLocator {
    /// Create a locator using the given mkvinfo path.
    pub fn new(mkvinfo_path: PathBuf) -> Self {
        Self { mkvinfo_path }
    }

    /// Resolve the mkvinfo executable.
    ///
    /// An explicit override wins; otherwise `PATH` is searched. When
    /// neither yields a path the bare program name is used, so every
    /// invocation fails and every file is skipped rather than aborting
    /// the run.
    pub fn discover(override_path: Option<PathBuf>) -> Self {
        if let Some(path) = override_path {
            return Self::new(path);
        }
        match which::which("mkvinfo") {
            Ok(path) => Self::new(path),
            Err(_) => {
                tracing::warn!("mkvinfo not found on PATH; all files will be skipped");
                Self::new(PathBuf::from("mkvinfo"))
            }
        }
    }
}

#[async_trait]
impl TrackLocator for MkvinfoLocator {
    async fn stereo_track(&self, path: &Path) -> Result<Option<i64>> {
        let mut cmd = Command::new(&self.mkvinfo_path);
        cmd.arg(path);
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::null());

        // Invocation failure means "could not determine", not an error.
        let output = match tokio::time::timeout(TOOL_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::debug!("mkvinfo failed to run on {:?}: {}", path, e);
                return Ok(None);
            }
            Err(_) => {
                tracing::debug!("mkvinfo timed out on {:?}", path);
                return Ok(None);
            }
        };

        if !output.status.success() {
            tracing::debug!("mkvinfo exited with {} on {:?}", output.status, path);
            return Ok(None);
        }

        stereo_track_index(&String::from_utf8_lossy(&output.stdout))
    }
}
