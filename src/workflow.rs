//! Per-user workflow: walk a library section, find stereo tracks, set them
//! as the default audio stream for each managed user.
//!
//! Failures are contained at the smallest meaningful unit. An unknown user
//! skips that user; a file that cannot be inspected or updated skips that
//! file. Only configuration and section lookup abort a run.

use std::path::Path;

use crate::error::Result;
use crate::mkvinfo::TrackLocator;
use crate::plex::{AccountDirectory, MediaItem, MediaServer};

/// Container extension this tool knows how to inspect.
const SUPPORTED_EXTENSION: &str = "mkv";

/// Per-user outcome counts, logged at the end of each user's pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UserSummary {
    /// Items whose default stream was updated.
    pub updated: usize,
    /// Items where no matching stream was found or the update failed.
    pub failed: usize,
    /// Items skipped (no path, wrong extension, no stereo track, dry run).
    pub skipped: usize,
}

/// One run of the stereo-default workflow over a library section.
pub struct Workflow<'a> {
    server: &'a dyn MediaServer,
    accounts: &'a dyn AccountDirectory,
    locator: &'a dyn TrackLocator,
    dry_run: bool,
}

impl<'a> Workflow<'a> {
    pub fn new(
        server: &'a dyn MediaServer,
        accounts: &'a dyn AccountDirectory,
        locator: &'a dyn TrackLocator,
        dry_run: bool,
    ) -> Self {
        Self {
            server,
            accounts,
            locator,
            dry_run,
        }
    }

    /// Process every requested user against the named library section.
    pub async fn run(&self, library: &str, usernames: &[String]) -> Result<()> {
        let machine_id = self.server.machine_identifier().await?;
        let section_key = self.server.section_key(library).await?;
        let items = self.server.section_items(&section_key).await?;
        tracing::debug!("Found {} items in library '{}'", items.len(), library);

        for username in usernames {
            // One user's failure never aborts the others.
            match self.run_user(username, &machine_id, &items).await {
                Ok(summary) => {
                    tracing::debug!(
                        "{}: {} updated, {} failed, {} skipped",
                        username,
                        summary.updated,
                        summary.failed,
                        summary.skipped
                    );
                }
                Err(e) => {
                    tracing::warn!("Skipping user {}: {}", username, e);
                    println!("User {username} could not be processed");
                }
            }
        }
        Ok(())
    }

    /// Process a single user across all items.
    pub async fn run_user(
        &self,
        username: &str,
        machine_id: &str,
        items: &[MediaItem],
    ) -> Result<UserSummary> {
        let mut summary = UserSummary::default();

        let token = match self.accounts.user_token(username, machine_id).await? {
            Some(token) => token,
            None => {
                println!("User {username} not found");
                return Ok(summary);
            }
        };

        for item in items {
            let Some(path) = eligible_path(item) else {
                summary.skipped += 1;
                continue;
            };

            let track = match self.locator.stereo_track(path).await {
                Ok(Some(track)) => track,
                Ok(None) => {
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", item.title, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            if self.dry_run {
                println!(
                    "[DRY] Would set stereo track {track} for '{}' in {username}",
                    item.title
                );
                summary.skipped += 1;
                continue;
            }

            match self.apply(item, track, &token).await {
                Ok(true) => {
                    println!("Set stereo track for '{}' in {username}", item.title);
                    summary.updated += 1;
                }
                Ok(false) => {
                    println!("Unable to update '{}' for {username}", item.title);
                    summary.failed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to update '{}' for {}: {}", item.title, username, e);
                    println!("Unable to update '{}' for {username}", item.title);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Re-fetch the item under the user's token and set the default stream.
    async fn apply(&self, item: &MediaItem, track: i64, token: &str) -> Result<bool> {
        let user_item = self.server.fetch_item(&item.key, token).await?;
        set_default_audio(self.server, &user_item, track, token).await
    }
}

/// Mark the audio stream matching `track_index` as the default.
///
/// Iterates every part and audio stream of the item; the first stream whose
/// index equals `track_index` triggers exactly one mutation. Returns `false`
/// (and issues no mutation) when no stream matches.
pub async fn set_default_audio(
    server: &dyn MediaServer,
    item: &MediaItem,
    track_index: i64,
    token: &str,
) -> Result<bool> {
    for part in item.parts() {
        for stream in part.audio_streams() {
            if stream.index == Some(track_index) {
                server.mark_default_audio(part.id, stream.id, token).await?;
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Path of the item's primary part when it is inspectable: the file exists
/// locally and carries the supported extension (case-insensitive).
fn eligible_path(item: &MediaItem) -> Option<&Path> {
    let path = Path::new(item.primary_path()?);
    let matches_ext = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION));
    (matches_ext && path.exists()).then_some(path)
}
