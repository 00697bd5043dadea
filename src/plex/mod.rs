//! Plex API surface: data model, trait seams, and reqwest clients.

mod client;
mod types;

pub use client::{PlexAccount, PlexServer};
pub use types::{Media, MediaItem, Part, Stream, AUDIO_STREAM_TYPE};

use async_trait::async_trait;

use crate::error::Result;

/// Read/mutate access to one Plex server.
#[async_trait]
pub trait MediaServer: Send + Sync {
    /// Unique identifier of the server, used for token issuance.
    async fn machine_identifier(&self) -> Result<String>;

    /// Resolve a library section key by its display name.
    async fn section_key(&self, name: &str) -> Result<String>;

    /// Every item in the given section, in server-reported order.
    async fn section_items(&self, section_key: &str) -> Result<Vec<MediaItem>>;

    /// Re-fetch an item by key under a specific user's token, including
    /// part and stream detail.
    async fn fetch_item(&self, key: &str, token: &str) -> Result<MediaItem>;

    /// Mark an audio stream as the default for its part.
    async fn mark_default_audio(&self, part_id: i64, stream_id: i64, token: &str) -> Result<()>;
}

/// The plex.tv account directory for managed users.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Resolve a username to a server-scoped access token.
    ///
    /// Returns `Ok(None)` when the username is unknown to the account.
    async fn user_token(&self, username: &str, machine_id: &str) -> Result<Option<String>>;
}
