use serde::Deserialize;

/// Stream type code for audio streams in the Plex API.
pub const AUDIO_STREAM_TYPE: i64 = 2;

/// One piece of content in a library section (movie, episode, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaItem {
    /// Metadata key, e.g. `/library/metadata/1234`.
    pub key: String,
    pub title: String,
    #[serde(rename = "Media", default)]
    pub media: Vec<Media>,
}

/// One representation of an item's content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(rename = "Part", default)]
    pub parts: Vec<Part>,
}

/// The file-level representation of a media item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Part {
    pub id: i64,
    pub file: Option<String>,
    #[serde(rename = "Stream", default)]
    pub streams: Vec<Stream>,
}

/// A single stream attached to a part.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub id: i64,
    pub stream_type: i64,
    pub index: Option<i64>,
    #[serde(default)]
    pub default: bool,
}

impl MediaItem {
    /// File path of the first part of the first media, if any.
    pub fn primary_path(&self) -> Option<&str> {
        self.media
            .iter()
            .flat_map(|m| m.parts.iter())
            .find_map(|p| p.file.as_deref())
    }

    /// Every part across every media representation.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.media.iter().flat_map(|m| m.parts.iter())
    }
}

impl Part {
    /// Audio streams of this part.
    pub fn audio_streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams
            .iter()
            .filter(|s| s.stream_type == AUDIO_STREAM_TYPE)
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Generic `MediaContainer` envelope around every server response.
#[derive(Debug, Deserialize)]
pub(crate) struct ContainerResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

/// Server root: identity information.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServerIdentity {
    pub machine_identifier: String,
}

/// `/library/sections` listing.
#[derive(Debug, Deserialize)]
pub(crate) struct SectionList {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<SectionDirectory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SectionDirectory {
    pub key: String,
    pub title: String,
}

/// Any endpoint returning `Metadata` items.
#[derive(Debug, Deserialize)]
pub(crate) struct MetadataList {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<MediaItem>,
}

/// plex.tv managed-user directory.
#[derive(Debug, Deserialize)]
pub(crate) struct HomeUserList {
    #[serde(default)]
    pub users: Vec<HomeUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HomeUser {
    pub uuid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// plex.tv user-switch response carrying the scoped token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwitchResponse {
    pub auth_token: String,
}
