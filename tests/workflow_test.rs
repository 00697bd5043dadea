//! End-to-end workflow scenarios over mock collaborators.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use plex_stereo_default::error::{Error, Result};
use plex_stereo_default::mkvinfo::TrackLocator;
use plex_stereo_default::plex::{
    AccountDirectory, Media, MediaItem, MediaServer, Part, Stream, AUDIO_STREAM_TYPE,
};
use plex_stereo_default::workflow::Workflow;

/// In-memory stand-in for a Plex server, recording every mutation call.
#[derive(Default)]
struct FakeServer {
    items: Vec<MediaItem>,
    /// (part_id, stream_id, token) per mark_default_audio call.
    mutations: Mutex<Vec<(i64, i64, String)>>,
}

#[async_trait]
impl MediaServer for FakeServer {
    async fn machine_identifier(&self) -> Result<String> {
        Ok("machine-1".to_string())
    }

    async fn section_key(&self, name: &str) -> Result<String> {
        if name == "Movies" {
            Ok("1".to_string())
        } else {
            Err(Error::NotFound {
                entity: "library section".into(),
                id: name.into(),
            })
        }
    }

    async fn section_items(&self, _section_key: &str) -> Result<Vec<MediaItem>> {
        Ok(self.items.clone())
    }

    async fn fetch_item(&self, key: &str, _token: &str) -> Result<MediaItem> {
        self.items
            .iter()
            .find(|i| i.key == key)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                entity: "item".into(),
                id: key.into(),
            })
    }

    async fn mark_default_audio(&self, part_id: i64, stream_id: i64, token: &str) -> Result<()> {
        self.mutations
            .lock()
            .unwrap()
            .push((part_id, stream_id, token.to_string()));
        Ok(())
    }
}

/// Account directory with a fixed set of known users.
struct FakeAccounts {
    tokens: HashMap<String, String>,
}

impl FakeAccounts {
    fn with_user(name: &str) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(name.to_string(), format!("token-{name}"));
        Self { tokens }
    }
}

#[async_trait]
impl AccountDirectory for FakeAccounts {
    async fn user_token(&self, username: &str, _machine_id: &str) -> Result<Option<String>> {
        Ok(self.tokens.get(username).cloned())
    }
}

/// Locator answering from a path -> track table instead of running mkvinfo.
#[derive(Default)]
struct FakeLocator {
    tracks: HashMap<PathBuf, i64>,
}

#[async_trait]
impl TrackLocator for FakeLocator {
    async fn stereo_track(&self, path: &Path) -> Result<Option<i64>> {
        Ok(self.tracks.get(path).copied())
    }
}

/// Create a real .mkv file so the workflow's existence check passes.
fn touch_mkv(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"matroska").unwrap();
    path
}

fn item(key: &str, title: &str, part_id: i64, file: &Path, streams: Vec<Stream>) -> MediaItem {
    MediaItem {
        key: key.to_string(),
        title: title.to_string(),
        media: vec![Media {
            parts: vec![Part {
                id: part_id,
                file: Some(file.to_string_lossy().into_owned()),
                streams,
            }],
        }],
    }
}

fn audio_stream(id: i64, index: i64) -> Stream {
    Stream {
        id,
        stream_type: AUDIO_STREAM_TYPE,
        index: Some(index),
        default: false,
    }
}

#[tokio::test]
async fn stereo_item_is_updated_and_no_audio_item_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = touch_mkv(&dir, "a.mkv");
    let path_b = touch_mkv(&dir, "b.mkv");

    let server = FakeServer {
        items: vec![
            item(
                "/library/metadata/1",
                "A",
                10,
                &path_a,
                vec![audio_stream(100, 0)],
            ),
            // B has no audio streams at all.
            item("/library/metadata/2", "B", 20, &path_b, vec![]),
        ],
        ..Default::default()
    };
    let accounts = FakeAccounts::with_user("alice");
    let mut locator = FakeLocator::default();
    locator.tracks.insert(path_a.clone(), 0);

    let workflow = Workflow::new(&server, &accounts, &locator, false);
    workflow
        .run("Movies", &["alice".to_string()])
        .await
        .unwrap();

    let mutations = server.mutations.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0], (10, 100, "token-alice".to_string()));
}

#[tokio::test]
async fn dry_run_issues_no_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch_mkv(&dir, "movie.mkv");

    let server = FakeServer {
        items: vec![item(
            "/library/metadata/1",
            "Movie",
            10,
            &path,
            vec![audio_stream(100, 1)],
        )],
        ..Default::default()
    };
    let accounts = FakeAccounts::with_user("alice");
    let mut locator = FakeLocator::default();
    locator.tracks.insert(path.clone(), 1);

    let workflow = Workflow::new(&server, &accounts, &locator, true);
    workflow
        .run("Movies", &["alice".to_string()])
        .await
        .unwrap();

    assert!(server.mutations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_user_does_not_abort_other_users() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch_mkv(&dir, "movie.mkv");

    let server = FakeServer {
        items: vec![item(
            "/library/metadata/1",
            "Movie",
            10,
            &path,
            vec![audio_stream(100, 0)],
        )],
        ..Default::default()
    };
    let accounts = FakeAccounts::with_user("alice");
    let mut locator = FakeLocator::default();
    locator.tracks.insert(path.clone(), 0);

    let workflow = Workflow::new(&server, &accounts, &locator, false);
    // "bob" is unknown; "alice" must still be fully processed.
    workflow
        .run("Movies", &["alice".to_string(), "bob".to_string()])
        .await
        .unwrap();

    assert_eq!(server.mutations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn no_matching_stream_index_issues_no_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch_mkv(&dir, "movie.mkv");

    let server = FakeServer {
        items: vec![item(
            "/library/metadata/1",
            "Movie",
            10,
            &path,
            // Only stream index 3 exists; locator reports track 0.
            vec![audio_stream(100, 3)],
        )],
        ..Default::default()
    };
    let accounts = FakeAccounts::with_user("alice");
    let mut locator = FakeLocator::default();
    locator.tracks.insert(path.clone(), 0);

    let workflow = Workflow::new(&server, &accounts, &locator, false);
    workflow
        .run("Movies", &["alice".to_string()])
        .await
        .unwrap();

    assert!(server.mutations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_mkv_and_missing_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mp4 = dir.path().join("movie.mp4");
    std::fs::write(&mp4, b"x").unwrap();

    let server = FakeServer {
        items: vec![
            item(
                "/library/metadata/1",
                "Wrong extension",
                10,
                &mp4,
                vec![audio_stream(100, 0)],
            ),
            item(
                "/library/metadata/2",
                "Missing file",
                20,
                Path::new("/nonexistent/gone.mkv"),
                vec![audio_stream(200, 0)],
            ),
        ],
        ..Default::default()
    };
    let accounts = FakeAccounts::with_user("alice");
    let mut locator = FakeLocator::default();
    locator.tracks.insert(mp4.clone(), 0);
    locator
        .tracks
        .insert(PathBuf::from("/nonexistent/gone.mkv"), 0);

    let workflow = Workflow::new(&server, &accounts, &locator, false);
    workflow
        .run("Movies", &["alice".to_string()])
        .await
        .unwrap();

    assert!(server.mutations.lock().unwrap().is_empty());
}
