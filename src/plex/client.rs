//! reqwest-backed implementations of the Plex trait seams.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};

use super::types::{
    ContainerResponse, HomeUserList, MediaItem, MetadataList, SectionList, ServerIdentity,
    SwitchResponse,
};
use super::{AccountDirectory, MediaServer};

/// Connection timeout for Plex API requests.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// plex.tv base URL for the account directory.
const PLEX_TV_URL: &str = "https://plex.tv";

fn build_client() -> Client {
    Client::builder()
        .timeout(CONNECTION_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            Client::new()
        })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

/// Client for one Plex media server.
pub struct PlexServer {
    client: Client,
    base_url: String,
    admin_token: String,
}

impl PlexServer {
    /// Create a server client from startup configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: build_client(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            admin_token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .header("X-Plex-Token", token)
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MediaServer for PlexServer {
    async fn machine_identifier(&self) -> Result<String> {
        let root: ContainerResponse<ServerIdentity> =
            self.get_json("/", &self.admin_token).await?;
        Ok(root.media_container.machine_identifier)
    }

    async fn section_key(&self, name: &str) -> Result<String> {
        let sections: ContainerResponse<SectionList> =
            self.get_json("/library/sections", &self.admin_token).await?;
        sections
            .media_container
            .directories
            .into_iter()
            .find(|d| d.title == name)
            .map(|d| d.key)
            .ok_or_else(|| Error::NotFound {
                entity: "library section".into(),
                id: name.into(),
            })
    }

    async fn section_items(&self, section_key: &str) -> Result<Vec<MediaItem>> {
        let path = format!("/library/sections/{section_key}/all");
        let items: ContainerResponse<MetadataList> =
            self.get_json(&path, &self.admin_token).await?;
        Ok(items.media_container.metadata)
    }

    async fn fetch_item(&self, key: &str, token: &str) -> Result<MediaItem> {
        let items: ContainerResponse<MetadataList> = self.get_json(key, token).await?;
        items
            .media_container
            .metadata
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                entity: "item".into(),
                id: key.into(),
            })
    }

    async fn mark_default_audio(&self, part_id: i64, stream_id: i64, token: &str) -> Result<()> {
        let path = format!("/library/parts/{part_id}?audioStreamID={stream_id}&allParts=1");
        let response = self
            .client
            .put(self.url(&path))
            .header("X-Plex-Token", token)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Client for the plex.tv account directory.
pub struct PlexAccount {
    client: Client,
    base_url: String,
    admin_token: String,
}

impl PlexAccount {
    /// Create an account client using the administrator token.
    pub fn new(config: &Config) -> Self {
        Self {
            client: build_client(),
            base_url: PLEX_TV_URL.to_string(),
            admin_token: config.token.clone(),
        }
    }
}

#[async_trait]
impl AccountDirectory for PlexAccount {
    async fn user_token(&self, username: &str, machine_id: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/api/v2/home/users", self.base_url))
            .header("X-Plex-Token", &self.admin_token)
            .header("Accept", "application/json")
            .send()
            .await?;
        let users: HomeUserList = check_status(response).await?.json().await?;

        let user = users.users.into_iter().find(|u| {
            u.title.eq_ignore_ascii_case(username)
                || u.username
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(username))
        });
        let Some(user) = user else {
            return Ok(None);
        };

        let response = self
            .client
            .post(format!(
                "{}/api/v2/home/users/{}/switch?machineIdentifier={}",
                self.base_url, user.uuid, machine_id
            ))
            .header("X-Plex-Token", &self.admin_token)
            .header("Accept", "application/json")
            .send()
            .await?;
        let switched: SwitchResponse = check_status(response).await?.json().await?;
        Ok(Some(switched.auth_token))
    }
}
