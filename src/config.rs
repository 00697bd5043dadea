//! Startup configuration.
//!
//! The server URL and administrator token are read from the environment
//! exactly once and carried as an explicit value; nothing deeper in the
//! crate touches the environment.

use crate::error::{Error, Result};

/// Environment variable holding the Plex server base URL.
pub const PLEX_URL_VAR: &str = "PLEX_URL";
/// Environment variable holding the administrator token.
pub const PLEX_TOKEN_VAR: &str = "PLEX_TOKEN";

/// Connection settings resolved at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Plex server base URL, without a trailing slash.
    pub base_url: String,
    /// Administrator access token.
    pub token: String,
}

impl Config {
    /// Build a config from `PLEX_URL` and `PLEX_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = require_var(PLEX_URL_VAR)?;
        let token = require_var(PLEX_TOKEN_VAR)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!(
            "{name} environment variable must be set"
        ))),
    }
}
