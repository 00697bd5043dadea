//! Unified error type for plex-stereo-default.
//!
//! Only configuration and library-lookup failures are fatal for a run;
//! everything else is contained at the per-user or per-file level by the
//! workflow.

/// Unified error type covering all failure modes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An HTTP request could not be performed.
    #[error("HTTP error: {source}")]
    Http {
        /// The underlying reqwest error.
        #[from]
        source: reqwest::Error,
    },

    /// The remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The requested entity could not be found on the server.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "library section").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Diagnostic output declared a track number that is not numeric.
    #[error("Unparsable track number: {0}")]
    TrackParse(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
