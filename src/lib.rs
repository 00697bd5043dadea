//! plex-stereo-default - set a stereo audio track as the default stream
//! for Plex managed users.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod error;
pub mod mkvinfo;
pub mod plex;
pub mod workflow;
