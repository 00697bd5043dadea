use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plex-stereo-default")]
#[command(author, version, about = "Set stereo audio as the default stream for managed users")]
pub struct Cli {
    /// Plex library section name
    #[arg(long)]
    pub library: String,

    /// Comma-separated managed user names
    #[arg(long)]
    pub users: String,

    /// Show actions without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override path to the mkvinfo executable
    #[arg(long)]
    pub mkvinfo: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Split the `--users` value on commas, trimming entries and dropping
/// empty ones.
pub fn parse_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}
