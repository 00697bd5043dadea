mod cli;

use plex_stereo_default::{config, mkvinfo, plex, workflow};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "plex_stereo_default=trace".to_string()
        } else {
            "plex_stereo_default=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    // Required environment configuration, checked before any network work.
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            Cli::command()
                .error(clap::error::ErrorKind::MissingRequiredArgument, e.to_string())
                .exit();
        }
    };

    let users = cli::parse_users(&cli.users);
    if users.is_empty() {
        Cli::command()
            .error(
                clap::error::ErrorKind::InvalidValue,
                "--users must name at least one user",
            )
            .exit();
    }

    let server = plex::PlexServer::new(&config);
    let accounts = plex::PlexAccount::new(&config);
    let locator = mkvinfo::MkvinfoLocator::discover(cli.mkvinfo);

    let job = workflow::Workflow::new(&server, &accounts, &locator, cli.dry_run);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(job.run(&cli.library, &users))?;
    Ok(())
}
