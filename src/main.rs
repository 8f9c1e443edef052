//! Music Shelf - a music catalog browser.
//!
//! Loads a JSON song catalog, filters it, generates daily and themed
//! playlists, plays songs through a circular queue and remembers liked
//! songs between sessions.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover;
pub mod epoch;
pub mod error;
pub mod filter;
pub mod library;
pub mod likes;
pub mod model;
pub mod player;
pub mod playlist;
#[cfg(test)]
pub mod test_utils;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log filter when `RUST_LOG` is unset; covers the crate and its log targets.
const DEFAULT_LOG_FILTER: &str = "music_shelf=info,catalog=info,cover=info,library=info,likes=info,player=info,playlist=info,cli=info";

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli::run_command(&args)? {
        return Ok(());
    }

    // No command given
    cli::Cli::command().print_help()?;
    Ok(())
}
