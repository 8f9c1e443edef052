//! Liked-songs commands.

use tokio::runtime::Runtime;

use super::{Cli, build_library, open_library, print_events, song_line};
use crate::config::Config;
use crate::error::Error;

/// Toggle the like on a catalog song.
pub fn cmd_like(rt: &Runtime, cli: &Cli, config: &Config, id: &str) -> anyhow::Result<()> {
    let mut library = open_library(rt, cli, config)?;
    let title = match library.catalog().and_then(|c| c.get(id)) {
        Some(song) => song.title.clone(),
        None => return Err(Error::not_found(format!("song {}", id)).into()),
    };

    if library.toggle_like(id)? {
        println!("♥ Liked {}", title);
    } else {
        println!("Removed {} from liked songs", title);
    }
    Ok(())
}

/// List liked songs found in the catalog.
pub fn cmd_likes(rt: &Runtime, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let library = open_library(rt, cli, config)?;
    let songs = library.liked_songs();

    if library.likes().is_empty() {
        println!("No liked songs yet.");
        return Ok(());
    }

    for song in &songs {
        println!("{}", song_line(song, true));
        println!("    id: {}", song.id);
    }

    let missing = library.likes().len().saturating_sub(songs.len());
    if missing > 0 {
        println!("\n{} liked songs are no longer in the catalog", missing);
    }
    Ok(())
}

/// Remove ids from the liked set.
pub fn cmd_unlike(config: &Config, ids: &[String]) -> anyhow::Result<()> {
    let mut library = build_library(config)?;
    let events = library.subscribe();
    let removed = library.delete_likes(ids)?;
    print_events(&events);
    println!("Removed {} of {} songs", removed, ids.len());
    Ok(())
}

/// Clear the liked set.
pub fn cmd_unlike_all(config: &Config) -> anyhow::Result<()> {
    let mut library = build_library(config)?;
    let count = library.likes().len();
    library.delete_all_likes()?;
    println!("Cleared {} liked songs", count);
    Ok(())
}
