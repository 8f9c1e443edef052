//! Generated playlist command.

use chrono::{Local, NaiveDate};
use tokio::runtime::Runtime;

use super::{Cli, open_library};
use crate::config::Config;
use crate::cover::CoverResolver;

/// Songs listed under each playlist heading.
const PREVIEW_SONGS: usize = 5;

/// Show the playlists for `date` (default today).
pub fn cmd_playlists(
    rt: &Runtime,
    cli: &Cli,
    config: &Config,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let library = open_library(rt, cli, config)?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let playlists = library.playlists_for(date);
    let covers = CoverResolver::from_config(&config.covers);
    let mut rng = rand::rng();

    if playlists.is_empty() {
        println!("No playlists for {}", date);
        return Ok(());
    }

    println!("Playlists for {}\n", date.format("%A, %-d %B %Y"));
    for playlist in &playlists {
        println!("{} [{}]", playlist.name, playlist.id);
        println!("  {} · {} songs", playlist.subtitle, playlist.songs.len());
        if let Some(song) = playlist.pick_cover(&mut rng) {
            println!("  cover: {}", covers.resolve(&song.id));
        }
        for song in playlist.songs.iter().take(PREVIEW_SONGS) {
            println!("    {} - {}", song.title, song.artist);
        }
        if playlist.songs.len() > PREVIEW_SONGS {
            println!("    … and {} more", playlist.songs.len() - PREVIEW_SONGS);
        }
        println!();
    }
    Ok(())
}
