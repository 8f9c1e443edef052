//! Catalog browsing commands.

use tokio::runtime::Runtime;

use super::{Cli, open_library, song_line};
use crate::config::Config;
use crate::filter::{self, FilterCriteria};

/// List songs passing `criteria`, showing `pages` windows worth.
pub fn cmd_list(
    rt: &Runtime,
    cli: &Cli,
    config: &Config,
    criteria: FilterCriteria,
    pages: usize,
) -> anyhow::Result<()> {
    let mut library = open_library(rt, cli, config)?;
    library.set_criteria(criteria);
    for _ in 1..pages {
        if library.grow_window().is_empty() {
            break;
        }
    }

    if library.view_total() == 0 {
        println!("No songs match the current filters.");
        return Ok(());
    }

    for (i, song) in library.visible().iter().enumerate() {
        println!("{:>4}. {}", i + 1, song_line(song, library.likes().contains(&song.id)));
        println!("      id: {}", song.id);
    }

    let shown = library.visible().len();
    println!("\nShowing {} of {} songs", shown, library.view_total());
    if shown < library.view_total() {
        println!("Use --pages {} to see more", pages.max(1) + 1);
    }
    Ok(())
}

/// Print the genre and artist options.
pub fn cmd_facets(rt: &Runtime, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let library = open_library(rt, cli, config)?;
    let Some(catalog) = library.catalog() else {
        return Ok(());
    };
    let facets = filter::facets(catalog);

    println!("Genres ({}):", facets.genres.len());
    for genre in &facets.genres {
        println!("  {}", genre);
    }
    println!("\nArtists ({}):", facets.artists.len());
    for artist in &facets.artists {
        println!("  {}", artist);
    }
    Ok(())
}
