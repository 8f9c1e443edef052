//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `browse`: filtered listing and facet lists
//! - `playlists`: generated playlists
//! - `play`: queue playback through the audio backend
//! - `likes`: the liked set
//! - `tools`: catalog relabeling and config setup

mod browse;
mod likes;
mod play;
mod playlists;
mod tools;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::catalog;
use crate::config::{Config, ConfigError};
use crate::cover::CoverResolver;
use crate::error;
use crate::filter::Choice;
use crate::library::{Library, LibraryEvent};
use crate::likes::{JsonFileStore, KeyValueStore, LikesStore};
use crate::model::{LengthBucket, Song};
use crate::player::{AudioResolver, Player};

pub use browse::{cmd_facets, cmd_list};
pub use likes::{cmd_like, cmd_likes, cmd_unlike, cmd_unlike_all};
pub use play::cmd_play;
pub use playlists::cmd_playlists;
pub use tools::{cmd_init_config, cmd_relabel};

/// Music Shelf CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file path or http(s) URL (overrides the config file)
    #[arg(long, global = true, env = "MUSIC_SHELF_CATALOG")]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List catalog songs, optionally filtered
    List {
        /// Case-insensitive text matched against title and artist
        #[arg(short, long, default_value = "")]
        search: String,
        /// Genre to keep ("all" for any)
        #[arg(short, long, default_value = "all")]
        genre: Choice<String>,
        /// Artist name fragment to keep ("all" for any)
        #[arg(short, long, default_value = "all")]
        artist: Choice<String>,
        /// Length bucket: short, mid, long, unknown or all
        #[arg(short, long, default_value = "all")]
        length: Choice<LengthBucket>,
        /// How many pages of results to show
        #[arg(short, long, default_value = "1")]
        pages: usize,
    },
    /// Show the genre and artist options
    Facets,
    /// Show generated playlists
    Playlists {
        /// Date to generate for (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Play a song with the whole catalog as queue
    Play {
        /// Song id
        id: String,
        /// Use this generated playlist as the queue instead
        #[arg(long)]
        from: Option<String>,
        /// Simulate this many track completions afterwards
        #[arg(short, long, default_value = "0")]
        follow: usize,
        /// Toggle the like on the last song played
        #[arg(long)]
        like: bool,
    },
    /// Toggle the like on a song
    Like {
        /// Song id
        id: String,
    },
    /// List liked songs
    Likes,
    /// Remove songs from the liked set
    Unlike {
        /// Song ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Clear the liked set
    UnlikeAll,
    /// Re-cluster song lengths and write them into a catalog file
    Relabel {
        /// Catalog JSON file (a .bak copy is written first)
        file: PathBuf,
    },
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was
/// specified.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let rt = Runtime::new()?;
    let config = crate::config::load();

    match &cli.command {
        Some(Commands::List {
            search,
            genre,
            artist,
            length,
            pages,
        }) => {
            let criteria = crate::filter::FilterCriteria {
                search: search.clone(),
                genre: genre.clone(),
                artist: artist.clone(),
                length: length.clone(),
            };
            cmd_list(&rt, cli, &config, criteria, *pages)?;
            Ok(true)
        }
        Some(Commands::Facets) => {
            cmd_facets(&rt, cli, &config)?;
            Ok(true)
        }
        Some(Commands::Playlists { date }) => {
            cmd_playlists(&rt, cli, &config, *date)?;
            Ok(true)
        }
        Some(Commands::Play {
            id,
            from,
            follow,
            like,
        }) => {
            cmd_play(&rt, cli, &config, id, from.as_deref(), *follow, *like)?;
            Ok(true)
        }
        Some(Commands::Like { id }) => {
            cmd_like(&rt, cli, &config, id)?;
            Ok(true)
        }
        Some(Commands::Likes) => {
            cmd_likes(&rt, cli, &config)?;
            Ok(true)
        }
        Some(Commands::Unlike { ids }) => {
            cmd_unlike(&config, ids)?;
            Ok(true)
        }
        Some(Commands::UnlikeAll) => {
            cmd_unlike_all(&config)?;
            Ok(true)
        }
        Some(Commands::Relabel { file }) => {
            cmd_relabel(file)?;
            Ok(true)
        }
        Some(Commands::InitConfig { force }) => {
            cmd_init_config(&config, *force)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Build a library from config, without loading a catalog.
pub(crate) fn build_library(config: &Config) -> error::Result<Library> {
    let mode = config.audio.audio_mode()?;
    let player = Player::new(
        AudioResolver::new(mode),
        CoverResolver::from_config(&config.covers),
    );
    let likes = LikesStore::load(likes_store(config)?);
    Ok(Library::new(
        player,
        likes,
        config.library.page_size,
        Local::now().date_naive(),
    ))
}

/// Build a library and load the catalog named on the command line or in
/// the config file.
pub(crate) fn open_library(rt: &Runtime, cli: &Cli, config: &Config) -> anyhow::Result<Library> {
    let mut library = build_library(config)?;
    let location = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.source.clone());
    let source = catalog::source_for(&location)?;

    let ticket = library.begin_load();
    let result = rt.block_on(catalog::load(source.as_ref()));
    let failure = result.as_ref().err().cloned();
    library.finish_load(ticket, result);

    match failure {
        Some(e) => Err(anyhow::Error::new(e).context(format!("Could not load catalog from {}", location))),
        None => Ok(library),
    }
}

/// The persistent key-value store for user state.
pub(crate) fn likes_store(config: &Config) -> error::Result<Arc<dyn KeyValueStore>> {
    let dir = config
        .library
        .data_dir()
        .ok_or(ConfigError::NoDataDir)?;
    Ok(Arc::new(JsonFileStore::new(dir)))
}

/// One listing line for a song.
pub(crate) fn song_line(song: &Song, liked: bool) -> String {
    let duration = if song.duration_label.is_empty() {
        "--:--"
    } else {
        song.duration_label.as_str()
    };
    format!(
        "{} {} - {} [{}] {} ({})",
        if liked { "♥" } else { " " },
        song.title,
        song.artist,
        duration,
        song.length_bucket,
        song.genre_text(),
    )
}

/// Print every pending library event.
pub(crate) fn print_events(events: &Receiver<LibraryEvent>) {
    for event in events.try_iter() {
        match event {
            LibraryEvent::NowPlaying(np) => {
                if np.duration.is_empty() {
                    println!("▶ {} - {}", np.title, np.artist);
                } else {
                    println!("▶ {} - {} ({})", np.title, np.artist, np.duration);
                }
                println!("  cover: {}", np.cover);
            }
            LibraryEvent::PlaybackStarted { locator } => println!("  playing from {}", locator),
            LibraryEvent::PlaybackFailed { message } => eprintln!("  {}", message),
            LibraryEvent::LikesChanged { count } => println!("  {} liked songs", count),
            LibraryEvent::Notice(message) => eprintln!("Note: {}", message),
            LibraryEvent::CatalogFailed { message } => eprintln!("Error: {}", message),
            LibraryEvent::CatalogLoaded { .. }
            | LibraryEvent::ViewChanged { .. }
            | LibraryEvent::WindowGrew { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_song, song_with};

    #[test]
    fn test_cli_parses_filters() {
        let cli = Cli::parse_from([
            "music-shelf",
            "--catalog",
            "songs.json",
            "list",
            "--genre",
            "Pop",
            "--length",
            "long",
            "--pages",
            "2",
        ]);
        assert_eq!(cli.catalog.as_deref(), Some("songs.json"));
        match cli.command {
            Some(Commands::List {
                genre,
                artist,
                length,
                pages,
                ..
            }) => {
                assert_eq!(genre, Choice::Only("Pop".to_string()));
                assert_eq!(artist, Choice::All);
                assert_eq!(length, Choice::Only(LengthBucket::Long));
                assert_eq!(pages, 2);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_length() {
        assert!(Cli::try_parse_from(["music-shelf", "list", "--length", "medium"]).is_err());
    }

    #[test]
    fn test_cli_unlike_requires_ids() {
        assert!(Cli::try_parse_from(["music-shelf", "unlike"]).is_err());
        assert!(Cli::try_parse_from(["music-shelf", "unlike", "a", "b"]).is_ok());
    }

    #[test]
    fn test_no_command() {
        assert!(Cli::parse_from(["music-shelf"]).command.is_none());
    }

    #[test]
    fn test_song_line() {
        let line = song_line(&song_with("a", "Kesariya", "Arijit Singh", "4:28", &["Romantic"]), true);
        assert_eq!(line, "♥ Kesariya - Arijit Singh [4:28] Mid (Romantic)");

        let unknown = Song {
            duration_label: String::new(),
            length_bucket: LengthBucket::Unknown,
            ..mock_song("b")
        };
        assert!(song_line(&unknown, false).contains("[--:--] Unknown"));
    }

    #[test]
    fn test_build_library_uses_configured_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.library.data_dir = Some(dir.path().to_path_buf());

        let mut library = build_library(&config).unwrap();
        library.toggle_like("x").unwrap();
        assert!(dir.path().join("liked_songs.json").exists());
    }

    #[test]
    fn test_build_library_rejects_bad_mode() {
        let mut config = Config::default();
        config.audio.mode = "carrier-pigeon".to_string();
        let err = build_library(&config).unwrap_err();
        assert!(matches!(err, error::Error::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_open_library_reports_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.library.data_dir = Some(dir.path().to_path_buf());
        let cli = Cli::parse_from([
            "music-shelf",
            "--catalog",
            &dir.path().join("missing.json").display().to_string(),
            "facets",
        ]);

        let rt = Runtime::new().unwrap();
        let err = open_library(&rt, &cli, &config).unwrap_err();
        assert!(err.to_string().contains("Could not load catalog"));
    }
}
