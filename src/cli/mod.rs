//! Command-line interface for music-shelf.
//!
//! This module provides commands for browsing the catalog, showing the
//! generated playlists, playing songs and managing liked songs.

mod commands;

pub use commands::{Cli, Commands, run_command};
