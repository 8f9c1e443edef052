//! Playback command.

use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

use super::{Cli, open_library, print_events};
use crate::config::Config;
use crate::error;
use crate::library::Library;
use crate::player::{AudioBackend, AudioMode, FileProbe, HttpProbe, PlayRequest, start_playback};

/// Play `id` with the whole catalog (or the playlist `from`) as queue, then
/// follow `follow` track completions.
pub fn cmd_play(
    rt: &Runtime,
    cli: &Cli,
    config: &Config,
    id: &str,
    from: Option<&str>,
    follow: usize,
    like: bool,
) -> anyhow::Result<()> {
    let mut library = open_library(rt, cli, config)?;
    let events = library.subscribe();
    let backend = backend_for(&config.audio.audio_mode()?)?;
    let delay = Duration::from_millis(config.audio.retry_delay_ms);

    let request = match from {
        Some(playlist_id) => {
            let index = library
                .playlists()
                .iter()
                .find(|p| p.id == playlist_id)
                .and_then(|p| p.songs.iter().position(|s| s.id == id));
            match index {
                Some(index) => library.play_in_playlist(playlist_id, index),
                None => anyhow::bail!("Song {} is not in playlist {}", id, playlist_id),
            }
        }
        None => {
            let index = find_in_view(&mut library, id)?;
            library.play_visible(index)
        }
    };

    let mut next = request;
    for step in 0..=follow {
        let Some(request) = next.take() else {
            break;
        };
        start(rt, &mut library, backend.as_ref(), &request, delay);
        print_events(&events);
        if step < follow {
            next = library.track_ended();
        }
    }

    if like {
        if let Some(liked) = library.toggle_like_current()? {
            println!("{}", if liked { "Liked" } else { "Unliked" });
        }
        print_events(&events);
    }
    Ok(())
}

/// Backend matching the configured audio mode.
fn backend_for(mode: &AudioMode) -> error::Result<Box<dyn AudioBackend>> {
    Ok(match mode {
        AudioMode::LocalFiles { .. } => Box::new(FileProbe),
        AudioMode::Remote { .. } => Box::new(HttpProbe::new()?),
    })
}

/// Position of `id` in the view, growing the window until it shows up.
fn find_in_view(library: &mut Library, id: &str) -> anyhow::Result<usize> {
    loop {
        if let Some(index) = library.visible().iter().position(|s| s.id == id) {
            return Ok(index);
        }
        if library.grow_window().is_empty() {
            anyhow::bail!("No song with id {}", id);
        }
    }
}

fn start(
    rt: &Runtime,
    library: &mut Library,
    backend: &dyn AudioBackend,
    request: &PlayRequest,
    delay: Duration,
) {
    let epoch = library.playback_epoch();
    let result = rt.block_on(start_playback(backend, request, &epoch, delay));
    debug!(target: "cli::play", ok = result.is_ok(), "Playback attempt finished");
    library.finish_playback(request.ticket, result);
}
