//! Playback control.
//!
//! The [`Player`] owns the play queue and turns "play this song" into a
//! [`PlayRequest`]: display metadata plus the audio locators to try. Starting
//! the audio is asynchronous and handled by [`start_playback`] against an
//! [`AudioBackend`]; the player itself never blocks.

mod backend;
mod queue;
mod resolver;
mod state;

pub use backend::{AudioBackend, FileProbe, HttpProbe, start_playback};
#[cfg(test)]
pub use backend::mocks;
pub use queue::PlayQueue;
pub use resolver::{AudioMode, AudioResolver, sanitize_for_filename};
pub use state::{NowPlaying, PlayRequest, format_duration};

use crate::cover::CoverResolver;
use crate::epoch::{Epoch, Ticket};
use crate::model::SongRef;

/// Playback errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaybackError {
    /// One locator could not be played
    #[error("Could not play {locator}: {reason}")]
    Unavailable { locator: String, reason: String },

    /// Every candidate locator failed
    #[error("Could not play {title}. Checked {attempts} sources.")]
    Exhausted { title: String, attempts: usize },

    /// A newer play request replaced this one
    #[error("Play request superseded")]
    Superseded,

    /// Backend setup or usage error
    #[error("Audio backend error: {0}")]
    Backend(String),
}

impl PlaybackError {
    pub fn unavailable(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            locator: locator.into(),
            reason: reason.into(),
        }
    }
}

/// Playback queue controller.
#[derive(Debug, Clone)]
pub struct Player {
    queue: PlayQueue,
    resolver: AudioResolver,
    covers: CoverResolver,
    epoch: Epoch,
}

impl Player {
    pub fn new(resolver: AudioResolver, covers: CoverResolver) -> Self {
        Self {
            queue: PlayQueue::new(),
            resolver,
            covers,
            epoch: Epoch::new(),
        }
    }

    /// Shared epoch; hand a clone to whatever runs [`start_playback`].
    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    pub fn current_id(&self) -> Option<&str> {
        self.queue.current_id()
    }

    /// Whether `ticket` is the latest play request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.epoch.is_current(ticket)
    }

    /// Play `song`, replacing the queue when a new context is given.
    pub fn play(&mut self, song: &SongRef, queue: Option<Vec<SongRef>>) -> PlayRequest {
        self.queue.play(song, queue);
        self.request_for(song)
    }

    /// Advance to the next song in the (circular) queue.
    pub fn play_next(&mut self) -> Option<PlayRequest> {
        let song = self.queue.skip_forward()?;
        Some(self.request_for(&song))
    }

    /// The current song finished on its own; continue with the next one.
    pub fn track_ended(&mut self) -> Option<PlayRequest> {
        tracing::debug!(target: "player", current = ?self.queue.current_id(), "Track ended");
        self.play_next()
    }

    fn request_for(&self, song: &SongRef) -> PlayRequest {
        PlayRequest {
            ticket: self.epoch.advance(),
            now_playing: NowPlaying::new(song, self.covers.resolve(&song.id)),
            locators: self.resolver.locators(song),
            retry: self.resolver.retries(),
        }
    }
}
