//! Application state.
//!
//! [`Library`] is the single owner of everything the user interacts with:
//! the loaded catalog, the active filter, the visible window, generated
//! playlists, the player and the liked set. All mutation goes through
//! `&mut Library`; observers follow along through [`LibraryEvent`]s.
//!
//! # Async boundaries
//!
//! Catalog fetches and audio starts run outside the library. Each begins
//! with a call that hands out a [`Ticket`] and ends with a `finish_*` call
//! carrying the ticket back; completions that were superseded in the
//! meantime are discarded.
//!
//! ```rust,ignore
//! let ticket = library.begin_load();
//! let result = catalog::load(source.as_ref()).await;
//! library.finish_load(ticket, result);
//!
//! if let Some(request) = library.play_visible(0) {
//!     let result = start_playback(&backend, &request, &library.playback_epoch(), delay).await;
//!     library.finish_playback(request.ticket, result);
//! }
//! ```

mod events;
mod window;

pub use events::{EventBus, LibraryEvent};
pub use window::{DEFAULT_CHUNK, Window};

use std::ops::Range;

use chrono::NaiveDate;
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::epoch::{Epoch, Ticket};
use crate::error;
use crate::filter::{self, FilterCriteria};
use crate::likes::LikesStore;
use crate::model::SongRef;
use crate::player::{PlayRequest, PlaybackError, Player};
use crate::playlist::{self, Playlist};

/// The application state owner.
#[derive(Debug)]
pub struct Library {
    catalog: Option<Catalog>,
    criteria: FilterCriteria,
    window: Window,
    playlists: Vec<Playlist>,
    today: NaiveDate,
    player: Player,
    likes: LikesStore,
    loads: Epoch,
    events: EventBus,
}

impl Library {
    /// Empty library; playlists are generated for `today` once a catalog
    /// arrives.
    pub fn new(player: Player, likes: LikesStore, page_size: usize, today: NaiveDate) -> Self {
        Self {
            catalog: None,
            criteria: FilterCriteria::all(),
            window: Window::new(page_size),
            playlists: Vec::new(),
            today,
            player,
            likes,
            loads: Epoch::new(),
            events: EventBus::new(),
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&mut self) -> Receiver<LibraryEvent> {
        self.events.subscribe()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Number of songs passing the current filter.
    pub fn view_total(&self) -> usize {
        self.window.total()
    }

    /// Songs currently exposed by the window.
    pub fn visible(&self) -> &[SongRef] {
        self.window.visible()
    }

    /// Playlists generated for the current day.
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn likes(&self) -> &LikesStore {
        &self.likes
    }

    /// Epoch to hand to [`crate::player::start_playback`].
    pub fn playback_epoch(&self) -> Epoch {
        self.player.epoch().clone()
    }

    // ------------------------------------------------------------------
    // Catalog loading
    // ------------------------------------------------------------------

    /// Start a catalog load, superseding any load still in flight.
    pub fn begin_load(&mut self) -> Ticket {
        let ticket = self.loads.advance();
        debug!(target: "library::load", ?ticket, "Load started");
        ticket
    }

    /// Apply the outcome of a catalog load.
    ///
    /// Returns `false` when the load was superseded and nothing changed.
    /// A failed load keeps the previous catalog (if any).
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Catalog, CatalogError>) -> bool {
        if !self.loads.is_current(ticket) {
            debug!(target: "library::load", ?ticket, "Discarding stale load");
            return false;
        }

        match result {
            Ok(catalog) => {
                info!(target: "library::load", songs = catalog.len(), "Catalog ready");
                let songs = catalog.len();
                self.playlists = playlist::generate(&catalog, self.today);
                self.catalog = Some(catalog);
                self.events.publish(LibraryEvent::CatalogLoaded { songs });
                self.criteria = FilterCriteria::all();
                self.refresh_view();
            }
            Err(e) => {
                warn!(target: "library::load", error = %e, "Catalog load failed");
                self.events.publish(LibraryEvent::CatalogFailed {
                    message: e.to_string(),
                });
            }
        }
        true
    }

    /// Playlists for an arbitrary date, without changing the stored ones.
    pub fn playlists_for(&self, date: NaiveDate) -> Vec<Playlist> {
        self.catalog
            .as_ref()
            .map(|catalog| playlist::generate(catalog, date))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Filtering and the window
    // ------------------------------------------------------------------

    /// Replace the filter and rebuild the view. Inert before a catalog loads.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.catalog.is_none() {
            return;
        }
        self.criteria = criteria;
        self.refresh_view();
    }

    /// Clear every filter axis.
    pub fn reset_filters(&mut self) {
        self.set_criteria(FilterCriteria::all());
    }

    /// Expose the next chunk of the view.
    pub fn grow_window(&mut self) -> Range<usize> {
        let range = self.window.grow();
        if !range.is_empty() {
            self.events.publish(LibraryEvent::WindowGrew {
                start: range.start,
                end: range.end,
            });
        }
        range
    }

    fn refresh_view(&mut self) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        self.window.reset(filter::apply(catalog, &self.criteria));
        debug!(
            target: "library::filter",
            criteria = ?self.criteria,
            total = self.window.total(),
            "View rebuilt"
        );
        self.events.publish(LibraryEvent::ViewChanged {
            total: self.window.total(),
            visible: self.window.visible().len(),
        });
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Play the `index`th visible song; the whole filtered view becomes the
    /// queue.
    pub fn play_visible(&mut self, index: usize) -> Option<PlayRequest> {
        let Some(song) = self.window.visible().get(index).cloned() else {
            self.notice(format!("No song at position {}", index + 1));
            return None;
        };
        let queue = self.window.source().to_vec();
        Some(self.start(&song, Some(queue)))
    }

    /// Play a song of a generated playlist; the playlist becomes the queue.
    pub fn play_in_playlist(&mut self, playlist_id: &str, index: usize) -> Option<PlayRequest> {
        let Some(queue) = self
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .map(|p| p.songs.clone())
        else {
            self.notice(format!("No playlist named {}", playlist_id));
            return None;
        };
        let Some(song) = queue.get(index).cloned() else {
            self.notice(format!("Playlist {} has no song {}", playlist_id, index + 1));
            return None;
        };
        Some(self.start(&song, Some(queue)))
    }

    /// Play a catalog song by id, keeping the current queue.
    pub fn play_id(&mut self, id: &str) -> Option<PlayRequest> {
        let song = self.catalog.as_ref().and_then(|c| c.get(id)).cloned();
        let Some(song) = song else {
            self.notice(format!("Unknown song {}", id));
            return None;
        };
        Some(self.start(&song, None))
    }

    /// Skip to the next queued song. Does nothing when nothing is playing.
    pub fn play_next(&mut self) -> Option<PlayRequest> {
        let request = self.player.play_next()?;
        self.announce(&request);
        Some(request)
    }

    /// The current song finished; continue with the queue.
    pub fn track_ended(&mut self) -> Option<PlayRequest> {
        let request = self.player.track_ended()?;
        self.announce(&request);
        Some(request)
    }

    /// Apply the outcome of an audio start.
    ///
    /// Returns `false` when the request was superseded and the result was
    /// discarded.
    pub fn finish_playback(&mut self, ticket: Ticket, result: Result<String, PlaybackError>) -> bool {
        if !self.player.is_current(ticket) {
            debug!(target: "library::playback", ?ticket, "Discarding stale playback result");
            return false;
        }
        match result {
            Ok(locator) => {
                self.events.publish(LibraryEvent::PlaybackStarted { locator });
            }
            Err(PlaybackError::Superseded) => return false,
            Err(e) => {
                warn!(target: "library::playback", error = %e, "Playback failed");
                self.events.publish(LibraryEvent::PlaybackFailed {
                    message: e.to_string(),
                });
            }
        }
        true
    }

    fn start(&mut self, song: &SongRef, queue: Option<Vec<SongRef>>) -> PlayRequest {
        let request = self.player.play(song, queue);
        self.announce(&request);
        request
    }

    fn announce(&mut self, request: &PlayRequest) {
        info!(
            target: "library::playback",
            id = %request.now_playing.id,
            title = %request.now_playing.title,
            "Now playing"
        );
        self.events
            .publish(LibraryEvent::NowPlaying(request.now_playing.clone()));
    }

    // ------------------------------------------------------------------
    // Likes
    // ------------------------------------------------------------------

    /// Toggle the like on the playing song.
    ///
    /// Returns the new liked state, or `None` (with a notice) when nothing
    /// is playing.
    pub fn toggle_like_current(&mut self) -> error::Result<Option<bool>> {
        let Some(id) = self.player.current_id().map(str::to_string) else {
            self.notice("Nothing is playing".to_string());
            return Ok(None);
        };
        self.toggle_like(&id).map(Some)
    }

    /// Toggle the like on any song id.
    pub fn toggle_like(&mut self, id: &str) -> error::Result<bool> {
        let liked = self.likes.toggle(id)?;
        info!(target: "library::likes", %id, liked, "Like toggled");
        self.likes_changed();
        Ok(liked)
    }

    /// Unlike the given ids; an empty selection only produces a notice.
    pub fn delete_likes(&mut self, ids: &[String]) -> error::Result<usize> {
        if ids.is_empty() {
            self.notice("No songs selected".to_string());
            return Ok(0);
        }
        let removed = self.likes.delete_many(ids.iter().map(String::as_str))?;
        self.likes_changed();
        Ok(removed)
    }

    pub fn delete_all_likes(&mut self) -> error::Result<()> {
        self.likes.delete_all()?;
        self.likes_changed();
        Ok(())
    }

    /// Liked songs present in the loaded catalog, in catalog order.
    pub fn liked_songs(&self) -> Vec<SongRef> {
        self.catalog
            .iter()
            .flat_map(|c| c.songs())
            .filter(|s| self.likes.contains(&s.id))
            .cloned()
            .collect()
    }

    fn likes_changed(&mut self) {
        self.events.publish(LibraryEvent::LikesChanged {
            count: self.likes.len(),
        });
    }

    fn notice(&mut self, message: String) {
        debug!(target: "library", %message, "Notice");
        self.events.publish(LibraryEvent::Notice(message));
    }
}
