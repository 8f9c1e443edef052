//! Library state-change notifications.
//!
//! Every subscriber gets its own bounded channel. Publishing never blocks:
//! a full subscriber misses the event, and a dropped receiver is forgotten.
//!
//! ```rust,ignore
//! let rx = library.subscribe();
//! while let Ok(event) = rx.recv() {
//!     match event {
//!         LibraryEvent::ViewChanged { total, visible } => redraw(total, visible),
//!         LibraryEvent::Notice(msg) => toast(&msg),
//!         _ => {}
//!     }
//! }
//! ```

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::player::NowPlaying;

/// Pending events buffered per subscriber.
const SUBSCRIBER_BUFFER: usize = 256;

/// Events published by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// A catalog finished loading
    CatalogLoaded { songs: usize },
    /// Catalog loading failed; the message is user-facing
    CatalogFailed { message: String },
    /// The filtered view was rebuilt
    ViewChanged { total: usize, visible: usize },
    /// The window exposed songs `start..end` of the view
    WindowGrew { start: usize, end: usize },
    /// A song became current
    NowPlaying(NowPlaying),
    /// Audio started from this locator
    PlaybackStarted { locator: String },
    /// Audio could not start; the message is user-facing
    PlaybackFailed { message: String },
    /// The liked set changed
    LikesChanged { count: usize },
    /// An action was ignored because its precondition was not met
    Notice(String),
}

/// Fan-out of [`LibraryEvent`]s to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<LibraryEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<LibraryEvent> {
        let (tx, rx) = bounded(SUBSCRIBER_BUFFER);
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&mut self, event: LibraryEvent) {
        tracing::trace!(target: "library::events", ?event, "Publish");
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(target: "library::events", "Subscriber lagging, event dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(LibraryEvent::LikesChanged { count: 1 });
        assert_eq!(a.try_recv().unwrap(), LibraryEvent::LikesChanged { count: 1 });
        assert_eq!(b.try_recv().unwrap(), LibraryEvent::LikesChanged { count: 1 });
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(LibraryEvent::Notice("hi".to_string()));
        assert_eq!(bus.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn test_full_subscriber_does_not_block() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();
        for i in 0..SUBSCRIBER_BUFFER + 10 {
            bus.publish(LibraryEvent::CatalogLoaded { songs: i });
        }
        assert_eq!(rx.len(), SUBSCRIBER_BUFFER);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
