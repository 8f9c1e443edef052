//! Request tickets for discarding stale async completions.
//!
//! Every catalog load and play request takes a [`Ticket`] from an [`Epoch`].
//! Starting a newer request advances the epoch, so a completion that arrives
//! late can tell it has been superseded and must not touch shared state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter, cheap to clone and share with async tasks.
#[derive(Debug, Clone, Default)]
pub struct Epoch(Arc<AtomicU64>);

/// Identifies one request issued by an [`Epoch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier tickets.
    pub fn advance(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the latest request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
