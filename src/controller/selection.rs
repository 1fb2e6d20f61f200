use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

/// Hands out a ticket per selection so only the latest request's response is kept.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    generation: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<S> {
    pub generation: u64,
    pub selection: S,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin<S>(&self, selection: S) -> Ticket<S> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            generation,
            selection,
        }
    }

    pub fn is_current<S>(&self, ticket: &Ticket<S>) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Returns the response if no newer selection has begun since `ticket`.
    pub fn accept<S: std::fmt::Debug, T>(&self, ticket: &Ticket<S>, response: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            debug!(
                "Discarding stale response for {:?} (generation {})",
                ticket.selection, ticket.generation
            );
            None
        }
    }
}
