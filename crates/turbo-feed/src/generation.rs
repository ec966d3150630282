//! Latest-request-wins guard.
//!
//! When tabs or filters change quickly, an older request can resolve after
//! a newer one. Each request takes a ticket; only the holder of the most
//! recent ticket may apply its result.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter for one feed view.
#[derive(Debug, Default)]
pub struct FeedGeneration {
    latest: AtomicU64,
}

/// Proof that a request was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTicket(u64);

impl FeedTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FeedGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier ticket.
    pub fn begin(&self) -> FeedTicket {
        FeedTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether no request has started since this ticket was issued.
    pub fn is_current(&self, ticket: FeedTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}
