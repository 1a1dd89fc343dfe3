//! Supersession of in-flight route requests.
//!
//! Each new request takes a ticket. Once a newer ticket has been issued the
//! older request is stale and its result must be dropped instead of
//! delivered. Nothing ever waits on a ticket.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, superseding every earlier one
    pub fn begin(&self) -> RequestTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket { generation }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }
}
