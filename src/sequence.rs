//! Monotonic fetch tickets for discarding superseded responses.
//!
//! Each fetch takes a ticket before it is sent. When the response arrives it
//! is only applied if its ticket is still the latest one issued; a slower
//! response to an older request can then never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued fetch. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues [`FetchTicket`]s and tracks the latest.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket newer than every ticket issued before it.
    pub fn issue(&self) -> FetchTicket {
        FetchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued ticket, if any.
    pub fn latest(&self) -> Option<FetchTicket> {
        match self.issued.load(Ordering::SeqCst) {
            0 => None,
            n => Some(FetchTicket(n)),
        }
    }

    /// Whether `ticket` is still the latest issued.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}
