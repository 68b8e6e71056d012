//! Latest-attempt-wins result slot.
//!
//! Each tabulation attempt begins with a monotonically increasing ticket;
//! a result is only stored if its ticket is still the newest attempt when
//! it arrives. A slow, earlier attempt that completes after a newer one
//! has begun is discarded instead of clobbering the fresher result.

use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct ResultSlot<T> {
    latest: AtomicU64,
    slot: Mutex<Option<(u64, T)>>,
}

impl<T> ResultSlot<T> {
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            slot: Mutex::new(None),
        }
    }

    /// Starts a new attempt, invalidating every ticket issued earlier.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest.load(Ordering::SeqCst)
    }

    /// Stores the result if the ticket is still current; returns whether
    /// the value was accepted.
    pub fn submit(&self, ticket: Ticket, value: T) -> bool {
        let mut guard = self.slot.lock().expect("result slot lock poisoned");
        // Checked under the lock so a stale submit racing a newer begin
        // cannot slip through between check and store.
        if ticket.0 != self.latest.load(Ordering::SeqCst) {
            return false;
        }
        if let Some((stored, _)) = &*guard
            && *stored > ticket.0
        {
            return false;
        }
        *guard = Some((ticket.0, value));
        true
    }

    pub fn take(&self) -> Option<T> {
        self.slot
            .lock()
            .expect("result slot lock poisoned")
            .take()
            .map(|(_, value)| value)
    }
}

impl<T: Clone> ResultSlot<T> {
    pub fn current(&self) -> Option<T> {
        self.slot
            .lock()
            .expect("result slot lock poisoned")
            .as_ref()
            .map(|(_, value)| value.clone())
    }
}
