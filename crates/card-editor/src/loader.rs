//! Tickets for asynchronous asset loads.
//!
//! Decoding completes on a later event. When the user picks a second file
//! before the first finishes, only the newest load may land; earlier
//! completions are stale and dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The newest outstanding load for one asset slot.
#[derive(Debug, Default)]
pub struct LoadSlot {
    pending: Option<LoadTicket>,
}

impl LoadSlot {
    /// Issue a ticket, superseding any load still in flight.
    pub fn begin(&mut self) -> LoadTicket {
        let ticket = LoadTicket::next();
        if let Some(old) = self.pending.replace(ticket) {
            log::debug!("load #{} superseded by #{}", old.id(), ticket.id());
        }
        ticket
    }

    /// Consume `ticket` if it is still the newest. Returns `false` for stale tickets.
    pub fn complete(&mut self, ticket: LoadTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            log::debug!("ignoring stale load #{}", ticket.id());
            false
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let mut slot = LoadSlot::default();
        let first = slot.begin();
        let second = slot.begin();
        assert_ne!(first, second);
        assert!(!slot.complete(first));
        assert!(slot.complete(second));
        assert!(!slot.is_pending());
    }

    #[test]
    fn ticket_completes_once() {
        let mut slot = LoadSlot::default();
        let t = slot.begin();
        assert!(slot.complete(t));
        assert!(!slot.complete(t));
    }

    #[test]
    fn cancel_drops_pending() {
        let mut slot = LoadSlot::default();
        let t = slot.begin();
        slot.cancel();
        assert!(!slot.complete(t));
    }
}
