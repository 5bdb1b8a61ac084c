use std::collections::HashMap;

use super::session::ReplyTicket;

/// One cancellable timer per outstanding reply.
///
/// `H` is whatever handle the scheduler returns; dropping it must cancel
/// the timer (as `gloo::timers::callback::Timeout` does).
pub struct ReplyTimers<H> {
    delay_ms: u32,
    handles: HashMap<ReplyTicket, H>,
}

impl<H> ReplyTimers<H> {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            handles: HashMap::new(),
        }
    }

    /// Match the timers to `pending`: start one for each new ticket and
    /// drop those whose ticket was delivered or cancelled
    pub fn sync(&mut self, pending: &[ReplyTicket], mut schedule: impl FnMut(ReplyTicket, u32) -> H) {
        self.handles.retain(|ticket, _| pending.contains(ticket));
        for &ticket in pending {
            let delay_ms = self.delay_ms;
            self.handles
                .entry(ticket)
                .or_insert_with(|| schedule(ticket, delay_ms));
        }
    }

    /// Drop every timer; returns how many were outstanding
    pub fn cancel_all(&mut self) -> usize {
        self.handles.drain().count()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
