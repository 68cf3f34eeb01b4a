/*
 * Everything the tasks share, in one place.
 *
 * The entry point owns a single `CrossingContext` (a `static` on the board)
 * and hands each task only the handles it needs: the monitor gets the two
 * outboxes, the traffic light gets the two inboxes plus the signal writer, the
 * beeper and the status task get a signal reader.
 */

use crate::mailbox::{Crossed, Mailbox, Request};
use crate::signal::SignalState;

pub struct CrossingContext {
    pub requests: Mailbox<Request>,
    pub crossings: Mailbox<Crossed>,
    pub signal: SignalState,
}

impl CrossingContext {
    pub const fn new() -> Self {
        CrossingContext {
            requests: Mailbox::new(),
            crossings: Mailbox::new(),
            signal: SignalState::new(),
        }
    }
}

impl Default for CrossingContext {
    fn default() -> Self {
        Self::new()
    }
}
