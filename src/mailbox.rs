/*
 * Single-slot mailboxes between the button monitor and the traffic light.
 *
 * A mailbox holds at most one token. Posting into a full mailbox drops the new
 * token: the one already waiting says the same thing, so nothing is lost. The
 * sending side never blocks, the receiving side waits with a deadline.
 */

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender, TrySendError},
};
use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};

pub const MAILBOX_CAPACITY: usize = 1;

type MailboxMutex = CriticalSectionRawMutex;

/// A pedestrian asked to cross (button A).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Request;

/// A pedestrian says they have crossed (button B).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Crossed;

/// What happened to a posted token.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Posted {
    Delivered,
    /// An earlier token was still waiting, this one was dropped.
    Coalesced,
}

pub struct Mailbox<T> {
    channel: Channel<MailboxMutex, T, MAILBOX_CAPACITY>,
}

impl<T> Mailbox<T> {
    pub const fn new() -> Self {
        Mailbox {
            channel: Channel::new(),
        }
    }

    pub fn outbox(&self) -> Outbox<'_, T> {
        Outbox {
            sender: self.channel.sender(),
        }
    }

    pub fn inbox(&self) -> Inbox<'_, T> {
        Inbox {
            receiver: self.channel.receiver(),
        }
    }

    /// Whether a token is waiting to be taken. Diagnostics only.
    pub fn is_pending(&self) -> bool {
        !self.channel.is_empty()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Outbox<'a, T> {
    sender: Sender<'a, MailboxMutex, T, MAILBOX_CAPACITY>,
}

impl<T> Outbox<'_, T> {
    pub fn post(&self, token: T) -> Posted {
        match self.sender.try_send(token) {
            Ok(()) => Posted::Delivered,
            Err(TrySendError::Full(_)) => Posted::Coalesced,
        }
    }
}

impl<T> Clone for Outbox<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Outbox<'_, T> {}

pub struct Inbox<'a, T> {
    receiver: Receiver<'a, MailboxMutex, T, MAILBOX_CAPACITY>,
}

impl<T> Inbox<'_, T> {
    /// Waits for a token until `deadline`. `None` means the deadline passed.
    pub async fn receive_until(&self, deadline: Instant) -> Option<T> {
        match select(self.receiver.receive(), Timer::at(deadline)).await {
            Either::First(token) => Some(token),
            Either::Second(()) => None,
        }
    }

    pub fn try_take(&self) -> Option<T> {
        self.receiver.try_receive().ok()
    }
}

impl<T> Clone for Inbox<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Inbox<'_, T> {}
