//! Bounded inbound message queue.
//!
//! The transport adapter (message bus client, platform event callbacks)
//! pushes [`Inbound`] messages here; the control loop drains them once per
//! iteration and hands each to
//! [`RelayService::dispatch`](super::service::RelayService::dispatch).
//!
//! Fixed capacity, no heap. When full, the newest message is dropped and
//! counted.

use heapless::Deque;
use log::warn;

use super::commands::{AppCommand, LifecycleEvent};

/// Maximum number of pending messages.
pub const INBOX_CAP: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    Command(AppCommand),
    Lifecycle(LifecycleEvent),
}

impl From<AppCommand> for Inbound {
    fn from(cmd: AppCommand) -> Self {
        Self::Command(cmd)
    }
}

impl From<LifecycleEvent> for Inbound {
    fn from(event: LifecycleEvent) -> Self {
        Self::Lifecycle(event)
    }
}

#[derive(Default)]
pub struct Inbox {
    queue: Deque<Inbound, INBOX_CAP>,
    dropped: u32,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue. Returns `false` if the queue is full (message dropped).
    pub fn push(&mut self, msg: impl Into<Inbound>) -> bool {
        let msg = msg.into();
        if self.queue.push_back(msg).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("Inbox full, dropped {:?}", msg);
            return false;
        }
        true
    }

    pub fn pop(&mut self) -> Option<Inbound> {
        self.queue.pop_front()
    }

    /// Drain all pending messages into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Inbound)) {
        while let Some(msg) = self.pop() {
            handler(msg);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Messages lost to overflow since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
