//! Ticketed state slots.
//!
//! Each piece of session state lives in a [`Slot`]. A remote call takes a
//! [`Ticket`] before it suspends and hands it back when its response
//! arrives; the response is only applied if no newer ticket has been
//! applied in the meantime.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Sequence number handed out by [`Slot::issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Result of handing a response back to its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landed<T> {
    /// The response was applied; carries the new value.
    Applied(T),
    /// A newer response had already been applied, this one was dropped.
    Superseded,
}

impl<T> Landed<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Superseded => None,
        }
    }
}

#[derive(Debug)]
struct SlotInner<T> {
    value: T,
    issued: u64,
    applied: u64,
}

/// A value guarded by a mutex plus the ticket bookkeeping for it.
///
/// The lock is only ever held for the synchronous apply step, never
/// across an `.await`.
#[derive(Debug)]
pub struct Slot<T> {
    inner: Mutex<SlotInner<T>>,
}

impl<T: Clone + Default> Slot<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                value,
                issued: 0,
                applied: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands out the next ticket.
    pub fn issue(&self) -> Ticket {
        let mut inner = self.lock();
        inner.issued += 1;
        Ticket(inner.issued)
    }

    /// Applies `transition` if `ticket` is newer than the last applied one.
    pub fn apply(&self, ticket: Ticket, transition: impl FnOnce(T) -> T) -> Landed<T> {
        let mut inner = self.lock();
        if ticket.0 <= inner.applied {
            return Landed::Superseded;
        }
        let value = transition(std::mem::take(&mut inner.value));
        inner.value = value.clone();
        inner.applied = ticket.0;
        Landed::Applied(value)
    }

    /// Applies a purely local change. Does not take part in ticket ordering.
    pub fn update<R>(&self, change: impl FnOnce(&mut T) -> R) -> R {
        change(&mut self.lock().value)
    }

    /// Returns a copy of the current value.
    pub fn snapshot(&self) -> T {
        self.lock().value.clone()
    }
}
