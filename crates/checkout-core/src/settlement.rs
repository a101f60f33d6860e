//! # Single-Settle Slot
//!
//! Converges any number of callback channels onto one awaitable value.
//! The first call to [`SettleHandle::settle`] wins; every later call is a
//! no-op that reports `false`.
//!
//! ```text
//!   success handler ──┐
//!                     ├──► SettleHandle ──(first wins)──► oneshot ──► awaiting bridge
//!   failure event  ───┘
//! ```
//!
//! The `settled` flag is checked before the sender is touched, so the
//! guarantee does not depend on oneshot tolerating a second send.

use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct Slot<T> {
    settled: Cell<bool>,
    sender: RefCell<Option<oneshot::Sender<T>>>,
}

/// Write side of a settlement; clone one per callback channel
pub struct SettleHandle<T> {
    slot: Rc<Slot<T>>,
}

impl<T> Clone for SettleHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> SettleHandle<T> {
    /// Settle with `value` unless already settled. Returns whether this
    /// call was the one that settled.
    pub fn settle(&self, value: T) -> bool {
        if self.slot.settled.replace(true) {
            return false;
        }
        match self.slot.sender.borrow_mut().take() {
            // A dropped receiver still counts as settled.
            Some(sender) => {
                let _ = sender.send(value);
                true
            }
            None => false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.slot.settled.get()
    }

    /// Non-owning handle; lets the awaiting side close the slot without
    /// keeping the sender alive.
    pub fn downgrade(&self) -> WeakSettleHandle<T> {
        WeakSettleHandle {
            slot: Rc::downgrade(&self.slot),
        }
    }
}

/// Non-owning side used to close a slot on timeout or error
pub struct WeakSettleHandle<T> {
    slot: Weak<Slot<T>>,
}

impl<T> WeakSettleHandle<T> {
    /// Mark the slot settled so later callbacks are ignored
    pub fn close(&self) {
        if let Some(slot) = self.slot.upgrade() {
            slot.settled.set(true);
            slot.sender.borrow_mut().take();
        }
    }
}

/// Create a fresh slot. The receiver resolves with the first settled
/// value, or `Canceled` if every handle is dropped unsettled.
pub fn settlement<T>() -> (SettleHandle<T>, oneshot::Receiver<T>) {
    let (sender, receiver) = oneshot::channel();
    let handle = SettleHandle {
        slot: Rc::new(Slot {
            settled: Cell::new(false),
            sender: RefCell::new(Some(sender)),
        }),
    };
    (handle, receiver)
}
