// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Handshake between interrupt handlers and the main loop.
//!
//! Both primitives hold at most one pending item. A second event that arrives before the loop has
//! consumed the first replaces it (mailbox) or merges with it (flag); nothing is queued.
//!
//! Everything here is `const` constructible so a single [`Signals`] block can live in a `static`
//! that the interrupt handlers and the controller share.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use bxcan::Frame;
use critical_section::Mutex;

/// Single-bit event flag raised from interrupt context.
pub struct Flag {
    raised: AtomicBool,
}

impl Flag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag. Raising an already raised flag is a no-op.
    #[inline]
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Test and clear in one step. Returns `true` if the flag was raised.
    #[inline]
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-slot mailbox with overwrite-on-full semantics.
pub struct Mailbox<T> {
    slot: Mutex<RefCell<Option<T>>>,
}

impl<T> Mailbox<T> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store `item`, dropping any unread item. Returns `true` if an unread item was replaced.
    pub fn post(&self, item: T) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).replace(item).is_some())
    }

    /// Remove the pending item, if any.
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Events feeding the controller loop.
pub struct Signals {
    /// Last floor-request frame received from the bus.
    pub requests: Mailbox<Frame>,

    /// Raised by the status timer every status period.
    pub broadcast: Flag,
}

impl Signals {
    pub const fn new() -> Self {
        Self {
            requests: Mailbox::new(),
            broadcast: Flag::new(),
        }
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}
