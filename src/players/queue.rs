//! Bounded per-player action queue.
//!
//! Holds at most `set_size` pending presses. Pushing onto a full queue is
//! refused rather than blocking the caller: a player can never usefully
//! queue more presses than one set's worth. Pops and space-waits are
//! bounded so the player and its input thread notice termination
//! promptly. `clear` lets the dealer drop pending presses at a round
//! boundary.
//!
//! A paused queue refuses every push. The pause flag lives under the
//! same lock as the items, so a freeze and a concurrent press cannot
//! interleave.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::cards::CardId;
use crate::core::sync::lock;

/// A key press: the slot and the card that was in it when pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Press {
    pub slot: usize,
    pub card: Option<CardId>,
}

impl Press {
    #[must_use]
    pub const fn new(slot: usize, card: Option<CardId>) -> Self {
        Self { slot, card }
    }
}

#[derive(Debug)]
struct Pending {
    items: VecDeque<Press>,
    paused: bool,
}

#[derive(Debug)]
pub struct ActionQueue {
    pending: Mutex<Pending>,
    capacity: usize,
    not_empty: Condvar,
    not_full: Condvar,
}

impl ActionQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        Self {
            pending: Mutex::new(Pending {
                items: VecDeque::with_capacity(capacity),
                paused: false,
            }),
            capacity,
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.pending).items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.pending).items.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        lock(&self.pending).items.len() >= self.capacity
    }

    /// Enqueue a press. Returns `false` and drops it if the queue is full
    /// or paused.
    pub fn try_push(&self, press: Press) -> bool {
        let mut pending = lock(&self.pending);
        if pending.paused || pending.items.len() >= self.capacity {
            return false;
        }
        pending.items.push_back(press);
        drop(pending);
        self.not_empty.notify_one();
        true
    }

    /// Wait up to `timeout` for the next press.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<Press> {
        let pending = lock(&self.pending);
        let (mut pending, _) = self
            .not_empty
            .wait_timeout_while(pending, timeout, |p| p.items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        let press = pending.items.pop_front();
        drop(pending);
        if press.is_some() {
            self.not_full.notify_all();
        }
        press
    }

    /// Wait up to `timeout` for free space. Returns `true` if there is room.
    pub fn wait_not_full(&self, timeout: Duration) -> bool {
        let pending = lock(&self.pending);
        let (pending, _) = self
            .not_full
            .wait_timeout_while(pending, timeout, |p| p.items.len() >= self.capacity)
            .unwrap_or_else(PoisonError::into_inner);
        pending.items.len() < self.capacity
    }

    /// Refuse pushes until `resume`.
    pub fn pause(&self) {
        lock(&self.pending).paused = true;
    }

    pub fn resume(&self) {
        lock(&self.pending).paused = false;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        lock(&self.pending).paused
    }

    /// Drop every pending press.
    pub fn clear(&self) {
        lock(&self.pending).items.clear();
        self.not_full.notify_all();
    }

    /// Wake all waiters so they re-check their exit conditions.
    pub fn wake_all(&self) {
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}
