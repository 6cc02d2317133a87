//! The player agent.
//!
//! A player runs on its own thread. It drains its bounded action queue,
//! toggling tokens on the shared table, and when it holds a full set of
//! tokens it raises its ready flag and blocks until the dealer hands back
//! a `Verdict`. A point or penalty verdict is followed by a freeze during
//! which the queue is not processed and new presses are ignored.
//!
//! ## States
//!
//! ```text
//! Created -> Running -> AwaitingVerdict -> (Frozen) -> Running
//!                  \___________\_______________\______-> Terminated
//! ```
//!
//! Every blocking point waits at most one poll interval at a time, so
//! `terminate` is observed promptly from any state. Terminating while
//! frozen abandons the countdown.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::core::sync::lock;
use crate::core::{GameConfig, GameRng, Gate, PlayerId, Signal};
use crate::table::{Slots, Table, TokenToggle};
use crate::ui::UserInterface;

use super::computer;
use super::queue::{ActionQueue, Press};

/// The dealer's answer to a full selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Valid set: score awarded, point freeze follows.
    Point,
    /// Invalid set: penalty freeze follows.
    Penalty,
    /// The selection changed before it could be judged; nothing happens.
    Stale,
}

/// Observable lifecycle state of a player thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Created,
    Running,
    AwaitingVerdict,
    Frozen,
    Terminated,
}

/// Timing and sizing a player needs from the game configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSettings {
    pub set_size: usize,
    pub point_freeze_ms: u64,
    pub penalty_freeze_ms: u64,
    pub freeze_tick: Duration,
    pub poll_interval: Duration,
    pub computer_delay_ms: u64,
}

impl PlayerSettings {
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            set_size: config.set_size,
            point_freeze_ms: config.point_freeze_ms,
            penalty_freeze_ms: config.penalty_freeze_ms,
            freeze_tick: config.freeze_tick(),
            poll_interval: config.poll_interval(),
            computer_delay_ms: config.computer_delay_ms,
        }
    }
}

/// One seat at the table.
pub struct Player {
    id: PlayerId,
    human: bool,
    settings: PlayerSettings,
    table: Arc<Table>,
    gate: Arc<Gate>,
    ui: Arc<dyn UserInterface>,
    queue: ActionQueue,
    score: AtomicU32,
    ready: AtomicBool,
    verdict: Mutex<Option<Verdict>>,
    verdict_ready: Condvar,
    state: Mutex<PlayerState>,
    stop: Signal,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("human", &self.human)
            .field("score", &self.score())
            .field("state", &self.state())
            .finish()
    }
}

impl Player {
    pub fn new(
        id: PlayerId,
        human: bool,
        settings: PlayerSettings,
        table: Arc<Table>,
        gate: Arc<Gate>,
        ui: Arc<dyn UserInterface>,
    ) -> Self {
        Self {
            id,
            human,
            queue: ActionQueue::new(settings.set_size),
            settings,
            table,
            gate,
            ui,
            score: AtomicU32::new(0),
            ready: AtomicBool::new(false),
            verdict: Mutex::new(None),
            verdict_ready: Condvar::new(),
            state: Mutex::new(PlayerState::Created),
            stop: Signal::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        self.human
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.queue.is_paused()
    }

    /// Whether the player holds a full selection awaiting the dealer.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.stop.is_fired()
    }

    #[must_use]
    pub fn state(&self) -> PlayerState {
        *lock(&self.state)
    }

    /// Slots this player currently claims.
    #[must_use]
    pub fn tokens(&self) -> Slots {
        self.table.tokens(self.id)
    }

    #[must_use]
    pub fn settings(&self) -> PlayerSettings {
        self.settings
    }

    pub(crate) fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    pub(crate) fn table_size(&self) -> usize {
        self.table.size()
    }

    /// Sleep up to `timeout`; returns `true` if the player was terminated.
    pub(crate) fn wait_terminated(&self, timeout: Duration) -> bool {
        self.stop.wait_timeout(timeout)
    }

    fn set_state(&self, state: PlayerState) {
        *lock(&self.state) = state;
    }

    /// Input hook: queue a press on `slot`.
    ///
    /// Ignored while frozen or terminated, for out-of-range slots, and
    /// when the queue is already full. Blocks while the dealer is
    /// rewriting the table. Returns whether the press was queued.
    pub fn submit(&self, slot: usize) -> bool {
        if slot >= self.table.size() || self.is_frozen() || self.is_terminated() {
            return false;
        }
        let Some(_pass) = self.gate.enter(&self.stop, self.settings.poll_interval) else {
            return false;
        };
        let queued = self.queue.try_push(Press::new(slot, self.table.card_at(slot)));
        trace!(player = %self.id, slot, queued, "key press");
        queued
    }

    /// Award a point. Called by the dealer for a valid set.
    pub fn point(&self) {
        let score = self.score.fetch_add(1, Ordering::SeqCst) + 1;
        self.queue.pause();
        self.ui.set_score(self.id, score);
        self.deliver(Verdict::Point);
    }

    /// Penalize an invalid set. Called by the dealer.
    pub fn penalty(&self) {
        self.queue.pause();
        self.deliver(Verdict::Penalty);
    }

    /// Release a waiting player without judging its selection.
    pub fn release(&self) {
        if self.is_ready() {
            self.deliver(Verdict::Stale);
        }
    }

    /// Drop pending presses (round boundary).
    pub fn clear_actions(&self) {
        self.queue.clear();
    }

    fn deliver(&self, verdict: Verdict) {
        let mut slot = lock(&self.verdict);
        self.ready.store(false, Ordering::SeqCst);
        *slot = Some(verdict);
        drop(slot);
        self.verdict_ready.notify_all();
    }

    /// Ask the player thread (and its input thread) to stop.
    pub fn terminate(&self) {
        self.stop.fire();
        self.queue.wake_all();
        self.verdict_ready.notify_all();
    }

    /// Start the player thread. Computer players get `rng` for their
    /// input thread; human players ignore it.
    pub fn spawn(self: &Arc<Self>, rng: Option<GameRng>) -> io::Result<JoinHandle<()>> {
        let player = Arc::clone(self);
        thread::Builder::new()
            .name(format!("player-{}", self.id.0))
            .spawn(move || player.run(rng))
    }

    fn run(self: Arc<Self>, rng: Option<GameRng>) {
        info!(player = %self.id, human = self.human, "thread starting");

        let input = match (self.human, rng) {
            (false, Some(rng)) => match computer::spawn(Arc::clone(&self), rng) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(player = %self.id, error = %e, "failed to start computer input");
                    None
                }
            },
            _ => None,
        };

        self.set_state(PlayerState::Running);
        self.process_actions();

        if let Some(handle) = input {
            if handle.join().is_err() {
                warn!(player = %self.id, "computer input thread panicked");
            }
        }

        self.set_state(PlayerState::Terminated);
        info!(player = %self.id, score = self.score(), "thread terminated");
    }

    fn process_actions(&self) {
        let poll = self.settings.poll_interval;
        while !self.is_terminated() {
            let Some(press) = self.queue.pop_timeout(poll) else {
                continue;
            };
            // The hand goes up before the pass is dropped, so a sweep that
            // clears this selection also sees it and releases the player.
            let toggled = {
                let Some(_pass) = self.gate.enter(&self.stop, poll) else {
                    break;
                };
                let toggled = match press.card {
                    Some(card) => self.table.toggle_token_on(self.id, press.slot, card),
                    None => TokenToggle::Stale,
                };
                if toggled == TokenToggle::Placed(self.settings.set_size) {
                    self.raise_hand();
                }
                toggled
            };
            let slot = press.slot;

            match toggled {
                TokenToggle::Placed(count) if count == self.settings.set_size => {
                    self.await_verdict();
                }
                TokenToggle::Stale => {
                    trace!(player = %self.id, slot, "stale press discarded");
                }
                outcome => {
                    trace!(player = %self.id, slot, ?outcome, "token toggled");
                }
            }
        }
    }

    fn raise_hand(&self) {
        self.set_state(PlayerState::AwaitingVerdict);
        let _verdict = lock(&self.verdict);
        self.ready.store(true, Ordering::SeqCst);
    }

    fn await_verdict(&self) {
        debug!(player = %self.id, tokens = ?self.tokens(), "selection ready");

        let verdict = {
            let mut slot = lock(&self.verdict);
            loop {
                if let Some(verdict) = slot.take() {
                    break Some(verdict);
                }
                if self.is_terminated() {
                    break None;
                }
                slot = self
                    .verdict_ready
                    .wait_timeout(slot, self.settings.poll_interval)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        };

        match verdict {
            Some(Verdict::Point) => self.freeze(self.settings.point_freeze_ms),
            Some(Verdict::Penalty) => self.freeze(self.settings.penalty_freeze_ms),
            Some(Verdict::Stale) | None => {}
        }

        if !self.is_terminated() {
            self.set_state(PlayerState::Running);
        }
    }

    fn freeze(&self, millis: u64) {
        self.set_state(PlayerState::Frozen);
        let tick = self.settings.freeze_tick.as_millis() as u64;
        let mut remaining = millis;

        while remaining > 0 {
            self.ui.set_freeze(self.id, remaining);
            let step = remaining.min(tick.max(1));
            if self.stop.wait_timeout(Duration::from_millis(step)) {
                debug!(player = %self.id, remaining, "freeze interrupted");
                return;
            }
            remaining -= step;
        }

        self.ui.set_freeze(self.id, 0);
        self.queue.resume();
    }
}
