//! Presentation interface.
//!
//! The engine reports everything a display needs through
//! `UserInterface`: countdown ticks, scores, freezes, tokens, cards, and
//! the final winners. Calls are fire-and-forget and arrive from the
//! dealer and player threads concurrently, so implementations must be
//! `Send + Sync` and must not block.
//!
//! Three implementations ship with the engine:
//!
//! - `NullUi`: discards everything (headless games, benchmarks)
//! - `LoggingUi<U>`: traces each call, then forwards to an inner UI
//! - `RecordingUi`: keeps an ordered log of `UiEvent`s for inspection

use std::sync::Mutex;

use tracing::debug;

use crate::cards::CardId;
use crate::core::sync::lock;
use crate::core::PlayerId;

/// Sink for presentation updates.
pub trait UserInterface: Send + Sync {
    /// Round countdown in milliseconds; `warn` once under the warning threshold.
    fn set_countdown(&self, millis: u64, warn: bool);

    fn set_score(&self, player: PlayerId, score: u32);

    /// Remaining freeze in milliseconds; `0` clears the freeze.
    fn set_freeze(&self, player: PlayerId, millis: u64);

    fn place_token(&self, player: PlayerId, slot: usize);

    fn remove_token(&self, player: PlayerId, slot: usize);

    /// Clear every token on the table (round boundary).
    fn remove_tokens(&self);

    fn place_card(&self, card: CardId, slot: usize);

    fn remove_card(&self, slot: usize);

    fn announce_winners(&self, winners: &[PlayerId]);
}

/// Discards all updates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullUi;

impl UserInterface for NullUi {
    fn set_countdown(&self, _millis: u64, _warn: bool) {}
    fn set_score(&self, _player: PlayerId, _score: u32) {}
    fn set_freeze(&self, _player: PlayerId, _millis: u64) {}
    fn place_token(&self, _player: PlayerId, _slot: usize) {}
    fn remove_token(&self, _player: PlayerId, _slot: usize) {}
    fn remove_tokens(&self) {}
    fn place_card(&self, _card: CardId, _slot: usize) {}
    fn remove_card(&self, _slot: usize) {}
    fn announce_winners(&self, _winners: &[PlayerId]) {}
}

/// Traces every update before handing it to the wrapped UI.
#[derive(Debug, Default)]
pub struct LoggingUi<U> {
    inner: U,
}

impl<U: UserInterface> LoggingUi<U> {
    pub fn new(inner: U) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &U {
        &self.inner
    }
}

impl<U: UserInterface> UserInterface for LoggingUi<U> {
    fn set_countdown(&self, millis: u64, warn: bool) {
        // Ticks every poll interval; too noisy for debug.
        tracing::trace!(millis, warn, "countdown");
        self.inner.set_countdown(millis, warn);
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        debug!(player = %player, score, "score");
        self.inner.set_score(player, score);
    }

    fn set_freeze(&self, player: PlayerId, millis: u64) {
        debug!(player = %player, millis, "freeze");
        self.inner.set_freeze(player, millis);
    }

    fn place_token(&self, player: PlayerId, slot: usize) {
        debug!(player = %player, slot, "token placed");
        self.inner.place_token(player, slot);
    }

    fn remove_token(&self, player: PlayerId, slot: usize) {
        debug!(player = %player, slot, "token removed");
        self.inner.remove_token(player, slot);
    }

    fn remove_tokens(&self) {
        debug!("all tokens removed");
        self.inner.remove_tokens();
    }

    fn place_card(&self, card: CardId, slot: usize) {
        debug!(card = %card, slot, "card placed");
        self.inner.place_card(card, slot);
    }

    fn remove_card(&self, slot: usize) {
        debug!(slot, "card removed");
        self.inner.remove_card(slot);
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        debug!(?winners, "winners");
        self.inner.announce_winners(winners);
    }
}

/// One recorded presentation update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Countdown { millis: u64, warn: bool },
    Score { player: PlayerId, score: u32 },
    Freeze { player: PlayerId, millis: u64 },
    TokenPlaced { player: PlayerId, slot: usize },
    TokenRemoved { player: PlayerId, slot: usize },
    TokensCleared,
    CardPlaced { card: CardId, slot: usize },
    CardRemoved { slot: usize },
    Winners(Vec<PlayerId>),
}

/// Keeps every update in arrival order.
#[derive(Debug, Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<UiEvent> {
        lock(&self.events).clone()
    }

    /// Count the recorded events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&UiEvent) -> bool) -> usize {
        lock(&self.events).iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: UiEvent) {
        lock(&self.events).push(event);
    }
}

impl UserInterface for RecordingUi {
    fn set_countdown(&self, millis: u64, warn: bool) {
        self.push(UiEvent::Countdown { millis, warn });
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        self.push(UiEvent::Score { player, score });
    }

    fn set_freeze(&self, player: PlayerId, millis: u64) {
        self.push(UiEvent::Freeze { player, millis });
    }

    fn place_token(&self, player: PlayerId, slot: usize) {
        self.push(UiEvent::TokenPlaced { player, slot });
    }

    fn remove_token(&self, player: PlayerId, slot: usize) {
        self.push(UiEvent::TokenRemoved { player, slot });
    }

    fn remove_tokens(&self) {
        self.push(UiEvent::TokensCleared);
    }

    fn place_card(&self, card: CardId, slot: usize) {
        self.push(UiEvent::CardPlaced { card, slot });
    }

    fn remove_card(&self, slot: usize) {
        self.push(UiEvent::CardRemoved { slot });
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        self.push(UiEvent::Winners(winners.to_vec()));
    }
}

impl<U: UserInterface + ?Sized> UserInterface for std::sync::Arc<U> {
    fn set_countdown(&self, millis: u64, warn: bool) {
        (**self).set_countdown(millis, warn);
    }
    fn set_score(&self, player: PlayerId, score: u32) {
        (**self).set_score(player, score);
    }
    fn set_freeze(&self, player: PlayerId, millis: u64) {
        (**self).set_freeze(player, millis);
    }
    fn place_token(&self, player: PlayerId, slot: usize) {
        (**self).place_token(player, slot);
    }
    fn remove_token(&self, player: PlayerId, slot: usize) {
        (**self).remove_token(player, slot);
    }
    fn remove_tokens(&self) {
        (**self).remove_tokens();
    }
    fn place_card(&self, card: CardId, slot: usize) {
        (**self).place_card(card, slot);
    }
    fn remove_card(&self, slot: usize) {
        (**self).remove_card(slot);
    }
    fn announce_winners(&self, winners: &[PlayerId]) {
        (**self).announce_winners(winners);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_recording_keeps_order() {
        let ui = RecordingUi::new();
        ui.place_card(CardId::new(4), 0);
        ui.place_token(PlayerId::new(1), 0);
        ui.remove_tokens();

        assert_eq!(
            ui.events(),
            vec![
                UiEvent::CardPlaced { card: CardId::new(4), slot: 0 },
                UiEvent::TokenPlaced { player: PlayerId::new(1), slot: 0 },
                UiEvent::TokensCleared,
            ]
        );
    }

    #[test]
    fn test_logging_forwards() {
        let recorder = Arc::new(RecordingUi::new());
        let ui = LoggingUi::new(Arc::clone(&recorder));

        ui.set_score(PlayerId::new(0), 2);
        ui.announce_winners(&[PlayerId::new(0)]);

        assert_eq!(recorder.count(|e| matches!(e, UiEvent::Score { score: 2, .. })), 1);
        assert_eq!(ui.inner().events().len(), 2);
    }

    #[test]
    fn test_arc_dyn_is_a_ui() {
        let ui: Arc<dyn UserInterface> = Arc::new(NullUi);
        ui.set_countdown(10, false);
        ui.remove_card(3);
    }
}
