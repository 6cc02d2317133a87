//! The shared table: card slots and every player's tokens.
//!
//! Each slot has its own mutex; there is no table-wide lock. A slot's
//! guard covers both the card in it and the token marker on it, and the
//! claiming player's token set is only ever updated while that guard is
//! held. Lock order is always slot, then token set, and no operation
//! holds two slot guards at once.

use std::sync::{Arc, Mutex};

use smallvec::SmallVec;
use tracing::trace;

use crate::cards::CardId;
use crate::core::sync::lock;
use crate::core::PlayerId;
use crate::ui::UserInterface;

use super::tokens::{Slots, TokenSet};

/// Cards resolved from a claimed selection, in token order.
pub type Claim = SmallVec<[CardId; 4]>;

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    card: Option<CardId>,
    claimant: Option<PlayerId>,
}

/// Outcome of a token toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenToggle {
    /// Token placed; carries the player's new token count.
    Placed(usize),
    /// Token released; carries the player's new token count.
    Removed(usize),
    /// The slot is empty: the card was taken away after the key press.
    Stale,
    /// Another player already claims this slot.
    Taken(PlayerId),
    /// The player already holds a full set of tokens.
    Full,
}

/// Fixed grid of slots shared by the dealer and all players.
pub struct Table {
    slots: Vec<Mutex<Slot>>,
    tokens: Vec<Mutex<TokenSet>>,
    ui: Arc<dyn UserInterface>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("slots", &self.slots.len())
            .field("cards", &self.count_cards())
            .finish()
    }
}

impl Table {
    /// Create an empty table of `table_size` slots for `player_count`
    /// players holding up to `set_size` tokens each.
    pub fn new(
        table_size: usize,
        player_count: usize,
        set_size: usize,
        ui: Arc<dyn UserInterface>,
    ) -> Self {
        Self {
            slots: (0..table_size).map(|_| Mutex::new(Slot::default())).collect(),
            tokens: (0..player_count)
                .map(|_| Mutex::new(TokenSet::new(set_size)))
                .collect(),
            ui,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.tokens.len()
    }

    /// Put `card` into an empty slot.
    ///
    /// Panics if the slot is occupied.
    pub fn place_card(&self, card: CardId, slot: usize) {
        let mut guard = lock(&self.slots[slot]);
        assert!(
            guard.card.is_none(),
            "slot {slot} already holds {:?}",
            guard.card
        );
        guard.card = Some(card);
        self.ui.place_card(card, slot);
    }

    /// Take the card out of a slot, dropping any token on it in the same
    /// critical section. Returns `None` if the slot was already empty.
    pub fn remove_card(&self, slot: usize) -> Option<CardId> {
        let mut guard = lock(&self.slots[slot]);
        let card = guard.card.take()?;
        if let Some(player) = guard.claimant.take() {
            lock(&self.tokens[player.index()]).remove(slot);
            self.ui.remove_token(player, slot);
        }
        self.ui.remove_card(slot);
        Some(card)
    }

    /// Claim or release `slot` for `player`.
    pub fn toggle_token(&self, player: PlayerId, slot: usize) -> TokenToggle {
        self.toggle(player, slot, None)
    }

    /// Claim or release `slot` only if it still holds `card`.
    ///
    /// A press made before a reshuffle or refill comes back `Stale`
    /// instead of landing on the card dealt in its place.
    pub fn toggle_token_on(&self, player: PlayerId, slot: usize, card: CardId) -> TokenToggle {
        self.toggle(player, slot, Some(card))
    }

    fn toggle(&self, player: PlayerId, slot: usize, expected: Option<CardId>) -> TokenToggle {
        let mut guard = lock(&self.slots[slot]);
        let Some(card) = guard.card else {
            return TokenToggle::Stale;
        };
        if expected.is_some_and(|want| want != card) {
            return TokenToggle::Stale;
        }

        let mut tokens = lock(&self.tokens[player.index()]);
        match guard.claimant {
            Some(holder) if holder == player => {
                tokens.remove(slot);
                guard.claimant = None;
                self.ui.remove_token(player, slot);
                TokenToggle::Removed(tokens.len())
            }
            Some(holder) => TokenToggle::Taken(holder),
            None => {
                if !tokens.insert(slot) {
                    return TokenToggle::Full;
                }
                guard.claimant = Some(player);
                self.ui.place_token(player, slot);
                TokenToggle::Placed(tokens.len())
            }
        }
    }

    /// Snapshot of the slots `player` claims.
    #[must_use]
    pub fn tokens(&self, player: PlayerId) -> Slots {
        lock(&self.tokens[player.index()]).slots()
    }

    #[must_use]
    pub fn token_count(&self, player: PlayerId) -> usize {
        lock(&self.tokens[player.index()]).len()
    }

    /// Resolve a selection to cards, slot by slot under each slot's guard.
    ///
    /// Returns `None` if any slot is empty or no longer claimed by
    /// `player`, i.e. the selection went stale.
    #[must_use]
    pub fn resolve_claim(&self, player: PlayerId, slots: &[usize]) -> Option<Claim> {
        slots
            .iter()
            .map(|&slot| {
                let guard = lock(&self.slots[slot]);
                match (guard.card, guard.claimant) {
                    (Some(card), Some(holder)) if holder == player => Some(card),
                    _ => None,
                }
            })
            .collect()
    }

    /// Drop every token `player` holds.
    ///
    /// Does not notify per token; the dealer announces one bulk clear.
    pub fn clear_tokens_of(&self, player: PlayerId) {
        for slot in self.tokens(player) {
            let mut guard = lock(&self.slots[slot]);
            if guard.claimant == Some(player) {
                guard.claimant = None;
                lock(&self.tokens[player.index()]).remove(slot);
            }
        }
    }

    /// Drop every token on the table.
    pub fn clear_tokens(&self) {
        for index in 0..self.tokens.len() {
            self.clear_tokens_of(PlayerId::new(index as u8));
        }
    }

    /// Empty every slot and return the cards that were on the table.
    pub fn take_all_cards(&self) -> Vec<CardId> {
        (0..self.slots.len())
            .filter_map(|slot| self.remove_card(slot))
            .collect()
    }

    #[must_use]
    pub fn card_at(&self, slot: usize) -> Option<CardId> {
        lock(&self.slots[slot]).card
    }

    #[must_use]
    pub fn claimant(&self, slot: usize) -> Option<PlayerId> {
        lock(&self.slots[slot]).claimant
    }

    /// Snapshot of every slot.
    #[must_use]
    pub fn cards(&self) -> Vec<Option<CardId>> {
        self.slots.iter().map(|s| lock(s).card).collect()
    }

    #[must_use]
    pub fn empty_slots(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&slot| lock(&self.slots[slot]).card.is_none())
            .collect()
    }

    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.slots.iter().filter(|s| lock(s).card.is_some()).count()
    }

    /// Cross-check slot markers against token sets.
    ///
    /// Only meaningful while no thread is mutating the table. Returns a
    /// description of every inconsistency found.
    #[must_use]
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (index, slot) in self.slots.iter().enumerate() {
            let guard = lock(slot);
            if let Some(player) = guard.claimant {
                if guard.card.is_none() {
                    problems.push(format!("slot {index} is empty but claimed by {player}"));
                }
                if !lock(&self.tokens[player.index()]).contains(index) {
                    problems.push(format!("slot {index} marked for {player} missing from its tokens"));
                }
            }
        }

        for (index, tokens) in self.tokens.iter().enumerate() {
            let player = PlayerId::new(index as u8);
            let held = lock(tokens).slots();
            for slot in held {
                if self.claimant(slot) != Some(player) {
                    problems.push(format!("{player} holds slot {slot} without the slot marker"));
                }
            }
        }

        trace!(count = problems.len(), "table audit");
        problems
    }
}
