//! The dealer: owns the deck, runs rounds, judges selections.
//!
//! The dealer thread loops over rounds until it is stopped or the deck
//! no longer contains a set:
//!
//! 1. deal cards into every empty slot (input gate closed)
//! 2. reset the round countdown
//! 3. poll players in id order, judging every full selection and
//!    refilling the table after each one, until the countdown expires
//! 4. clear all tokens and sweep the table back into the deck
//!
//! Shutdown stops the players in reverse id order, joins every player
//! thread, and only then reads the scores.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cards::{CardId, Deck};
use crate::core::{GameConfig, GameError, GameRng, Gate, PlayerId, PlayerMap, Signal};
use crate::players::{Player, PlayerSettings};
use crate::rules::SetValidator;
use crate::table::Table;
use crate::ui::UserInterface;

use super::outcome::GameOutcome;

/// Cloneable handle for stopping a running game from any thread.
#[derive(Clone, Debug)]
pub struct StopHandle {
    signal: Arc<Signal>,
}

impl StopHandle {
    /// Request termination; the dealer notices within one poll interval.
    pub fn terminate(&self) {
        self.signal.fire();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.signal.is_fired()
    }
}

/// Coordinator of a game.
pub struct Dealer {
    config: GameConfig,
    validator: SetValidator,
    table: Arc<Table>,
    gate: Arc<Gate>,
    ui: Arc<dyn UserInterface>,
    players: Vec<Arc<Player>>,
    deck: Deck,
    removed: Vec<CardId>,
    rng: GameRng,
    stop: Arc<Signal>,
    deadline: Instant,
    rounds: usize,
}

impl std::fmt::Debug for Dealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dealer")
            .field("players", &self.players.len())
            .field("deck", &self.deck.len())
            .field("removed", &self.removed.len())
            .field("rounds", &self.rounds)
            .finish()
    }
}

impl Dealer {
    /// Create a dealer with the full deck described by `config`.
    pub fn new(config: GameConfig, ui: Arc<dyn UserInterface>) -> Result<Self, GameError> {
        let deck = Deck::full(config.deck_size);
        Self::with_deck(config, deck, ui)
    }

    /// Create a dealer with a specific deck.
    pub fn with_deck(
        config: GameConfig,
        deck: Deck,
        ui: Arc<dyn UserInterface>,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let player_count = config.player_count();
        let table = Arc::new(Table::new(
            config.table_size,
            player_count,
            config.set_size,
            Arc::clone(&ui),
        ));
        let gate = Arc::new(Gate::new());
        let settings = PlayerSettings::from_config(&config);

        let players = PlayerId::all(player_count)
            .map(|id| {
                Arc::new(Player::new(
                    id,
                    id.index() < config.human_players,
                    settings,
                    Arc::clone(&table),
                    Arc::clone(&gate),
                    Arc::clone(&ui),
                ))
            })
            .collect();

        Ok(Self {
            validator: SetValidator::from_config(&config),
            rng: GameRng::from_seed_or_entropy(config.seed),
            config,
            table,
            gate,
            ui,
            players,
            deck,
            removed: Vec::new(),
            stop: Arc::new(Signal::new()),
            deadline: Instant::now(),
            rounds: 0,
        })
    }

    #[must_use]
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Arc<Player>> {
        self.players.get(id.index())
    }

    #[must_use]
    pub fn table(&self) -> Arc<Table> {
        Arc::clone(&self.table)
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn removed(&self) -> &[CardId] {
        &self.removed
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            signal: Arc::clone(&self.stop),
        }
    }

    /// Request termination.
    pub fn terminate(&self) {
        self.stop.fire();
    }

    /// Run the game on the calling thread until it ends.
    pub fn run(mut self) -> Result<GameOutcome, GameError> {
        info!(
            players = self.players.len(),
            deck = self.deck.len(),
            seed = self.rng.seed(),
            "dealer starting"
        );

        let handles = self.start_players()?;
        let total = self.card_total();

        while !self.should_finish() {
            debug_assert_eq!(self.card_total(), total, "cards lost between rounds");
            self.place_cards_on_table();
            self.reset_timer();
            self.timer_loop();
            self.remove_all_cards_from_table();
            self.rounds += 1;
            debug!(
                round = self.rounds,
                deck = self.deck.len(),
                removed = self.removed.len(),
                "round over"
            );
        }

        self.terminate();
        let joined = self.shutdown_players(handles);

        let scores = PlayerMap::new(self.players.len(), |id| self.players[id.index()].score());
        let outcome = GameOutcome::new(
            scores,
            std::mem::take(&mut self.removed),
            self.deck.cards().to_vec(),
            self.rounds,
        );
        self.ui.announce_winners(&outcome.winners);
        info!(winners = ?outcome.winners, rounds = outcome.rounds, "dealer terminated");

        joined.map(|()| outcome)
    }

    fn start_players(&mut self) -> Result<Vec<JoinHandle<()>>, GameError> {
        let mut handles = Vec::with_capacity(self.players.len());
        for player in &self.players {
            let rng = (!player.is_human()).then(|| self.rng.fork());
            match player.spawn(rng) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!(player = %player.id(), error = %e, "failed to start player");
                    self.terminate();
                    // The spawn error is what gets reported.
                    let _ = self.shutdown_players(handles);
                    return Err(GameError::Spawn(e));
                }
            }
        }
        Ok(handles)
    }

    /// Stop players in reverse id order, then join them all.
    fn shutdown_players(&self, handles: Vec<JoinHandle<()>>) -> Result<(), GameError> {
        for player in self.players.iter().rev() {
            player.terminate();
        }

        let mut result = Ok(());
        for (player, handle) in self.players.iter().zip(handles).rev() {
            if handle.join().is_err() {
                warn!(player = %player.id(), "player thread panicked");
                result = Err(GameError::PlayerPanicked(player.id()));
            }
        }
        result
    }

    fn should_finish(&self) -> bool {
        self.stop.is_fired() || !self.deck.exists_set(&self.validator)
    }

    fn card_total(&self) -> usize {
        self.deck.len() + self.table.count_cards() + self.removed.len()
    }

    fn poll_interval(&self) -> Duration {
        self.config.poll_interval()
    }

    fn timer_loop(&mut self) {
        while !self.stop.is_fired() && Instant::now() < self.deadline {
            if self.stop.wait_timeout(self.poll_interval()) {
                break;
            }
            self.update_countdown();
            // Selections still waiting at the deadline are released by the sweep.
            if Instant::now() >= self.deadline {
                break;
            }
            self.resolve_ready_players();
        }
    }

    fn reset_timer(&mut self) {
        self.deadline = Instant::now() + self.config.turn_timeout();
        self.ui.set_countdown(self.config.turn_timeout_ms, false);
    }

    fn update_countdown(&self) {
        let remaining = self
            .deadline
            .saturating_duration_since(Instant::now())
            .as_millis() as u64;
        let warn = remaining <= self.config.turn_timeout_warning_ms;
        self.ui.set_countdown(remaining, warn);
    }

    /// Fill every empty slot from the deck while it has cards.
    pub(crate) fn place_cards_on_table(&mut self) {
        let empty = self.table.empty_slots();
        if empty.is_empty() || self.deck.is_empty() {
            return;
        }

        self.gate.close();
        for slot in empty {
            let Some(card) = self.deck.take_random(&mut self.rng) else {
                break;
            };
            self.table.place_card(card, slot);
        }
        self.gate.open();
        debug!(on_table = self.table.count_cards(), deck = self.deck.len(), "cards dealt");
    }

    /// Judge every ready player, lowest id first.
    pub(crate) fn resolve_ready_players(&mut self) {
        for index in 0..self.players.len() {
            let player = Arc::clone(&self.players[index]);
            if !player.is_ready() {
                continue;
            }
            self.resolve(&player);
            self.place_cards_on_table();
        }
    }

    fn resolve(&mut self, player: &Player) {
        let id = player.id();
        let slots = self.table.tokens(id);

        let claim = if slots.len() == self.validator.set_size() {
            self.table.resolve_claim(id, &slots)
        } else {
            None
        };
        let Some(cards) = claim else {
            debug!(player = %id, ?slots, "selection went stale");
            player.release();
            return;
        };

        if self.validator.test_set(&cards) {
            info!(player = %id, ?cards, "set found");
            for &slot in &slots {
                if let Some(card) = self.table.remove_card(slot) {
                    self.removed.push(card);
                }
            }
            player.point();
            self.reset_timer();
        } else {
            info!(player = %id, ?cards, "not a set");
            player.penalty();
        }
    }

    /// Clear every token and sweep the table back into the deck.
    pub(crate) fn remove_all_cards_from_table(&mut self) {
        self.gate.close();
        self.ui.remove_tokens();
        for player in &self.players {
            self.table.clear_tokens_of(player.id());
            player.clear_actions();
            player.release();
        }
        let cards = self.table.take_all_cards();
        self.deck.return_all(cards);
        self.gate.open();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::FeatureSchema;
    use crate::ui::NullUi;

    fn config() -> GameConfig {
        GameConfig::new()
            .with_players(2, 0)
            .with_turn_timeout(200, 50)
            .with_poll_interval(5)
            .with_seed(7)
    }

    fn dealer() -> Dealer {
        Dealer::new(config(), Arc::new(NullUi)).unwrap()
    }

    #[test]
    fn test_deal_fills_table() {
        let mut d = dealer();
        d.place_cards_on_table();
        assert_eq!(d.table.count_cards(), 12);
        assert_eq!(d.deck.len(), 69);
        assert_eq!(d.card_total(), 81);
        assert!(!d.gate.is_closed());
    }

    #[test]
    fn test_deal_stops_when_deck_runs_out() {
        let cards = (0..5).map(CardId::new).collect();
        let mut d = Dealer::with_deck(config(), Deck::from_cards(cards), Arc::new(NullUi)).unwrap();
        d.place_cards_on_table();
        assert_eq!(d.table.count_cards(), 5);
        assert!(d.deck.is_empty());
        assert_eq!(d.table.empty_slots().len(), 7);
    }

    #[test]
    fn test_same_seed_same_deal() {
        let mut a = dealer();
        let mut b = dealer();
        a.place_cards_on_table();
        b.place_cards_on_table();
        assert_eq!(a.table.cards(), b.table.cards());
    }

    #[test]
    fn test_round_end_conserves_and_is_idempotent() {
        let mut d = dealer();
        d.place_cards_on_table();
        let p0 = PlayerId::new(0);
        d.table.toggle_token(p0, 0);
        d.table.toggle_token(p0, 1);

        d.remove_all_cards_from_table();
        assert_eq!(d.table.count_cards(), 0);
        assert_eq!(d.deck.len(), 81);
        assert!(d.table.tokens(p0).is_empty());

        let deck_before = d.deck.clone();
        d.remove_all_cards_from_table();
        assert_eq!(d.deck, deck_before);
        assert_eq!(d.table.count_cards(), 0);
        assert!(d.table.invariant_violations().is_empty());
    }

    #[test]
    fn test_stale_selection_is_released_without_penalty() {
        let mut d = dealer();
        d.place_cards_on_table();
        let player = Arc::clone(&d.players[0]);
        d.table.toggle_token(player.id(), 0);
        d.table.toggle_token(player.id(), 1);

        // Two tokens cannot be judged.
        d.resolve(&player);
        assert_eq!(player.score(), 0);
        assert!(!player.is_frozen());
    }

    #[test]
    fn test_valid_set_removed_permanently() {
        let schema = FeatureSchema::new(4, 3);
        let set = vec![
            schema.card(&[0, 0, 0, 0]),
            schema.card(&[1, 1, 1, 1]),
            schema.card(&[2, 2, 2, 2]),
        ];
        let config = config().with_table(3, 81);
        let mut d = Dealer::with_deck(config, Deck::from_cards(set.clone()), Arc::new(NullUi)).unwrap();
        d.place_cards_on_table();

        let player = Arc::clone(&d.players[1]);
        for slot in 0..3 {
            d.table.toggle_token(player.id(), slot);
        }
        d.resolve(&player);

        assert_eq!(player.score(), 1);
        assert_eq!(d.table.count_cards(), 0);
        let mut removed = d.removed.clone();
        removed.sort();
        assert_eq!(removed, set);
        assert!(d.deck.is_empty());
        assert!(d.should_finish());
    }

    #[test]
    fn test_stop_handle_finishes_game() {
        let d = dealer();
        let stop = d.stop_handle();
        assert!(!d.should_finish());
        stop.terminate();
        assert!(stop.is_stopped());
        assert!(d.should_finish());
    }
}
