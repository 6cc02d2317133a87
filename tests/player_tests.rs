//! Player threads driven without a dealer.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use set_engine::{
    CardId, GameConfig, GameRng, Gate, Player, PlayerId, PlayerSettings, PlayerState,
    RecordingUi, Table, UiEvent, UserInterface,
};

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

fn settings() -> PlayerSettings {
    let config = GameConfig::new()
        .with_freezes(10, 10)
        .with_freeze_tick(5)
        .with_poll_interval(5)
        .with_computer_delay(1);
    PlayerSettings::from_config(&config)
}

#[test]
fn test_computer_player_fills_a_selection() {
    let ui = Arc::new(RecordingUi::new());
    let shared: Arc<dyn UserInterface> = ui.clone();
    let table = Arc::new(Table::new(12, 1, 3, Arc::clone(&shared)));
    for slot in 0..12 {
        table.place_card(CardId::new(slot as u32), slot);
    }
    let gate = Arc::new(Gate::new());
    let player = Arc::new(Player::new(
        PlayerId::new(0),
        false,
        settings(),
        Arc::clone(&table),
        gate,
        shared,
    ));

    let handle = player.spawn(Some(GameRng::new(5))).unwrap();
    assert!(wait_for(|| player.is_ready()));
    assert_eq!(player.state(), PlayerState::AwaitingVerdict);
    assert_eq!(table.token_count(player.id()), 3);
    assert!(ui.count(|e| matches!(e, UiEvent::TokenPlaced { .. })) >= 3);

    player.penalty();
    assert!(player.is_frozen());
    assert!(wait_for(|| ui.count(|e| matches!(e, UiEvent::Freeze { millis: 0, .. })) >= 1));

    player.terminate();
    handle.join().unwrap();
    assert_eq!(player.state(), PlayerState::Terminated);
    assert_eq!(player.score(), 0);
}

#[test]
fn test_release_returns_player_to_running() {
    let ui: Arc<dyn UserInterface> = Arc::new(RecordingUi::new());
    let table = Arc::new(Table::new(3, 1, 3, Arc::clone(&ui)));
    for slot in 0..3 {
        table.place_card(CardId::new(slot as u32), slot);
    }
    let player = Arc::new(Player::new(
        PlayerId::new(0),
        true,
        settings(),
        Arc::clone(&table),
        Arc::new(Gate::new()),
        ui,
    ));
    let handle = player.spawn(None).unwrap();

    for slot in 0..3 {
        assert!(player.submit(slot));
    }
    assert!(wait_for(|| player.is_ready()));

    player.release();
    assert!(wait_for(|| player.state() == PlayerState::Running));
    assert!(!player.is_frozen());
    assert_eq!(player.score(), 0);

    player.terminate();
    handle.join().unwrap();
}
