//! Synthetic input for computer players.
//!
//! Each computer player owns one input thread that presses random slots
//! through the same `submit` hook a human key handler would use. It
//! sleeps a randomized interval between presses and waits while the
//! player's queue is full, so it never spins.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::info;

use crate::core::GameRng;

use super::player::Player;

/// Start the input thread for `player`.
pub(crate) fn spawn(player: Arc<Player>, rng: GameRng) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("computer-{}", player.id().0))
        .spawn(move || press_keys(&player, rng))
}

fn press_keys(player: &Player, mut rng: GameRng) {
    info!(player = %player.id(), "computer input starting");

    let settings = player.settings();
    let slots = player.table_size();
    let delay = settings.computer_delay_ms;

    while !player.is_terminated() {
        if !player.queue().wait_not_full(settings.poll_interval) {
            continue;
        }
        if player.is_frozen() {
            if player.wait_terminated(settings.poll_interval) {
                break;
            }
            continue;
        }

        player.submit(rng.gen_index(slots));

        let think = rng.gen_millis(delay / 2, delay + delay / 2);
        if player.wait_terminated(Duration::from_millis(think)) {
            break;
        }
    }

    info!(player = %player.id(), "computer input terminated");
}
