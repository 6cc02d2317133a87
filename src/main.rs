//! Headless Set game runner.
//!
//! Human players read key presses from stdin, one `<player> <slot>` pair
//! per line. Computer players press random slots on their own.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use set_engine::{Dealer, GameConfig, GameError, LoggingUi, NullUi, Player, PlayerId, StopHandle};

#[derive(Parser)]
#[command(name = "set-game")]
#[command(version)]
#[command(about = "Run a game of Set with human (stdin) and computer players")]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of human players (overrides config)
    #[arg(long)]
    humans: Option<usize>,

    /// Number of computer players (overrides config)
    #[arg(long)]
    computers: Option<usize>,

    /// Round timeout in milliseconds (overrides config)
    #[arg(long)]
    turn_timeout: Option<u64>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the game after this many milliseconds
    #[arg(long)]
    duration: Option<u64>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "game failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig, GameError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::new(),
    };
    if cli.humans.is_some() || cli.computers.is_some() {
        let humans = cli.humans.unwrap_or(config.human_players);
        let computers = cli.computers.unwrap_or(config.computer_players);
        config = config.with_players(humans, computers);
    }
    if let Some(timeout) = cli.turn_timeout {
        let warning = config.turn_timeout_warning_ms.min(timeout);
        config = config.with_turn_timeout(timeout, warning);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), GameError> {
    let config = load_config(&cli)?;
    let pause = Duration::from_millis(config.end_game_pause_ms);
    let humans = config.human_players;

    let ui = Arc::new(LoggingUi::new(NullUi));
    let dealer = Dealer::new(config, ui)?;
    let stop = dealer.stop_handle();

    if humans > 0 {
        let players: Vec<Arc<Player>> = dealer.players()[..humans].to_vec();
        spawn_keyboard(players).map_err(GameError::Spawn)?;
    }
    if let Some(ms) = cli.duration {
        spawn_deadline(stop.clone(), Duration::from_millis(ms)).map_err(GameError::Spawn)?;
    }

    let outcome = dealer.run()?;

    for (player, score) in outcome.scores.iter() {
        info!(%player, score, winner = outcome.is_winner(player), "final score");
    }
    if cli.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(error = %e, "failed to serialize outcome"),
        }
    } else {
        let names: Vec<String> = outcome.winners.iter().map(ToString::to_string).collect();
        println!("Winners: {}", names.join(", "));
    }

    thread::sleep(pause);
    Ok(())
}

/// Forward `<player> <slot>` lines from stdin to human players.
fn spawn_keyboard(players: Vec<Arc<Player>>) -> io::Result<()> {
    thread::Builder::new()
        .name("keyboard".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let mut parts = line.split_whitespace();
                let parsed = match (parts.next(), parts.next()) {
                    (Some(p), Some(s)) => p.parse::<u8>().ok().zip(s.parse::<usize>().ok()),
                    _ => None,
                };
                let Some((id, slot)) = parsed else {
                    warn!(%line, "expected `<player> <slot>`");
                    continue;
                };
                match players.get(PlayerId::new(id).index()) {
                    Some(player) => {
                        player.submit(slot);
                    }
                    None => warn!(player = id, "not a human player"),
                }
            }
        })
        .map(drop)
}

fn spawn_deadline(stop: StopHandle, after: Duration) -> io::Result<()> {
    thread::Builder::new()
        .name("deadline".into())
        .spawn(move || {
            thread::sleep(after);
            info!("time limit reached");
            stop.terminate();
        })
        .map(drop)
}
