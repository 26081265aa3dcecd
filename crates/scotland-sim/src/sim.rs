//! Running batches of bot games.

use crate::config::SimConfig;
use crate::map;
use crate::observer::TracingSpectator;
use crate::summary::{GameStatus, GameSummary};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scotland_core::{
    rounds, Bot, Colour, ConfigError, GameError, Player, PlayerConfiguration, ScotlandYard,
    Session, SessionError, Spectator,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid game setup: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("The map has too few stops for MrX and {0} detectives")]
    TooFewStops(usize),

    #[error("A game needs at least one detective")]
    NoDetectives,

    #[error("Game lock poisoned")]
    LockPoisoned,
}

/// Tallied results of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub mr_x: usize,
    pub detectives: usize,
    pub unfinished: usize,
    pub failed: usize,
}

/// Results shared across game tasks.
pub struct SimState {
    /// Finished games by id
    pub games: DashMap<Uuid, GameSummary>,
}

impl SimState {
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
        }
    }

    /// All summaries, ordered by seed
    pub fn summaries(&self) -> Vec<GameSummary> {
        let mut summaries: Vec<GameSummary> =
            self.games.iter().map(|entry| entry.value().clone()).collect();
        summaries.sort_by_key(|s| s.seed);
        summaries
    }

    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for entry in self.games.iter() {
            let summary = entry.value();
            match summary.status {
                GameStatus::Finished if summary.mr_x_won() => tally.mr_x += 1,
                GameStatus::Finished => tally.detectives += 1,
                GameStatus::RotationLimit => tally.unfinished += 1,
                GameStatus::Failed => tally.failed += 1,
            }
        }
        tally
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

/// Play `config.games` games, one blocking task each.
pub async fn run_simulation(config: SimConfig, state: Arc<SimState>) -> anyhow::Result<()> {
    info!(games = config.games, seed = config.seed, "Running simulation");

    let mut tasks = JoinSet::new();
    for n in 0..config.games {
        let seed = config.seed.wrapping_add(n as u64);
        let config = config.clone();
        tasks.spawn_blocking(move || {
            let id = Uuid::new_v4();
            play_game(&config, id, seed).unwrap_or_else(|e| {
                warn!(game = %id, seed, "Game failed: {}", e);
                GameSummary::failed(id, seed, e)
            })
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let summary = joined?;
        state.games.insert(summary.id, summary);
    }

    Ok(())
}

/// Play one game between seeded bots on the demo city.
pub fn play_game(config: &SimConfig, id: Uuid, seed: u64) -> Result<GameSummary, SimError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let graph = map::demo_city();
    let (mr_x_start, detective_starts) =
        map::starting_positions(&mut rng, &graph, config.detectives)
            .ok_or(SimError::TooFewStops(config.detectives))?;

    let mut detectives = Colour::DETECTIVES
        .into_iter()
        .zip(detective_starts)
        .map(|(colour, location)| PlayerConfiguration::detective_default(colour, location));
    let first = detectives.next().ok_or(SimError::NoDetectives)?;

    let game = ScotlandYard::new(
        rounds::standard(),
        Arc::new(graph),
        PlayerConfiguration::mr_x_default(mr_x_start),
        first,
        detectives.collect(),
    )?;

    let spectator = Arc::new(TracingSpectator::new(id));
    game.register_spectator(Arc::clone(&spectator) as Arc<dyn Spectator>)?;

    let players: Vec<(Colour, Box<dyn Player>)> = game
        .colours()
        .iter()
        .map(|colour| (*colour, Box::new(Bot::with_seed(rng.gen())) as Box<dyn Player>))
        .collect();

    let mut session = Session::new(game, players)?;
    session.play_until_over(config.max_rotations)?;

    let shared = session.game();
    let game = shared.read().map_err(|_| SimError::LockPoisoned)?;
    Ok(GameSummary::from_game(id, seed, &game, spectator.moves()))
}
