//! Per-game results, printed as JSON lines.

use scotland_core::{Colour, Location, ScotlandYard, ScotlandYardView};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// How a simulated game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Finished,
    /// Still running when the rotation limit was hit
    RotationLimit,
    Failed,
}

/// Result of one simulated game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: Uuid,
    pub seed: u64,
    pub status: GameStatus,
    pub winners: BTreeSet<Colour>,
    pub rounds_played: usize,
    pub moves: usize,
    /// Where MrX actually ended up, not the last revealed stop
    pub mr_x_final: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GameSummary {
    pub fn from_game(id: Uuid, seed: u64, game: &ScotlandYard, moves: usize) -> Self {
        let winners = game.winning_players();
        let status = if game.is_game_over() {
            GameStatus::Finished
        } else {
            GameStatus::RotationLimit
        };

        Self {
            id,
            seed,
            status,
            winners,
            rounds_played: game.current_round(),
            moves,
            mr_x_final: game.player_state(Colour::Black).map(|p| p.location),
            error: None,
        }
    }

    pub fn failed(id: Uuid, seed: u64, error: impl ToString) -> Self {
        Self {
            id,
            seed,
            status: GameStatus::Failed,
            winners: BTreeSet::new(),
            rounds_played: 0,
            moves: 0,
            mr_x_final: None,
            error: Some(error.to_string()),
        }
    }

    pub fn mr_x_won(&self) -> bool {
        self.winners.contains(&Colour::Black)
    }
}
