//! Spectator that logs a game as it is played.

use scotland_core::{Colour, Move, ScotlandYardView, Spectator};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

/// Logs every notification under the game's id and counts moves
pub struct TracingSpectator {
    game_id: Uuid,
    moves: AtomicUsize,
}

impl TracingSpectator {
    pub fn new(game_id: Uuid) -> Self {
        Self {
            game_id,
            moves: AtomicUsize::new(0),
        }
    }

    /// Moves seen so far. Each leg of a double move counts as well as the
    /// double itself.
    pub fn moves(&self) -> usize {
        self.moves.load(Ordering::Relaxed)
    }
}

impl Spectator for TracingSpectator {
    fn on_move_made(&self, view: &dyn ScotlandYardView, mv: &Move) {
        self.moves.fetch_add(1, Ordering::Relaxed);
        debug!(
            game = %self.game_id,
            colour = %mv.colour(),
            destination = ?mv.destination(),
            mr_x_seen_at = ?view.player_location(Colour::Black),
            "move made"
        );
    }

    fn on_round_started(&self, view: &dyn ScotlandYardView, round: usize) {
        debug!(
            game = %self.game_id,
            round,
            reveal = view.is_reveal_round(),
            "round started"
        );
    }

    fn on_game_over(&self, view: &dyn ScotlandYardView, winners: &BTreeSet<Colour>) {
        info!(
            game = %self.game_id,
            round = view.current_round(),
            ?winners,
            "game over"
        );
    }
}
