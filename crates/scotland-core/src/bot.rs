//! A bot player that picks uniformly among the legal moves.
//!
//! There is no strategy here; the bot exists to drive games in tests and
//! simulations. Seeded bots make whole games reproducible.

use crate::game::MoveRequest;
use crate::moves::Move;
use crate::session::{MoveReply, Player};
use crate::spectator::ScotlandYardView;
use rand::prelude::*;
use std::collections::BTreeSet;

/// A bot player that can decide on moves
pub struct Bot {
    rng: StdRng,
}

impl Bot {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose a move from the legal moves
    pub fn choose_move(&mut self, moves: &BTreeSet<Move>) -> Option<Move> {
        moves.iter().choose(&mut self.rng).copied()
    }
}

impl Default for Bot {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for Bot {
    fn make_move(&mut self, _view: &dyn ScotlandYardView, request: MoveRequest, reply: MoveReply) {
        // With nothing to choose the reply is dropped and the session reports it
        if let Some(mv) = self.choose_move(&request.moves) {
            reply.send(mv);
        }
    }
}
