//! Win-condition evaluation.
//!
//! The outcome is always derived from the current player states and round
//! counters; nothing here is cached across moves.

use crate::player::Colour;
use crate::rules::MoveGenerator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which end-of-game conditions currently hold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// A detective stands on MrX's true location
    pub captured: bool,
    /// MrX has no legal move
    pub mr_x_stuck: bool,
    /// No detective has a ticket move (passes don't count)
    pub detectives_stuck: bool,
    /// Every round in the schedule has been played
    pub rounds_exhausted: bool,
}

impl Outcome {
    /// Evaluate every condition against the generator's snapshot
    pub fn evaluate(generator: &MoveGenerator<'_>) -> Self {
        let captured = is_captured(generator);
        let mr_x_stuck = generator
            .mr_x()
            .map_or(true, |mr_x| generator.legal_moves(mr_x.colour).is_empty());
        let detectives_stuck = generator
            .detectives()
            .all(|d| generator.ticket_moves(d.colour, d.location).is_empty());
        let rounds_exhausted = generator.current_round() >= generator.total_rounds();

        Self {
            captured,
            mr_x_stuck,
            detectives_stuck,
            rounds_exhausted,
        }
    }

    /// Whether any end condition holds
    pub fn is_over(&self) -> bool {
        self.captured || self.mr_x_stuck || self.detectives_stuck || self.rounds_exhausted
    }

    /// The winning colours among `colours`. Detectives take precedence when
    /// conditions for both sides hold at once.
    pub fn winners(&self, colours: &[Colour]) -> BTreeSet<Colour> {
        if self.captured || self.mr_x_stuck {
            colours.iter().copied().filter(Colour::is_detective).collect()
        } else if self.detectives_stuck || self.rounds_exhausted {
            colours.iter().copied().filter(Colour::is_mr_x).collect()
        } else {
            BTreeSet::new()
        }
    }
}

/// Whether any detective shares MrX's true location
pub fn is_captured(generator: &MoveGenerator<'_>) -> bool {
    match generator.mr_x() {
        Some(mr_x) => generator.detectives().any(|d| d.location == mr_x.location),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Graph;
    use crate::player::PlayerState;
    use crate::ticket::{TicketWallet, Transport};

    const COLOURS: [Colour; 3] = [Colour::Black, Colour::Blue, Colour::Red];

    fn graph() -> Graph {
        Graph::from_edges([
            (1, 2, Transport::Taxi),
            (2, 3, Transport::Taxi),
            (3, 4, Transport::Taxi),
            (4, 5, Transport::Taxi),
        ])
    }

    fn taxis(n: u32) -> TicketWallet {
        TicketWallet::with_amounts(n, 0, 0, 0, 0)
    }

    #[test]
    fn test_game_in_progress() {
        let graph = graph();
        let players = vec![
            PlayerState::new(Colour::Black, 3, taxis(2)),
            PlayerState::new(Colour::Blue, 1, taxis(2)),
            PlayerState::new(Colour::Red, 5, taxis(2)),
        ];
        let outcome = Outcome::evaluate(&MoveGenerator::new(&graph, &players, 0, 3));

        assert_eq!(outcome, Outcome::default());
        assert!(!outcome.is_over());
        assert!(outcome.winners(&COLOURS).is_empty());
    }

    #[test]
    fn test_capture_wins_for_detectives() {
        let graph = graph();
        let players = vec![
            PlayerState::new(Colour::Black, 3, taxis(2)),
            PlayerState::new(Colour::Blue, 3, taxis(2)),
            PlayerState::new(Colour::Red, 5, taxis(2)),
        ];
        let outcome = Outcome::evaluate(&MoveGenerator::new(&graph, &players, 0, 3));

        assert!(outcome.captured);
        assert_eq!(
            outcome.winners(&COLOURS),
            BTreeSet::from([Colour::Blue, Colour::Red])
        );
    }

    #[test]
    fn test_surrounded_mr_x_is_stuck() {
        let graph = graph();
        let players = vec![
            PlayerState::new(Colour::Black, 3, taxis(2)),
            PlayerState::new(Colour::Blue, 2, taxis(2)),
            PlayerState::new(Colour::Red, 4, taxis(2)),
        ];
        let outcome = Outcome::evaluate(&MoveGenerator::new(&graph, &players, 0, 3));

        assert!(outcome.mr_x_stuck);
        assert!(!outcome.captured);
        assert!(outcome.is_over());
        assert_eq!(
            outcome.winners(&COLOURS),
            BTreeSet::from([Colour::Blue, Colour::Red])
        );
    }

    #[test]
    fn test_detectives_out_of_tickets() {
        let graph = graph();
        let players = vec![
            PlayerState::new(Colour::Black, 3, taxis(2)),
            PlayerState::new(Colour::Blue, 1, taxis(0)),
            PlayerState::new(Colour::Red, 5, taxis(0)),
        ];
        let outcome = Outcome::evaluate(&MoveGenerator::new(&graph, &players, 0, 3));

        assert!(outcome.detectives_stuck);
        assert_eq!(outcome.winners(&COLOURS), BTreeSet::from([Colour::Black]));
    }

    #[test]
    fn test_rounds_exhausted() {
        let graph = graph();
        let players = vec![
            PlayerState::new(Colour::Black, 3, taxis(2)),
            PlayerState::new(Colour::Blue, 1, taxis(2)),
            PlayerState::new(Colour::Red, 5, taxis(2)),
        ];
        let outcome = Outcome::evaluate(&MoveGenerator::new(&graph, &players, 3, 3));

        assert!(outcome.rounds_exhausted);
        assert_eq!(outcome.winners(&COLOURS), BTreeSet::from([Colour::Black]));
    }
}
