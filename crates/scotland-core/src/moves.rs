//! Moves players can make.
//!
//! This module defines every move shape in the game and the events that
//! spectators receive as moves are applied.

use crate::network::Location;
use crate::player::Colour;
use crate::ticket::Ticket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single hop along one edge, paid for with one ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketMove {
    pub colour: Colour,
    pub ticket: Ticket,
    pub destination: Location,
}

impl TicketMove {
    pub fn new(colour: Colour, ticket: Ticket, destination: Location) -> Self {
        Self {
            colour,
            ticket,
            destination,
        }
    }
}

/// Two chained hops in one turn, paid for with a double ticket plus the
/// ticket of each leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoubleMove {
    pub colour: Colour,
    pub first: TicketMove,
    pub second: TicketMove,
}

impl DoubleMove {
    pub fn new(colour: Colour, first: TicketMove, second: TicketMove) -> Self {
        Self {
            colour,
            first,
            second,
        }
    }

    /// Where the second leg ends
    pub fn final_destination(&self) -> Location {
        self.second.destination
    }
}

/// All possible moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    /// Stay put; only offered to a detective with no ticket move
    Pass { colour: Colour },
    /// Travel one edge
    Ticket(TicketMove),
    /// Travel two edges (MrX only)
    Double(DoubleMove),
}

impl Move {
    /// Colour of the player making the move
    pub fn colour(&self) -> Colour {
        match self {
            Move::Pass { colour } => *colour,
            Move::Ticket(m) => m.colour,
            Move::Double(m) => m.colour,
        }
    }

    /// Tickets the move consumes, in payment order
    pub fn tickets(&self) -> Vec<Ticket> {
        match self {
            Move::Pass { .. } => Vec::new(),
            Move::Ticket(m) => vec![m.ticket],
            Move::Double(m) => vec![Ticket::Double, m.first.ticket, m.second.ticket],
        }
    }

    /// Location the mover ends on, if it moves at all
    pub fn destination(&self) -> Option<Location> {
        match self {
            Move::Pass { .. } => None,
            Move::Ticket(m) => Some(m.destination),
            Move::Double(m) => Some(m.final_destination()),
        }
    }
}

impl From<TicketMove> for Move {
    fn from(m: TicketMove) -> Self {
        Move::Ticket(m)
    }
}

impl From<DoubleMove> for Move {
    fn from(m: DoubleMove) -> Self {
        Move::Double(m)
    }
}

/// Events that occur as moves are applied, in delivery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new round began. Carries the round number after the increment.
    RoundStarted { round: usize },

    /// A move was made. MrX's moves carry the last known location rather
    /// than the true destination.
    MoveMade { mv: Move },

    /// Every player has moved once
    RotationComplete,

    /// The game ended
    GameOver { winners: BTreeSet<Colour> },
}
