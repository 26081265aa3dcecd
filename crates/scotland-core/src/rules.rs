//! Legal move generation.
//!
//! [`MoveGenerator`] is a pure view over the player states, the network and
//! the round counters. It never mutates anything; the game builds a fresh
//! generator every time it needs a move set so results are never stale.

use crate::moves::{DoubleMove, Move, TicketMove};
use crate::network::{Location, Network};
use crate::player::{Colour, PlayerState};
use crate::ticket::Ticket;
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// Enumerates legal moves for a snapshot of the game
pub struct MoveGenerator<'a> {
    network: &'a dyn Network,
    players: &'a [PlayerState],
    current_round: usize,
    total_rounds: usize,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(
        network: &'a dyn Network,
        players: &'a [PlayerState],
        current_round: usize,
        total_rounds: usize,
    ) -> Self {
        Self {
            network,
            players,
            current_round,
            total_rounds,
        }
    }

    pub fn players(&self) -> &'a [PlayerState] {
        self.players
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// Look up a player by colour
    pub fn player(&self, colour: Colour) -> Option<&'a PlayerState> {
        self.players.iter().find(|p| p.colour == colour)
    }

    /// The MrX player, if present
    pub fn mr_x(&self) -> Option<&'a PlayerState> {
        self.players.iter().find(|p| p.is_mr_x())
    }

    /// The detectives in seating order
    pub fn detectives(&self) -> impl Iterator<Item = &'a PlayerState> {
        self.players.iter().filter(|p| p.is_detective())
    }

    fn detective_locations(&self) -> HashSet<Location> {
        self.detectives().map(|p| p.location).collect()
    }

    /// Single-hop moves for `colour` starting from `location`.
    ///
    /// A hop is offered when the player holds the ticket for the edge's
    /// transport and no detective stands on the destination. MrX holding a
    /// secret ticket may additionally take any edge on it.
    pub fn ticket_moves(&self, colour: Colour, location: Location) -> BTreeSet<TicketMove> {
        let mut moves = BTreeSet::new();
        let Some(player) = self.player(colour) else {
            return moves;
        };

        let occupied = self.detective_locations();
        let can_go_secret = colour.is_mr_x() && player.tickets.has(Ticket::Secret);

        for edge in self.network.edges_from(location) {
            if occupied.contains(&edge.destination) {
                continue;
            }

            let ticket = Ticket::from_transport(edge.transport);
            if player.tickets.has(ticket) {
                moves.insert(TicketMove::new(colour, ticket, edge.destination));
            }
            if can_go_secret {
                moves.insert(TicketMove::new(colour, Ticket::Secret, edge.destination));
            }
        }

        moves
    }

    /// Every move `colour` may make right now.
    ///
    /// Detectives always get at least a pass. MrX gets no pass; an empty set
    /// means MrX is stuck.
    pub fn legal_moves(&self, colour: Colour) -> BTreeSet<Move> {
        let Some(player) = self.player(colour) else {
            return BTreeSet::new();
        };

        let singles = self.ticket_moves(colour, player.location);
        let mut moves: BTreeSet<Move> = singles.iter().copied().map(Move::from).collect();

        if player.is_mr_x() {
            if self.double_allowed(player) {
                moves.extend(self.double_moves(player, &singles));
            }
        } else if moves.is_empty() {
            moves.insert(Move::Pass { colour });
        }

        trace!(%colour, count = moves.len(), "generated legal moves");
        moves
    }

    /// Doubles need a double ticket and at least two rounds left
    fn double_allowed(&self, mr_x: &PlayerState) -> bool {
        self.current_round + 1 < self.total_rounds && mr_x.tickets.has(Ticket::Double)
    }

    fn double_moves(&self, mr_x: &PlayerState, firsts: &BTreeSet<TicketMove>) -> Vec<Move> {
        let wallet = &mr_x.tickets;
        let mut doubles = Vec::new();

        for first in firsts {
            for second in self.ticket_moves(mr_x.colour, first.destination) {
                let affordable = if first.ticket == second.ticket {
                    wallet.has_at_least(first.ticket, 2)
                } else {
                    wallet.has(first.ticket) && wallet.has(second.ticket)
                };
                if affordable {
                    doubles.push(Move::Double(DoubleMove::new(mr_x.colour, *first, second)));
                }
            }
        }

        doubles
    }
}
