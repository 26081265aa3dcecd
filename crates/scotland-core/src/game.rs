//! Core game state machine.
//!
//! This module contains the `ScotlandYard` struct, which owns all mutable
//! game state and enforces every rule: turn order, move legality, ticket
//! accounting, MrX's hidden location and round progression.
//!
//! The machine is pull-driven. [`ScotlandYard::start_rotation`] hands out a
//! [`MoveRequest`] for MrX; each accepted [`ScotlandYard::apply_move`]
//! answers with the next request, or with the end of the rotation or game.
//! Only one request is ever outstanding.

use crate::moves::{DoubleMove, GameEvent, Move, TicketMove};
use crate::network::{Location, Network};
use crate::outcome::{self, Outcome};
use crate::player::{Colour, PlayerConfiguration, PlayerState};
use crate::rules::MoveGenerator;
use crate::spectator::{self, ScotlandYardView, Spectator, SpectatorBus};
use crate::ticket::{Ticket, TicketWallet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// MrX always sits first in turn order
const MR_X: usize = 0;

/// Reveal schedules
pub mod rounds {
    /// Rounds in a standard game
    pub const STANDARD_LENGTH: usize = 24;

    /// Rounds (1-based) on which MrX surfaces in a standard game
    pub const STANDARD_REVEALS: [usize; 5] = [3, 8, 13, 18, 24];

    /// The standard 24-round schedule
    pub fn standard() -> Vec<bool> {
        (1..=STANDARD_LENGTH)
            .map(|round| STANDARD_REVEALS.contains(&round))
            .collect()
    }
}

/// Errors that reject a game configuration
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Empty rounds")]
    EmptyRounds,

    #[error("Empty graph")]
    EmptyGraph,

    #[error("MrX should be Black, got {0}")]
    MrXNotBlack(Colour),

    #[error("Duplicate colour {0}")]
    DuplicateColour(Colour),

    #[error("Duplicate location {0}")]
    DuplicateLocation(Location),

    #[error("Location {0} is not on the graph")]
    UnknownLocation(Location),

    #[error("{colour} has no entry for {ticket:?} tickets")]
    MissingTicket { colour: Colour, ticket: Ticket },

    #[error("Detective {colour} can't hold {ticket:?} tickets")]
    DetectiveForbiddenTicket { colour: Colour, ticket: Ticket },
}

/// Errors that reject a call on a running game
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Move is not valid: {0:?}")]
    IllegalMove(Move),

    #[error("Game is over")]
    GameOver,

    #[error("A move request is already outstanding")]
    RotationInProgress,

    #[error("No move has been requested")]
    NoMoveRequested,

    #[error("No {0:?} tickets left")]
    InsufficientTickets(Ticket),

    #[error("Spectator already registered")]
    DuplicateSpectator,

    #[error("Spectator not registered")]
    UnknownSpectator,
}

/// Where the machine is in the turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Between rotations; the next rotation starts with MrX
    Ready,

    /// Waiting on the player at this seat
    AwaitingMove { player: usize },

    /// Game over was announced
    Finished,
}

/// A request for one player to choose a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub colour: Colour,
    /// Where the player actually stands. Only the player being asked sees it.
    pub location: Location,
    /// The legal moves; the answer must be one of these
    pub moves: BTreeSet<Move>,
}

/// What happens after an accepted move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    /// The next player must move
    Next(MoveRequest),
    /// Everyone moved; call `start_rotation` again
    RotationComplete,
    /// The game ended with these winners
    GameOver(BTreeSet<Colour>),
}

/// Result of applying a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Events delivered to spectators, in order
    pub events: Vec<GameEvent>,
    pub turn: Turn,
}

/// The authoritative game
pub struct ScotlandYard {
    rounds: Vec<bool>,
    graph: Arc<dyn Network>,
    /// Replaced wholesale, never edited in place
    colours: Arc<[Colour]>,
    players: Vec<PlayerState>,
    spectators: Arc<SpectatorBus>,
    current_round: usize,
    phase: Phase,
    last_known_mr_x: Location,
}

impl ScotlandYard {
    /// Create a new game.
    ///
    /// MrX moves first, then the detectives in the order given.
    pub fn new(
        rounds: Vec<bool>,
        graph: Arc<dyn Network>,
        mr_x: PlayerConfiguration,
        first_detective: PlayerConfiguration,
        rest_of_the_detectives: Vec<PlayerConfiguration>,
    ) -> Result<Self, ConfigError> {
        if rounds.is_empty() {
            return Err(ConfigError::EmptyRounds);
        }
        if graph.is_empty() {
            return Err(ConfigError::EmptyGraph);
        }
        if !mr_x.colour.is_mr_x() {
            return Err(ConfigError::MrXNotBlack(mr_x.colour));
        }

        let configurations = std::iter::once(mr_x)
            .chain(std::iter::once(first_detective))
            .chain(rest_of_the_detectives);

        let mut colours = Vec::new();
        let mut locations = HashSet::new();
        let mut players = Vec::new();

        for configuration in configurations {
            let colour = configuration.colour;
            if !locations.insert(configuration.location) {
                return Err(ConfigError::DuplicateLocation(configuration.location));
            }
            if colours.contains(&colour) {
                return Err(ConfigError::DuplicateColour(colour));
            }
            if !graph.contains(configuration.location) {
                return Err(ConfigError::UnknownLocation(configuration.location));
            }

            let tickets = TicketWallet::from_map(&configuration.tickets)
                .map_err(|ticket| ConfigError::MissingTicket { colour, ticket })?;

            colours.push(colour);
            players.push(PlayerState::new(colour, configuration.location, tickets));
        }

        for player in players.iter().filter(|p| p.is_detective()) {
            if let Some(ticket) = Ticket::ALL
                .into_iter()
                .find(|t| t.is_mr_x_only() && player.tickets.has(*t))
            {
                return Err(ConfigError::DetectiveForbiddenTicket {
                    colour: player.colour,
                    ticket,
                });
            }
        }

        debug!(players = players.len(), rounds = rounds.len(), "game created");

        Ok(Self {
            rounds,
            graph,
            colours: colours.into(),
            players,
            spectators: Arc::new(SpectatorBus::new()),
            current_round: 0,
            phase: Phase::Ready,
            last_known_mr_x: 0,
        })
    }

    /// Current phase of the turn cycle
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Shared snapshot of the colours in turn order
    pub fn colours(&self) -> Arc<[Colour]> {
        Arc::clone(&self.colours)
    }

    /// True state of a player. Not for spectators: includes MrX's real location.
    pub fn player_state(&self, colour: Colour) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.colour == colour)
    }

    fn generator(&self) -> MoveGenerator<'_> {
        MoveGenerator::new(
            self.graph.as_ref(),
            &self.players,
            self.current_round,
            self.rounds.len(),
        )
    }

    /// Legal moves for `colour` right now
    pub fn legal_moves(&self, colour: Colour) -> BTreeSet<Move> {
        self.generator().legal_moves(colour)
    }

    /// End-of-game conditions, evaluated fresh
    pub fn outcome(&self) -> Outcome {
        Outcome::evaluate(&self.generator())
    }

    // ==================== Spectators ====================

    pub fn register_spectator(&self, spectator: Arc<dyn Spectator>) -> Result<(), GameError> {
        self.spectators.register(spectator)
    }

    pub fn unregister_spectator(&self, spectator: &Arc<dyn Spectator>) -> Result<(), GameError> {
        self.spectators.unregister(spectator)
    }

    /// Currently registered spectators
    pub fn spectators(&self) -> Vec<Arc<dyn Spectator>> {
        self.spectators.snapshot()
    }

    /// Handle to the spectator registry, usable without access to the game
    pub fn spectator_bus(&self) -> Arc<SpectatorBus> {
        Arc::clone(&self.spectators)
    }

    // ==================== Turn Cycle ====================

    /// Begin a rotation by asking MrX for a move
    pub fn start_rotation(&mut self) -> Result<MoveRequest, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if matches!(self.phase, Phase::AwaitingMove { .. }) {
            return Err(GameError::RotationInProgress);
        }

        self.phase = Phase::AwaitingMove { player: MR_X };
        debug!(round = self.current_round, "rotation started");
        Ok(self.request_for(MR_X))
    }

    /// The request still waiting for an answer, if any. A rejected answer
    /// leaves it outstanding, so the same player can be asked again.
    pub fn pending_request(&self) -> Option<MoveRequest> {
        match self.phase {
            Phase::AwaitingMove { player } => Some(self.request_for(player)),
            Phase::Ready | Phase::Finished => None,
        }
    }

    fn request_for(&self, index: usize) -> MoveRequest {
        let colour = self.colours[index];
        MoveRequest {
            colour,
            location: self.players[index].location,
            moves: self.legal_moves(colour),
        }
    }

    /// Apply the answer to the outstanding move request
    pub fn apply_move(&mut self, mv: Move) -> Result<Applied, GameError> {
        let Phase::AwaitingMove { player: index } = self.phase else {
            return Err(GameError::NoMoveRequested);
        };
        let colour = self.colours[index];

        if !self.legal_moves(colour).contains(&mv) {
            warn!(%colour, ?mv, "rejected illegal move");
            return Err(GameError::IllegalMove(mv));
        }

        let spectators = self.spectators.snapshot();
        let mut events = Vec::new();

        match mv {
            Move::Pass { .. } => {
                self.emit(&spectators, &mut events, GameEvent::MoveMade { mv });
            }

            Move::Ticket(ticket_move) if colour.is_mr_x() => {
                self.players[MR_X].tickets.remove(ticket_move.ticket)?;
                self.mr_x_leg(ticket_move, &spectators, &mut events);
            }

            Move::Ticket(ticket_move) => {
                let detective = &mut self.players[index];
                detective.tickets.remove(ticket_move.ticket)?;
                detective.location = ticket_move.destination;
                // Spent detective tickets go to MrX
                self.players[MR_X].tickets.add(ticket_move.ticket);
                self.emit(&spectators, &mut events, GameEvent::MoveMade { mv });
            }

            Move::Double(double) => {
                let wallet = &mut self.players[MR_X].tickets;
                wallet.remove(Ticket::Double)?;
                wallet.remove(double.first.ticket)?;
                wallet.remove(double.second.ticket)?;

                let shown = self.concealed_double(&double);
                self.emit(
                    &spectators,
                    &mut events,
                    GameEvent::MoveMade {
                        mv: Move::Double(shown),
                    },
                );
                self.mr_x_leg(double.first, &spectators, &mut events);
                self.mr_x_leg(double.second, &spectators, &mut events);
            }
        }

        debug!(%colour, round = self.current_round, "move applied");

        let next = index + 1;
        let captured = outcome::is_captured(&self.generator());

        let turn = if next < self.players.len() && !captured {
            self.phase = Phase::AwaitingMove { player: next };
            Turn::Next(self.request_for(next))
        } else {
            let outcome = self.outcome();
            if outcome.is_over() {
                let winners = outcome.winners(&self.colours);
                self.phase = Phase::Finished;
                debug!(?winners, ?outcome, "game over");
                self.emit(
                    &spectators,
                    &mut events,
                    GameEvent::GameOver {
                        winners: winners.clone(),
                    },
                );
                Turn::GameOver(winners)
            } else {
                self.phase = Phase::Ready;
                debug!(round = self.current_round, "rotation complete");
                self.emit(&spectators, &mut events, GameEvent::RotationComplete);
                Turn::RotationComplete
            }
        };

        Ok(Applied { events, turn })
    }

    // ==================== Helper Methods ====================

    /// Move MrX one leg, advance the round and announce it
    fn mr_x_leg(
        &mut self,
        leg: TicketMove,
        spectators: &[Arc<dyn Spectator>],
        events: &mut Vec<GameEvent>,
    ) {
        let played = self.current_round;
        self.players[MR_X].location = leg.destination;
        if self.reveals(played) {
            self.last_known_mr_x = leg.destination;
        }
        self.current_round += 1;

        self.emit(
            spectators,
            events,
            GameEvent::RoundStarted {
                round: self.current_round,
            },
        );
        self.emit(
            spectators,
            events,
            GameEvent::MoveMade {
                mv: Move::Ticket(TicketMove::new(
                    leg.colour,
                    leg.ticket,
                    self.last_known_mr_x,
                )),
            },
        );
    }

    /// The double move as observers see it, computed before either leg is
    /// applied. Each leg shows its destination only if its own round reveals.
    fn concealed_double(&self, double: &DoubleMove) -> DoubleMove {
        let round = self.current_round;
        let first_shown = if self.reveals(round) {
            double.first.destination
        } else {
            self.last_known_mr_x
        };
        let second_shown = if self.reveals(round + 1) {
            double.second.destination
        } else {
            first_shown
        };

        DoubleMove::new(
            double.colour,
            TicketMove::new(double.colour, double.first.ticket, first_shown),
            TicketMove::new(double.colour, double.second.ticket, second_shown),
        )
    }

    /// Whether playing round index `round` reveals MrX
    fn reveals(&self, round: usize) -> bool {
        self.rounds.get(round).copied().unwrap_or(false)
    }

    fn visible_location(&self, player: &PlayerState) -> Location {
        if player.is_mr_x() && !self.is_reveal_round() {
            self.last_known_mr_x
        } else {
            player.location
        }
    }

    fn emit(
        &self,
        spectators: &[Arc<dyn Spectator>],
        events: &mut Vec<GameEvent>,
        event: GameEvent,
    ) {
        spectator::notify(spectators, self, &event);
        events.push(event);
    }
}

impl ScotlandYardView for ScotlandYard {
    fn players(&self) -> &[Colour] {
        &self.colours
    }

    fn current_player(&self) -> Colour {
        match self.phase {
            Phase::AwaitingMove { player } => self.colours[player],
            Phase::Ready | Phase::Finished => self.colours[MR_X],
        }
    }

    fn current_round(&self) -> usize {
        self.current_round
    }

    fn rounds(&self) -> &[bool] {
        &self.rounds
    }

    fn is_reveal_round(&self) -> bool {
        match self.current_round {
            0 => false,
            round => self.reveals(round - 1),
        }
    }

    fn player_tickets(&self, colour: Colour, ticket: Ticket) -> Option<u32> {
        self.player_state(colour).map(|p| p.tickets.get(ticket))
    }

    fn player_location(&self, colour: Colour) -> Option<Location> {
        self.player_state(colour).map(|p| self.visible_location(p))
    }

    fn is_game_over(&self) -> bool {
        self.outcome().is_over()
    }

    fn winning_players(&self) -> BTreeSet<Colour> {
        self.outcome().winners(&self.colours)
    }

    fn graph(&self) -> Arc<dyn Network> {
        Arc::clone(&self.graph)
    }
}

impl std::fmt::Debug for ScotlandYard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScotlandYard")
            .field("colours", &self.colours)
            .field("current_round", &self.current_round)
            .field("phase", &self.phase)
            .field("spectators", &self.spectators)
            .finish_non_exhaustive()
    }
}
