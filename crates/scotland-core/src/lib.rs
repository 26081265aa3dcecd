//! Scotland Yard - a hidden-movement pursuit game engine
//!
//! This crate provides the core rules for the game, in which MrX evades a
//! team of detectives across a transport network while MrX's location stays
//! hidden except on reveal rounds. It includes:
//! - Tickets, wallets and transport kinds
//! - Player configuration and state
//! - Legal move generation and win evaluation
//! - The game state machine with full rule enforcement
//! - Spectator notification
//!
//! # Architecture
//!
//! The engine owns every rule but none of the surroundings. The transport
//! network is consumed through the [`Network`] trait, and move decisions come
//! from a [`Player`] answering one [`MoveRequest`] at a time.
//!
//! # Modules
//!
//! - [`ticket`]: Ticket kinds, transport kinds and wallets
//! - [`player`]: Colours, configurations and player state
//! - [`network`]: The network query interface and an in-memory graph
//! - [`moves`]: Move shapes and spectator events
//! - [`rules`]: Legal move generation
//! - [`outcome`]: Win-condition evaluation
//! - [`spectator`]: Spectators, the read-only game view and the spectator bus
//! - [`game`]: Game state machine
//! - [`session`]: Driving a game with players
//! - [`bot`]: Random-move bot player

pub mod bot;
pub mod game;
pub mod moves;
pub mod network;
pub mod outcome;
pub mod player;
pub mod rules;
pub mod session;
pub mod spectator;
pub mod ticket;

// Re-export commonly used types
pub use bot::Bot;
pub use game::{rounds, Applied, ConfigError, GameError, MoveRequest, Phase, ScotlandYard, Turn};
pub use moves::{DoubleMove, GameEvent, Move, TicketMove};
pub use network::{Edge, Graph, Location, Network};
pub use outcome::Outcome;
pub use player::{Colour, PlayerConfiguration, PlayerState, Role};
pub use rules::MoveGenerator;
pub use session::{MoveReply, Player, Session, SessionError, SharedGame};
pub use spectator::{ScotlandYardView, Spectator, SpectatorBus};
pub use ticket::{Ticket, TicketWallet, Transport};
