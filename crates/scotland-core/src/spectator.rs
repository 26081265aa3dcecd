//! Spectators and the bus that notifies them.
//!
//! Spectators only ever see the game through [`ScotlandYardView`], which
//! exposes derived queries and nothing mutable. The bus delivers each burst
//! of events over a snapshot of its registrations, so a spectator may
//! register or unregister (itself included) from inside a callback.

use crate::game::GameError;
use crate::moves::{GameEvent, Move};
use crate::network::{Location, Network};
use crate::player::Colour;
use crate::ticket::Ticket;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Read-only queries over a running game
pub trait ScotlandYardView {
    /// Colours in turn order, MrX first
    fn players(&self) -> &[Colour];

    /// Colour of the player due to move
    fn current_player(&self) -> Colour;

    /// Number of rounds played so far
    fn current_round(&self) -> usize;

    /// The reveal schedule
    fn rounds(&self) -> &[bool];

    /// Whether the round just played revealed MrX
    fn is_reveal_round(&self) -> bool;

    /// Ticket count for a player, `None` if the colour isn't playing
    fn player_tickets(&self, colour: Colour, ticket: Ticket) -> Option<u32>;

    /// Location of a player as visible to everyone. For MrX this is the
    /// last revealed location (0 before the first reveal).
    fn player_location(&self, colour: Colour) -> Option<Location>;

    fn is_game_over(&self) -> bool;

    /// Winning colours, empty while the game is running
    fn winning_players(&self) -> BTreeSet<Colour>;

    /// The transport network
    fn graph(&self) -> Arc<dyn Network>;
}

/// Receives game notifications. Every method defaults to doing nothing.
pub trait Spectator: Send + Sync {
    fn on_move_made(&self, _view: &dyn ScotlandYardView, _mv: &Move) {}

    fn on_round_started(&self, _view: &dyn ScotlandYardView, _round: usize) {}

    fn on_rotation_complete(&self, _view: &dyn ScotlandYardView) {}

    fn on_game_over(&self, _view: &dyn ScotlandYardView, _winners: &BTreeSet<Colour>) {}
}

/// Registered spectators
#[derive(Default)]
pub struct SpectatorBus {
    spectators: Mutex<Vec<Arc<dyn Spectator>>>,
}

impl SpectatorBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn Spectator>>> {
        // The list is never left half-updated, so a poisoned lock is still usable
        self.spectators.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a spectator. The same instance can only be registered once.
    pub fn register(&self, spectator: Arc<dyn Spectator>) -> Result<(), GameError> {
        let mut spectators = self.lock();
        if spectators.iter().any(|s| same_spectator(s, &spectator)) {
            return Err(GameError::DuplicateSpectator);
        }
        spectators.push(spectator);
        Ok(())
    }

    /// Unregister a previously registered spectator
    pub fn unregister(&self, spectator: &Arc<dyn Spectator>) -> Result<(), GameError> {
        let mut spectators = self.lock();
        let index = spectators
            .iter()
            .position(|s| same_spectator(s, spectator))
            .ok_or(GameError::UnknownSpectator)?;
        spectators.remove(index);
        Ok(())
    }

    /// Currently registered spectators, in registration order
    pub fn snapshot(&self) -> Vec<Arc<dyn Spectator>> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SpectatorBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectatorBus")
            .field("spectators", &self.len())
            .finish()
    }
}

/// Identity comparison; ignores vtable pointers
fn same_spectator(a: &Arc<dyn Spectator>, b: &Arc<dyn Spectator>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Deliver one event to every spectator in `spectators`
pub fn notify(spectators: &[Arc<dyn Spectator>], view: &dyn ScotlandYardView, event: &GameEvent) {
    for spectator in spectators {
        match event {
            GameEvent::RoundStarted { round } => spectator.on_round_started(view, *round),
            GameEvent::MoveMade { mv } => spectator.on_move_made(view, mv),
            GameEvent::RotationComplete => spectator.on_rotation_complete(view),
            GameEvent::GameOver { winners } => spectator.on_game_over(view, winners),
        }
    }
}
