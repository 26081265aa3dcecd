//! Driving a game with real players.
//!
//! A [`Player`] answers one [`MoveRequest`] at a time through a
//! [`MoveReply`]. It may answer before returning from `make_move` or hand
//! the reply to another thread and answer later. [`Session`] waits for the
//! answer without holding the game lock, so other threads can keep querying
//! the game and registering spectators while a player thinks.

use crate::game::{GameError, MoveRequest, ScotlandYard, Turn};
use crate::moves::Move;
use crate::player::Colour;
use crate::spectator::ScotlandYardView;
use std::collections::{BTreeSet, HashMap};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info};

/// A game shared between the session and concurrent readers
pub type SharedGame = Arc<RwLock<ScotlandYard>>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("No player for {0}")]
    MissingPlayer(Colour),

    #[error("{0} dropped the move request without answering")]
    PlayerHungUp(Colour),

    #[error("Game lock poisoned")]
    LockPoisoned,
}

/// One-shot answer channel for a move request
#[derive(Debug)]
pub struct MoveReply {
    sender: SyncSender<Move>,
}

impl MoveReply {
    fn channel() -> (Self, Receiver<Move>) {
        let (sender, receiver) = mpsc::sync_channel(1);
        (Self { sender }, receiver)
    }

    /// Answer the request. Returns false if nobody is waiting any more.
    pub fn send(self, mv: Move) -> bool {
        self.sender.send(mv).is_ok()
    }
}

/// Decides moves for one colour
pub trait Player: Send {
    fn make_move(&mut self, view: &dyn ScotlandYardView, request: MoveRequest, reply: MoveReply);
}

impl<F> Player for F
where
    F: FnMut(&dyn ScotlandYardView, MoveRequest, MoveReply) + Send,
{
    fn make_move(&mut self, view: &dyn ScotlandYardView, request: MoveRequest, reply: MoveReply) {
        self(view, request, reply)
    }
}

/// A game plus a player for every colour
pub struct Session {
    game: SharedGame,
    players: HashMap<Colour, Box<dyn Player>>,
}

impl Session {
    /// Seat players. Every colour in the game needs exactly one player;
    /// players for colours not in the game are ignored.
    pub fn new(
        game: ScotlandYard,
        players: Vec<(Colour, Box<dyn Player>)>,
    ) -> Result<Self, SessionError> {
        let mut seated: HashMap<Colour, Box<dyn Player>> = players.into_iter().collect();
        let colours = game.colours();
        if let Some(missing) = colours.iter().find(|c| !seated.contains_key(*c)) {
            return Err(SessionError::MissingPlayer(*missing));
        }
        seated.retain(|colour, _| colours.contains(colour));

        Ok(Self {
            game: Arc::new(RwLock::new(game)),
            players: seated,
        })
    }

    /// Shared handle for read-only queries and spectator registration
    pub fn game(&self) -> SharedGame {
        Arc::clone(&self.game)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ScotlandYard>, SessionError> {
        self.game.read().map_err(|_| SessionError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ScotlandYard>, SessionError> {
        self.game.write().map_err(|_| SessionError::LockPoisoned)
    }

    /// Play one full rotation. Returns `Turn::RotationComplete` or
    /// `Turn::GameOver`.
    ///
    /// If an earlier call failed mid-rotation, the player whose answer was
    /// missing or rejected is asked again and the rotation carries on from
    /// there.
    pub fn play_rotation(&mut self) -> Result<Turn, SessionError> {
        let mut request = {
            let mut game = self.write()?;
            match game.pending_request() {
                Some(pending) => {
                    debug!(colour = %pending.colour, "resuming rotation");
                    pending
                }
                None => game.start_rotation()?,
            }
        };
        loop {
            let mv = self.ask(request)?;
            let applied = self.write()?.apply_move(mv)?;
            match applied.turn {
                Turn::Next(next) => request = next,
                done => return Ok(done),
            }
        }
    }

    /// Play rotations until the game ends or `max_rotations` have been
    /// played. Returns the winners, or `None` if the limit was hit first.
    pub fn play_until_over(
        &mut self,
        max_rotations: usize,
    ) -> Result<Option<BTreeSet<Colour>>, SessionError> {
        if self.read()?.is_game_over() {
            return Ok(Some(self.read()?.winning_players()));
        }

        for rotation in 1..=max_rotations {
            if let Turn::GameOver(winners) = self.play_rotation()? {
                info!(rotation, ?winners, "game finished");
                return Ok(Some(winners));
            }
            debug!(rotation, "rotation played");
        }
        Ok(None)
    }

    fn ask(&mut self, request: MoveRequest) -> Result<Move, SessionError> {
        let colour = request.colour;
        let player = self
            .players
            .get_mut(&colour)
            .ok_or(SessionError::MissingPlayer(colour))?;

        let (reply, answer) = MoveReply::channel();
        {
            let game = self.game.read().map_err(|_| SessionError::LockPoisoned)?;
            player.make_move(&*game, request, reply);
        }
        answer.recv().map_err(|_| SessionError::PlayerHungUp(colour))
    }
}
