//! Player identity, configuration and in-game state.
//!
//! This module contains:
//! - Colour, the closed set of player identities (Black is always MrX)
//! - PlayerConfiguration, the constructor input for one player
//! - PlayerState, the live location and wallet of one player

use crate::network::Location;
use crate::ticket::{Ticket, TicketWallet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Player colour. Black is reserved for MrX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Colour {
    Black,
    Blue,
    Green,
    Red,
    White,
    Yellow,
}

impl Colour {
    /// All colours
    pub const ALL: [Colour; 6] = [
        Colour::Black,
        Colour::Blue,
        Colour::Green,
        Colour::Red,
        Colour::White,
        Colour::Yellow,
    ];

    /// Detective colours in seating order
    pub const DETECTIVES: [Colour; 5] = [
        Colour::Blue,
        Colour::Green,
        Colour::Red,
        Colour::White,
        Colour::Yellow,
    ];

    pub fn is_mr_x(&self) -> bool {
        matches!(self, Colour::Black)
    }

    pub fn is_detective(&self) -> bool {
        !self.is_mr_x()
    }

    pub fn role(&self) -> Role {
        if self.is_mr_x() {
            Role::MrX
        } else {
            Role::Detective
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which side a player is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    MrX,
    Detective,
}

/// Starting configuration for one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfiguration {
    pub colour: Colour,
    pub location: Location,
    /// Every ticket kind must have an entry, even if zero
    pub tickets: HashMap<Ticket, u32>,
}

impl PlayerConfiguration {
    pub fn new(colour: Colour, location: Location, tickets: HashMap<Ticket, u32>) -> Self {
        Self {
            colour,
            location,
            tickets,
        }
    }

    /// MrX with the standard allowance: 4 taxi, 3 bus, 3 underground,
    /// 2 double, 5 secret
    pub fn mr_x_default(location: Location) -> Self {
        Self::new(
            Colour::Black,
            location,
            TicketWallet::with_amounts(4, 3, 3, 2, 5).to_map(),
        )
    }

    /// A detective with the standard allowance: 11 taxi, 8 bus, 4 underground
    pub fn detective_default(colour: Colour, location: Location) -> Self {
        Self::new(
            colour,
            location,
            TicketWallet::with_amounts(11, 8, 4, 0, 0).to_map(),
        )
    }
}

/// A single player's live state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub colour: Colour,
    /// True location, never shown to observers for MrX off reveal rounds
    pub location: Location,
    pub tickets: TicketWallet,
}

impl PlayerState {
    pub fn new(colour: Colour, location: Location, tickets: TicketWallet) -> Self {
        Self {
            colour,
            location,
            tickets,
        }
    }

    pub fn role(&self) -> Role {
        self.colour.role()
    }

    pub fn is_mr_x(&self) -> bool {
        self.colour.is_mr_x()
    }

    pub fn is_detective(&self) -> bool {
        self.colour.is_detective()
    }
}
