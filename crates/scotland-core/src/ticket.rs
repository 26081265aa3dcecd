//! Tickets, transport kinds and per-player ticket wallets.
//!
//! This module contains:
//! - Transport kinds carried by network edges
//! - Ticket kinds and the transport-to-ticket mapping
//! - TicketWallet for tracking ticket counts

use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Transport kind of a network edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Transport {
    Taxi,
    Bus,
    Underground,
    /// Ferry crossings, only usable on a secret ticket
    Boat,
}

impl Transport {
    /// All transport kinds
    pub const ALL: [Transport; 4] = [
        Transport::Taxi,
        Transport::Bus,
        Transport::Underground,
        Transport::Boat,
    ];
}

/// Ticket types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ticket {
    Taxi,
    Bus,
    Underground,
    /// Two moves in one turn (MrX only)
    Double,
    /// Any edge, hides the transport used (MrX only)
    Secret,
}

impl Ticket {
    /// All ticket types
    pub const ALL: [Ticket; 5] = [
        Ticket::Taxi,
        Ticket::Bus,
        Ticket::Underground,
        Ticket::Double,
        Ticket::Secret,
    ];

    /// The ticket needed to travel along an edge of the given transport kind
    pub fn from_transport(transport: Transport) -> Self {
        match transport {
            Transport::Taxi => Ticket::Taxi,
            Transport::Bus => Ticket::Bus,
            Transport::Underground => Ticket::Underground,
            Transport::Boat => Ticket::Secret,
        }
    }

    /// Whether only MrX may ever hold this ticket
    pub fn is_mr_x_only(&self) -> bool {
        matches!(self, Ticket::Double | Ticket::Secret)
    }
}

/// A player's ticket inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketWallet {
    pub taxi: u32,
    pub bus: u32,
    pub underground: u32,
    pub double: u32,
    pub secret: u32,
}

impl TicketWallet {
    /// Create an empty wallet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a wallet with specific amounts
    pub fn with_amounts(taxi: u32, bus: u32, underground: u32, double: u32, secret: u32) -> Self {
        Self {
            taxi,
            bus,
            underground,
            double,
            secret,
        }
    }

    /// Build a wallet from a ticket map, returning the first ticket kind
    /// that has no entry.
    pub fn from_map(tickets: &HashMap<Ticket, u32>) -> Result<Self, Ticket> {
        let mut wallet = Self::new();
        for ticket in Ticket::ALL {
            let count = tickets.get(&ticket).ok_or(ticket)?;
            wallet.set(ticket, *count);
        }
        Ok(wallet)
    }

    /// Total number of tickets
    pub fn total(&self) -> u64 {
        Ticket::ALL.iter().map(|&t| u64::from(self.get(t))).sum()
    }

    /// Get count of a specific ticket
    pub fn get(&self, ticket: Ticket) -> u32 {
        match ticket {
            Ticket::Taxi => self.taxi,
            Ticket::Bus => self.bus,
            Ticket::Underground => self.underground,
            Ticket::Double => self.double,
            Ticket::Secret => self.secret,
        }
    }

    /// Set count of a specific ticket
    pub fn set(&mut self, ticket: Ticket, count: u32) {
        match ticket {
            Ticket::Taxi => self.taxi = count,
            Ticket::Bus => self.bus = count,
            Ticket::Underground => self.underground = count,
            Ticket::Double => self.double = count,
            Ticket::Secret => self.secret = count,
        }
    }

    /// Whether at least one ticket of this kind is held
    pub fn has(&self, ticket: Ticket) -> bool {
        self.has_at_least(ticket, 1)
    }

    /// Whether at least `count` tickets of this kind are held
    pub fn has_at_least(&self, ticket: Ticket, count: u32) -> bool {
        self.get(ticket) >= count
    }

    /// Add one ticket. A full count stays at `u32::MAX`.
    pub fn add(&mut self, ticket: Ticket) {
        self.set(ticket, self.get(ticket).saturating_add(1));
    }

    /// Remove one ticket, failing if none are held
    pub fn remove(&mut self, ticket: Ticket) -> Result<(), GameError> {
        let count = self
            .get(ticket)
            .checked_sub(1)
            .ok_or(GameError::InsufficientTickets(ticket))?;
        self.set(ticket, count);
        Ok(())
    }

    /// Convert to a map holding every ticket kind
    pub fn to_map(&self) -> HashMap<Ticket, u32> {
        Ticket::ALL.iter().map(|&t| (t, self.get(t))).collect()
    }
}
