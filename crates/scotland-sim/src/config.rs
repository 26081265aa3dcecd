//! Simulator configuration from environment variables.

use scotland_core::Colour;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Simulator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of games to play (`SIM_GAMES`)
    pub games: usize,
    /// Seed of the first game; game `n` uses `seed + n` (`SIM_SEED`)
    pub seed: u64,
    /// Detectives per game (`SIM_DETECTIVES`)
    pub detectives: usize,
    /// Rotations before a game is abandoned (`SIM_MAX_ROTATIONS`)
    pub max_rotations: usize,
}

impl SimConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let games: u64 = parse(&lookup, "SIM_GAMES")?.unwrap_or(8);
        let seed: u64 = parse(&lookup, "SIM_SEED")?.unwrap_or_else(rand::random);
        let detectives: u64 = parse(&lookup, "SIM_DETECTIVES")?.unwrap_or(3);
        let max_rotations: u64 = parse(&lookup, "SIM_MAX_ROTATIONS")?.unwrap_or(64);

        in_range("SIM_DETECTIVES", detectives, 1, Colour::DETECTIVES.len() as u64)?;
        in_range("SIM_MAX_ROTATIONS", max_rotations, 1, u32::MAX as u64)?;

        Ok(Self {
            games: games as usize,
            seed,
            detectives: detectives as usize,
            max_rotations: max_rotations as usize,
        })
    }
}

fn parse<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::NotANumber { name, value }),
        },
    }
}

fn in_range(name: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
