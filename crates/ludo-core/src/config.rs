//! Game configuration.

use crate::game::GameError;
use crate::player::Color;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay between two animated steps of a move
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 200;

/// Settings fixed for the lifetime of an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seated colors in turn order (2-4, distinct)
    pub players: Vec<Color>,
    /// Delay between animated steps, in milliseconds
    pub step_interval_ms: u64,
    /// Die seed for reproducible games; entropy when absent
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Create a configuration for the given seating
    pub fn new(players: Vec<Color>) -> Result<Self, GameError> {
        let config = Self {
            players,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Standard four-player game, clockwise from Blue
    pub fn four_player() -> Self {
        Self {
            players: Color::ALL.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_step_interval(mut self, millis: u64) -> Self {
        self.step_interval_ms = millis;
        self
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    /// Check seat count and uniqueness
    pub fn validate(&self) -> Result<(), GameError> {
        if !(2..=4).contains(&self.players.len()) {
            return Err(GameError::InvalidConfig(format!(
                "need 2-4 players, got {}",
                self.players.len()
            )));
        }
        for (i, color) in self.players.iter().enumerate() {
            if self.players[..i].contains(color) {
                return Err(GameError::InvalidConfig(format!("{} seated twice", color)));
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    /// Two players on opposite corners
    fn default() -> Self {
        Self {
            players: vec![Color::Blue, Color::Green],
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_two_player() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.players, vec![Color::Blue, Color::Green]);
        assert_eq!(config.step_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_rejects_bad_seating() {
        assert!(GameConfig::new(vec![Color::Red]).is_err());
        assert!(GameConfig::new(vec![Color::Red, Color::Red]).is_err());
        assert!(GameConfig::new(vec![Color::Red, Color::Blue, Color::Green]).is_ok());
        let mut too_many = GameConfig::four_player();
        too_many.players.push(Color::Blue);
        assert!(too_many.validate().is_err());
    }
}
